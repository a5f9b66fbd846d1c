// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;

/// Prints a one-line error (plus `key: value` details) to stderr and exits
/// with status 1.
pub fn report_cli_error_and_exit(message: &str, details: Vec<(&str, &str)>) -> ! {
    eprintln!("lib2genlib: {}", message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}
