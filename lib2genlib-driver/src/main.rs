// SPDX-License-Identifier: Apache-2.0

//! Converts a Liberty cell library into a Genlib gate library.
//!
//! Sample usage:
//!
//! ```shell
//! $ lib2genlib sky130_fd_sc_hd__tt_025C_1v80.lib > sky130.genlib
//! $ zcat cells.lib.gz | lib2genlib - --verbose --always-use 'TIE.*,BUF_X1'
//! ```

mod config;
mod report_cli_error;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use config::DriverConfig;
use lib2genlib::genlib::{write_genlib, SelectionPolicy};
use lib2genlib::liberty::load_library;
use report_cli_error::report_cli_error_and_exit;

/// Translate combinational, single-output, unate Liberty cells to Genlib.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Report every skipped cell and the reason on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Comma-separated regexes of cells to emit even when marked `dont_use`.
    /// May be given more than once.
    #[arg(short = 'u', long = "always-use", value_name = "PATTERNS")]
    #[arg(action = clap::ArgAction::Append)]
    always_use: Vec<String>,

    /// TOML configuration file.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Write Genlib here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Liberty file to read (`.lib` or `.lib.gz`); `-` reads stdin.
    input: PathBuf,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose && std::env::var_os("RUST_LOG").is_none() {
        builder
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false);
    }
    let _ = builder.try_init();
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => DriverConfig::from_path(path)?,
        None => DriverConfig::default(),
    };

    let mut pattern_lists = config.genlib.always_use.clone();
    pattern_lists.extend(args.always_use.iter().cloned());
    let policy = SelectionPolicy::from_pattern_lists(&pattern_lists)
        .context("compiling --always-use patterns")?;
    log::debug!("Selection policy has {} patterns", policy.len());

    let library = load_library(&args.input)?;

    match &args.output {
        Some(path) => {
            // The target only appears once the whole library has converted.
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let mut tmp = NamedTempFile::new_in(dir)
                .with_context(|| format!("creating temporary file in {}", dir.display()))?;
            write_genlib(
                &library,
                &policy,
                &config.genlib.pin,
                &mut BufWriter::new(tmp.as_file_mut()),
            )?;
            tmp.persist(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut out = BufWriter::new(std::io::stdout().lock());
            write_genlib(&library, &policy, &config.genlib.pin, &mut out)?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        let input = args.input.display().to_string();
        report_cli_error_and_exit(&format!("{:#}", e), vec![("input", input.as_str())]);
    }
}
