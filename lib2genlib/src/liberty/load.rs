// SPDX-License-Identifier: Apache-2.0

//! Reading Liberty text from files, gzip files or stdin.

use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::library::Library;
use super::liberty_parser::Block;
use super::{CharReader, LibertyParser};

/// Input path that selects standard input.
pub const STDIN_PATH: &str = "-";

fn human_readable_size(size: u64) -> String {
    const KIB: f64 = 1024.0;
    let size_f = size as f64;
    if size_f >= KIB * KIB * KIB {
        format!("{:.2} GiB", size_f / (KIB * KIB * KIB))
    } else if size_f >= KIB * KIB {
        format!("{:.2} MiB", size_f / (KIB * KIB))
    } else if size_f >= KIB {
        format!("{:.2} KiB", size_f / KIB)
    } else {
        format!("{} bytes", size)
    }
}

/// Parses Liberty text from an arbitrary reader. `source` names the input in
/// error messages.
pub fn parse_liberty_reader<R: Read>(reader: R, source: &str) -> Result<Block> {
    let mut parser = LibertyParser::new_from_iter(CharReader::new(reader));
    let parsed = parser.parse();
    if let Some(e) = parser.into_source().take_error() {
        return Err(e).with_context(|| format!("reading {}", source));
    }
    parsed.map_err(|e| anyhow!("parse error in {}: {}", source, e))
}

/// Parses a Liberty file into its group AST. `-` reads standard input and a
/// `.gz` extension selects gzip decompression.
pub fn parse_liberty_path(path: &Path) -> Result<Block> {
    if path.as_os_str() == STDIN_PATH {
        log::info!("Parsing Liberty from stdin");
        return parse_liberty_reader(std::io::stdin().lock(), "<stdin>");
    }

    log::info!("Parsing Liberty file: {}", path.display());
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    match file.metadata() {
        Ok(meta) => log::info!("  Size: {}", human_readable_size(meta.len())),
        Err(e) => log::warn!("  Could not stat file: {}", e),
    }
    let is_gz = path.extension().map(|x| x == "gz").unwrap_or(false);
    let source = path.display().to_string();
    if is_gz {
        parse_liberty_reader(MultiGzDecoder::new(file), &source)
    } else {
        parse_liberty_reader(file, &source)
    }
}

/// Loads the typed cell view of a Liberty file.
pub fn load_library(path: &Path) -> Result<Library> {
    let block = parse_liberty_path(path)?;
    if block.block_type != "library" {
        log::warn!(
            "Top-level group is `{}`, expected `library`",
            block.block_type
        );
    }
    Ok(Library::from_block(&block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const TEXT: &str = r#"
    library (tiny) {
        cell (BUF) {
            area : 1.0;
            pin (A) { direction : input; }
            pin (Y) { direction : output; function : "A"; }
        }
    }
    "#;

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(12), "12 bytes");
        assert_eq!(human_readable_size(2048), "2.00 KiB");
        assert_eq!(human_readable_size(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn test_load_plain_file() {
        let mut f = tempfile::Builder::new().suffix(".lib").tempfile().unwrap();
        f.write_all(TEXT.as_bytes()).unwrap();
        let lib = load_library(f.path()).unwrap();
        assert_eq!(lib.name.as_deref(), Some("tiny"));
        assert_eq!(lib.cells.len(), 1);
        assert_eq!(lib.cells[0].name, "BUF");
    }

    #[test]
    fn test_load_gzipped_file() {
        let mut f = tempfile::Builder::new()
            .suffix(".lib.gz")
            .tempfile()
            .unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TEXT.as_bytes()).unwrap();
        f.write_all(&encoder.finish().unwrap()).unwrap();
        let lib = load_library(f.path()).unwrap();
        assert_eq!(lib.cells[0].pins.len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_library(Path::new("/definitely/not/here.lib")).unwrap_err();
        assert!(format!("{:#}", err).contains("opening"), "{:#}", err);
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = parse_liberty_reader("library (x) {".as_bytes(), "broken.lib").unwrap_err();
        assert!(err.to_string().contains("broken.lib"), "{}", err);
    }
}
