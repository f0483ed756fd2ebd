//! Preset byte sources: plain dump files or zip archives exported by the
//! vendor's librarian.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Local file header signature that opens every zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Read the preset stream at `path`.
///
/// A zip archive yields its first file entry under `directory`; any other file
/// is the stream itself.
pub(crate) fn read_preset(path: &Path, directory: &str) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if !bytes.starts_with(ZIP_MAGIC) {
        return Ok(bytes);
    }
    read_archive_entry(&bytes, directory)
        .with_context(|| format!("failed to extract preset from {}", path.display()))
}

/// Read a reference preset, always as a plain file.
pub(crate) fn read_plain(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_archive_entry(bytes: &[u8], directory: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("invalid zip archive")?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .with_context(|| format!("unreadable zip entry #{i}"))?;
        if file.is_dir() || !file.name().starts_with(directory) {
            continue;
        }
        tracing::debug!(entry = file.name(), size = file.size(), "reading preset from archive");
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut data)
            .with_context(|| format!("failed to decompress {}", file.name()))?;
        return Ok(data);
    }

    bail!("no file found under {directory:?} in archive")
}
