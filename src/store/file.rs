//! Whole-file reads and writes of encoded tries

use crate::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write `data` to `path`, replacing any existing file
///
/// If the file was created but writing it failed, it is removed again so
/// no truncated trie is left behind.
pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    if let Err(err) = file.write_all(data).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(err.into());
    }
    Ok(())
}

/// Read the whole file at `path`
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}
