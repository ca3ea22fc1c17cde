// src/exec/hash.rs

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;

use crate::fs::FileSystem;

/// Compute the hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// True if both files exist and have identical content.
pub fn same_content(fs: &dyn FileSystem, a: &Path, b: &Path) -> Result<bool> {
    if !fs.is_file(a) || !fs.is_file(b) {
        return Ok(false);
    }
    Ok(compute_file_hash(fs, a)? == compute_file_hash(fs, b)?)
}
