use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resource::ResourceId;

const INVALID_CHARS: &[char] = &['"', '*', '/', ':', '<', '>', '?', '\\', '|'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "CLOCK$", "NUL", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6",
    "COM7", "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8",
    "LPT9",
];

pub fn ensure_dir<P: AsRef<Path>>(p: P) -> std::io::Result<()> {
    if !p.as_ref().is_dir() {
        fs::create_dir_all(&p)?;
    }
    Ok(())
}

/// Makes `name` usable as a file name on every common filesystem.
pub fn sanitize_filename(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .map(|c| {
            if c.is_control() || INVALID_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    if RESERVED_NAMES.contains(&clean.to_uppercase().as_str()) {
        clean.push('_');
    }
    clean
}

/// `<dir>/<name>.<ext>`, with the name sanitised.
pub fn resource_path(dir: &Path, name: &ResourceId, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_filename(&name.to_string()), ext))
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}
