//! Reading content from files, stdin, and oversized sources.
//!
//! Files beyond the configured size threshold are not read whole: we keep a
//! head and a tail, both aligned to line boundaries, joined by a marker that
//! reports how much was skipped. The engine downstream never does I/O.

use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// What the CLI was pointed at.
pub enum Input {
    /// A directory, to be walked by the folder format.
    Directory(PathBuf),
    /// Text content with the filename it came from (None for stdin).
    Content {
        text: String,
        filename: Option<String>,
    },
}

/// Read the given path, or stdin when no path is given.
///
/// # Errors
///
/// Returns an error when the path cannot be read.
pub fn read_input(path: Option<&Path>, cfg: &Config) -> Result<Input> {
    let Some(path) = path else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(Input::Content {
            text,
            filename: None,
        });
    };

    if path.is_dir() {
        return Ok(Input::Directory(path.to_path_buf()));
    }

    let size = fs::metadata(path)?.len();
    let text = if size > cfg.max_file_size {
        read_head_tail(path, size, cfg)?
    } else {
        String::from_utf8_lossy(&fs::read(path)?).into_owned()
    };

    Ok(Input::Content {
        text,
        filename: Some(path.to_string_lossy().into_owned()),
    })
}

/// Head + tail of an oversized file around a truncation marker, both parts
/// trimmed to whole lines.
fn read_head_tail(path: &Path, size: u64, cfg: &Config) -> Result<String> {
    let mut file = fs::File::open(path)?;

    let mut head = vec![0u8; cfg.head_bytes.min(size) as usize];
    file.read_exact(&mut head)?;
    let head_end = match head.iter().rposition(|&b| b == b'\n') {
        Some(pos) => pos + 1,
        None => head.len(),
    };
    head.truncate(head_end);

    let mut tail_start = size.saturating_sub(cfg.tail_bytes);
    let tail = if tail_start > head_end as u64 {
        file.seek(SeekFrom::Start(tail_start))?;
        let mut chunk = vec![0u8; 1024.min((size - tail_start) as usize)];
        file.read_exact(&mut chunk)?;
        // Start the tail just past the next newline so it begins on a
        // complete line.
        if let Some(pos) = chunk.iter().position(|&b| b == b'\n') {
            tail_start += pos as u64 + 1;
        }
        file.seek(SeekFrom::Start(tail_start))?;
        let mut tail = Vec::new();
        file.read_to_end(&mut tail)?;
        tail
    } else {
        tail_start = head_end as u64;
        file.seek(SeekFrom::Start(tail_start))?;
        let mut tail = Vec::new();
        file.read_to_end(&mut tail)?;
        tail
    };

    let head_str = String::from_utf8_lossy(&head);
    let tail_str = String::from_utf8_lossy(&tail);

    let skipped = tail_start.saturating_sub(head_end as u64);
    if skipped > 0 {
        let mb = skipped as f64 / (1024.0 * 1024.0);
        Ok(format!("{head_str}\n[...{mb:.1} MB truncated...]\n\n{tail_str}"))
    } else {
        Ok(format!("{head_str}{tail_str}"))
    }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
