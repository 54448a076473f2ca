//! Output sink: print the art to stdout and optionally persist it to a file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ascii::AsciiArt;

/// Emit the finished art.
///
/// The full text always goes to stdout first; a file-write failure
/// afterwards must not suppress the console output already produced. When
/// `output` is given the identical text is written there, overwriting any
/// existing content.
pub fn emit(art: &AsciiArt, output: Option<&Path>) -> Result<(), OutputError> {
    println!("{}", art);

    if let Some(path) = output {
        write_file(art, path)?;
        log::info!("saved ASCII art to '{}'", path.display());
    }

    Ok(())
}

/// Write the art to a file as plain UTF-8, LF-separated rows, no trailing
/// metadata.
///
/// Parent directories are created as needed. The file handle is scoped to
/// this function, so it closes on every exit path including write failure.
pub fn write_file(art: &AsciiArt, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| OutputError::Create {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut file = File::create(path).map_err(|e| OutputError::Create {
        path: path.to_path_buf(),
        source: e,
    })?;

    file.write_all(art.to_string().as_bytes())
        .map_err(|e| OutputError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Errors that can occur while persisting the output.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create output file '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write output file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
