pub mod http;
pub mod media;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn get_noterelay_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("NOTERELAY_HOME") {
        return Ok(PathBuf::from(home));
    }
    Ok(dirs::home_dir()
        .context("Could not determine home directory")?
        .join(".noterelay"))
}

/// Prefix every line of `text` with `> ` so multi-line detail stands apart
/// from the log line it belongs to.
pub fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
