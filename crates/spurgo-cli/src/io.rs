use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::client::CliError;

/// Interactive yes/no gate for destructive operations.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    print!("{prompt} [y/N] ");
    io::stdout()
        .flush()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Some(data.trim().to_string()));
    }
    Ok(val)
}

pub fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::InvalidInput(e.to_string()))
}
