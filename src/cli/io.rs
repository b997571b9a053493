//! JSON I/O handling for CLI
//!
//! - Input: JSON files, or stdin when the path is `-`
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read and parse a JSON document from a file, or stdin for `-`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {:?}: {}", path, e)))?
    };

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    write_line(&response)
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    let mut response = serde_json::json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message()
    });

    if let Some(details) = error.details() {
        response["details"] = details.clone();
    }

    write_line(&response)
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormData;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"name": "Ada", "qty": 2, "extras": ["gift"]}"#).unwrap();

        let data: FormData = read_json(&path).unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), ["name", "qty", "extras"]);
    }

    #[test]
    fn test_read_json_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "  \n").unwrap();

        let err = read_json::<FormData>(&path).unwrap_err();
        assert_eq!(err.message(), "Empty input");
    }
}
