pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load command input from `--input <path>` or, failing that, piped stdin.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_input(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err("--input <file.json|file.yaml> or stdin required".into()),
    }
}
