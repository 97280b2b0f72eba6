use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML loan file and deserialise into a typed struct.
///
/// `.yaml` / `.yml` extensions are parsed as YAML, everything else as JSON.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let value: T = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    log::debug!("loaded input from {}", canonical.display());
    Ok(value)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve the path against the working directory and require a regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_provisioning_core::LoanRecord;
    use std::io::Write;

    #[test]
    fn test_reads_yaml_loans() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "- id: Y-1\n  outstanding_amount: '250000'\n  loan_type: housing_microfinance\n  maturity_date: 2025-01-31"
        )
        .unwrap();
        let loans: Vec<LoanRecord> = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].id, "Y-1");
        assert!(loans[0].maturity_date.is_some());
    }

    #[test]
    fn test_reads_json_loans() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"id": "J-1", "outstanding_amount": "10"}}]"#).unwrap();
        let loans: Vec<LoanRecord> = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loans[0].id, "J-1");
    }

    #[test]
    fn test_missing_file() {
        let err = read_input::<Vec<LoanRecord>>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
