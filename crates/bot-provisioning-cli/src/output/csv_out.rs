use serde_json::Value;
use std::io::{self, Write};

use super::{format_scalar, unwrap_result};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Portfolio results become one row per loan; anything else becomes
/// two-column `field,value` rows of its scalar fields.
pub fn write_csv<W: Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let result = unwrap_result(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(loans)) = map.get("loans") {
                write_array_csv(&mut wtr, loans)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    if !val.is_object() && !val.is_array() {
                        wtr.write_record([key.as_str(), &format_scalar(val)])?;
                    }
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&format_scalar(result)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&format_scalar(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_portfolio_rows_per_loan() {
        let v = json!({
            "result": {
                "npl_ratio": "37.5",
                "loans": [
                    { "loan_id": "A", "category": "current", "days_past_due": 0 },
                    { "loan_id": "B", "category": "loss", "days_past_due": 95 }
                ]
            },
            "metadata": {}
        });
        let out = render(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "category,days_past_due,loan_id");
        assert_eq!(lines[2], "loss,95,B");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_single_result_field_value() {
        let v = json!({ "loan_id": "A", "category": "doubtful", "mismatches": ["x"] });
        let out = render(&v);
        assert!(out.starts_with("field,value\n"));
        assert!(out.contains("category,doubtful"));
        assert!(!out.contains("mismatches"));
    }
}
