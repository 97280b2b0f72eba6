use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    for section in render_tables(value) {
        println!("{}\n", section);
    }
}

/// Render a command result as a list of printable sections.
///
/// Scalar fields form a Field/Value table; nested maps of records (the
/// category buckets) and arrays of records (per-loan results) each get their
/// own table.
pub fn render_tables(value: &Value) -> Vec<String> {
    let mut sections = Vec::new();
    match value {
        Value::Object(map) if map.contains_key("result") && map.contains_key("metadata") => {
            if let Some(result) = map.get("result") {
                render_object(result, &mut sections);
            }
            render_envelope_notes(map, &mut sections);
        }
        Value::Object(_) => render_object(value, &mut sections),
        Value::Array(arr) => sections.push(array_table(arr)),
        _ => sections.push(format_scalar(value)),
    }
    sections
}

fn render_object(value: &Value, sections: &mut Vec<String>) {
    let Value::Object(map) = value else {
        sections.push(format_scalar(value));
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) if is_record_map(inner) => nested.push((key, val)),
            Value::Array(arr) if arr.iter().any(Value::is_object) => nested.push((key, val)),
            _ => builder.push_record([key.as_str(), &format_value(val)]),
        }
    }
    sections.push(Table::from(builder).to_string());

    for (key, val) in nested {
        let table = match val {
            Value::Object(inner) => record_map_table(inner),
            Value::Array(arr) => array_table(arr),
            _ => continue,
        };
        sections.push(format!("{}:\n{}", key, table));
    }
}

fn render_envelope_notes(envelope: &Map<String, Value>, sections: &mut Vec<String>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            let lines: Vec<String> = warnings
                .iter()
                .filter_map(Value::as_str)
                .map(|w| format!("  - {}", w))
                .collect();
            sections.push(format!("Warnings:\n{}", lines.join("\n")));
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        sections.push(format!("Methodology: {}", meth));
    }
}

/// A map whose values are all objects, e.g. `{"current": {...}, "esm": {...}}`.
fn is_record_map(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.values().all(Value::is_object)
}

fn record_map_table(map: &Map<String, Value>) -> String {
    let columns: Vec<String> = map
        .values()
        .find_map(Value::as_object)
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let mut builder = Builder::default();
    let mut header = vec!["name".to_string()];
    header.extend(columns.iter().cloned());
    builder.push_record(header);

    for (name, record) in map {
        let mut row = vec![name.clone()];
        row.extend(columns.iter().map(|c| {
            record
                .get(c.as_str())
                .map(format_value)
                .unwrap_or_default()
        }));
        builder.push_record(row);
    }
    Table::from(builder).to_string()
}

fn array_table(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)".to_string();
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        Table::from(builder).to_string()
    } else {
        arr.iter().map(format_value).collect::<Vec<_>>().join("\n")
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Null => "null".to_string(),
        _ => format_scalar(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn portfolio_envelope() -> Value {
        json!({
            "result": {
                "buckets": {
                    "current": { "count": 1, "amount": "500000", "provision": "5000" },
                    "esm": { "count": 0, "amount": "0", "provision": "0" },
                    "loss": { "count": 1, "amount": "300000", "provision": "300000" }
                },
                "npl_ratio": "37.5",
                "loans": [
                    { "loan_id": "A", "category": "current", "days_past_due": 0 },
                    { "loan_id": "B", "category": "loss", "days_past_due": 95 }
                ]
            },
            "methodology": "BOT loan classification and provisioning",
            "assumptions": {},
            "warnings": ["1 loan(s) have no usable maturity date"],
            "metadata": { "version": "0.1.0" }
        })
    }

    #[test]
    fn test_portfolio_sections() {
        let sections = render_tables(&portfolio_envelope());
        // summary, buckets, loans, warnings, methodology
        assert_eq!(sections.len(), 5);
        assert!(sections[0].contains("npl_ratio"));
        assert!(!sections[0].contains("buckets"));
        assert!(sections[1].starts_with("buckets:"));
        assert!(sections[1].contains("esm"));
        assert!(sections[2].starts_with("loans:"));
        assert!(sections[2].contains("95"));
        assert!(sections[3].contains("no usable maturity date"));
        assert!(sections[4].contains("Methodology"));
    }

    #[test]
    fn test_flat_classification() {
        let v = json!({ "loan_id": "A", "category": "doubtful", "provision_rate": "0.5" });
        let sections = render_tables(&v);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].contains("doubtful"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(render_tables(&json!([])), vec!["(empty)".to_string()]);
    }
}
