use serde_json::Value;

use super::{format_scalar, unwrap_result};

// Headline field per command: compliance verdict, loan category, portfolio NPL ratio.
const PRIORITY_KEYS: [&str; 4] = ["compliant", "category", "npl_ratio", "total_provision_required"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

pub fn minimal_line(value: &Value) -> String {
    let result_obj = unwrap_result(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_scalar(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_portfolio_envelope_prints_npl_ratio() {
        let v = json!({
            "result": { "buckets": {}, "npl_ratio": "37.5", "par30": "50" },
            "warnings": []
        });
        assert_eq!(minimal_line(&v), "37.5");
    }

    #[test]
    fn test_classification_prints_category() {
        let v = json!({ "loan_id": "A", "category": "substandard", "provision_rate": "0.25" });
        assert_eq!(minimal_line(&v), "substandard");
    }

    #[test]
    fn test_compliance_prints_verdict() {
        let v = json!({ "loan_id": "A", "compliant": false, "expected_category": "loss" });
        assert_eq!(minimal_line(&v), "false");
    }
}
