//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::detect::DceReport;

/// Render the report as plain text.
pub fn format_plain(report: &DceReport) -> String {
    if report.is_empty() {
        return "Nothing to remove.\n".to_string();
    }

    let mut out = String::new();
    for (title, items) in [
        ("REMOVABLE EXPORTS", &report.removable_exports),
        ("REMOVABLE IMPORTS", &report.removable_imports),
        ("REMOVABLE EXTERNAL", &report.removable_external),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({}):\n", title, items.len()));
        for item in items {
            out.push_str(&format!("- {}\n", item));
        }
    }
    out
}

/// Prints the report in plain text format.
pub fn print_plain(report: &DceReport) {
    print!("{}", format_plain(report));
}

/// Build the JSON report document.
///
/// `graph_sha256` fingerprints the graph description the report was derived from.
pub fn report_to_json(report: &DceReport, graph_sha256: Option<&str>) -> serde_json::Value {
    json!({
        "removable_exports": report.removable_exports,
        "removable_imports": report.removable_imports,
        "removable_external": report.removable_external,
        "counts": {
            "exports": report.removable_exports.len(),
            "imports": report.removable_imports.len(),
            "external": report.removable_external.len(),
        },
        "graph_sha256": graph_sha256,
    })
}

/// Prints the report in JSON format.
///
/// Falls back to a debug rendering if serialization fails.
pub fn print_json(report: &DceReport, graph_sha256: Option<&str>) {
    match serde_json::to_string_pretty(&report_to_json(report, graph_sha256)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            println!("{:?}", report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DceReport {
        DceReport {
            removable_exports: vec!["bar".into(), "baz".into()],
            removable_imports: vec![],
            removable_external: vec!["js_thing".into()],
        }
    }

    #[test]
    fn test_format_plain() {
        let text = format_plain(&report());
        assert_eq!(
            text,
            "REMOVABLE EXPORTS (2):\n- bar\n- baz\nREMOVABLE EXTERNAL (1):\n- js_thing\n"
        );
    }

    #[test]
    fn test_format_plain_empty() {
        assert_eq!(format_plain(&DceReport::default()), "Nothing to remove.\n");
    }

    #[test]
    fn test_report_to_json() {
        let value = report_to_json(&report(), Some("abc"));
        assert_eq!(value["removable_exports"], json!(["bar", "baz"]));
        assert_eq!(value["removable_imports"], json!([]));
        assert_eq!(value["counts"]["external"], 1);
        assert_eq!(value["graph_sha256"], "abc");

        let value = report_to_json(&report(), None);
        assert!(value["graph_sha256"].is_null());
    }
}
