use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    port: &'a str,
    image_size: usize,
    record: &'a Value,
}

/// Print an identification record. `inflated` is the record text as stored
/// on the device and is what `raw` emits.
pub fn print_record(
    record: &Value,
    inflated: &[u8],
    port: &str,
    image_size: usize,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = RecordOutput {
                port,
                image_size,
                record,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in record_rows(record) {
                table.add_row(vec![field, value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Device on {port} ({image_size} byte image):");
            for (field, value) in record_rows(record) {
                println!("  {field:<24} {value}");
            }
        }
        OutputFormat::Raw => print_raw(inflated),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Flatten a record into `(dotted.path, value)` rows.
pub fn record_rows(record: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten(record, String::new(), &mut rows);
    rows
}

fn flatten(value: &Value, path: String, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten(child, child_path, rows);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, format!("{path}[{index}]"), rows);
            }
        }
        Value::String(text) => rows.push((path, text.clone())),
        other => rows.push((path, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_flatten_nested_record() {
        let record = json!({
            "model": "probe-7",
            "hw": {"rev": 2, "cal": [1.5, 2]},
            "tags": []
        });
        let rows = record_rows(&record);
        assert!(rows.contains(&("model".to_string(), "probe-7".to_string())));
        assert!(rows.contains(&("hw.rev".to_string(), "2".to_string())));
        assert!(rows.contains(&("hw.cal[0]".to_string(), "1.5".to_string())));
        assert!(rows.contains(&("tags".to_string(), "[]".to_string())));
    }

    #[test]
    fn scalar_record_has_single_row() {
        let rows = record_rows(&json!("bare"));
        assert_eq!(rows, vec![(String::new(), "bare".to_string())]);
    }

    #[test]
    fn record_output_serializes() {
        let record = json!({"serial": "A1"});
        let out = RecordOutput {
            port: "/dev/ttyACM0",
            image_size: 42,
            record: &record,
        };
        let text = serde_json::to_string(&out).unwrap();
        assert_eq!(
            text,
            r#"{"port":"/dev/ttyACM0","image_size":42,"record":{"serial":"A1"}}"#
        );
    }
}
