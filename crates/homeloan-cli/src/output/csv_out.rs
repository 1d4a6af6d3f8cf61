use serde_json::Value;
use std::io;

use crate::output::SCHEDULE_COLUMNS;

/// Write output as CSV to stdout: the schedule when one is present,
/// field/value rows otherwise.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(schedule)) = map.get("schedule") {
                write_rows_csv(&mut wtr, schedule);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                write_fields(&mut wtr, map, "");
            }
        }
        Value::Array(arr) => write_rows_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    let headers: Vec<String> = match arr.first() {
        Some(Value::Object(first)) if SCHEDULE_COLUMNS.iter().all(|c| first.contains_key(*c)) => {
            SCHEDULE_COLUMNS.iter().map(|s| s.to_string()).collect()
        }
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => {
            for item in arr {
                let _ = wtr.write_record([&format_csv_value(item)]);
            }
            return;
        }
    };

    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &serde_json::Map<String, Value>, prefix: &str) {
    for (key, val) in map {
        match val {
            Value::Object(nested) => write_fields(wtr, nested, &format!("{prefix}{key}.")),
            _ => {
                let _ = wtr.write_record([format!("{prefix}{key}"), format_csv_value(val)]);
            }
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
