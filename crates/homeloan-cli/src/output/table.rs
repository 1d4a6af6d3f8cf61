use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use homeloan_core::numfmt;

use crate::output::SCHEDULE_COLUMNS;

/// Fields that get thousands-grouped money formatting in tables.
const MONEY_KEYS: &[&str] = &[
    "home_price",
    "down_payment",
    "principal",
    "monthly_payment",
    "total_paid",
    "overpayment",
    "overpayment_percent",
    "payment",
    "interest",
    "balance",
];

/// Format output as tables: the summary fields first, then the schedule.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_schedule_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if key == "schedule" || key == "summary" {
                continue;
            }
            builder.push_record([key.as_str(), &format_value(key, val)]);
        }
        if let Some(Value::Object(summary)) = res_map.get("summary") {
            for (key, val) in summary {
                builder.push_record([key.as_str(), &format_value(key, val)]);
            }
        }
        println!("{}", Table::from(builder));

        if let Some(Value::Array(schedule)) = res_map.get("schedule") {
            println!();
            print_schedule_table(schedule);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(key, val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_schedule_table(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) if SCHEDULE_COLUMNS.iter().all(|c| first.contains_key(*c)) => {
            SCHEDULE_COLUMNS.iter().map(|s| s.to_string()).collect()
        }
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => {
            for row in rows {
                println!("{}", format_value("", row));
            }
            return;
        }
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| format_value(h, v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => {
            if MONEY_KEYS.contains(&key) {
                if let Ok(amount) = Decimal::from_str(s) {
                    return numfmt::format_grouped(amount);
                }
            }
            s.clone()
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value("", v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
