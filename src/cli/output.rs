//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Two-column `left ==> right` table with bold headers.
pub fn arrow_table(headers: (&str, &str), rows: &[(String, String)]) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(headers.0).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(headers.1).add_attribute(Attribute::Bold),
        ]);

    for (left, right) in rows {
        table.add_row(vec![Cell::new(left), Cell::new("==>"), Cell::new(right)]);
    }

    table.to_string()
}
