//! Console report.
//!
//! Every section is built as text first and printed by the caller, so the
//! exact output can be checked in tests.

pub mod findings;
pub mod summary;

use comfy_table::{presets, CellAlignment, Table};

use crate::config::CHART_FILES;

const RULE_WIDTH: usize = 80;

/// Gap between table columns.
const COLUMN_GAP: u16 = 2;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Section heading framed by `=` rules, preceded by a blank line.
pub fn banner(title: &str) -> String {
    let rule = rule();
    format!("\n{rule}\n{title}\n{rule}\n")
}

/// Completion banner and the list of chart files written.
pub fn closing_manifest() -> String {
    let rule = rule();
    let mut out = format!("\n{rule}\n✓ All visualizations generated successfully!\n{rule}\n");
    out.push_str("\nGenerated files:\n");
    for file in CHART_FILES {
        out.push_str(&format!("  - {file}\n"));
    }
    out.push_str("\nUse the 'SCAN COVERAGE AND SPEED' section above for your research paper.\n");
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Borderless table with every column right-aligned, header first.
pub fn plain_table<const N: usize>(
    headers: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING).set_header(headers.to_vec());
    for row in rows {
        table.add_row(row.to_vec());
    }

    let last = N.saturating_sub(1);
    for (idx, column) in table.column_iter_mut().enumerate() {
        column.set_cell_alignment(CellAlignment::Right);
        column.set_padding((0, if idx < last { COLUMN_GAP } else { 0 }));
    }
    table
}

/// Fixed-point text with lowercase `nan` and `inf` for non-finite values.
pub fn fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.precision$}")
    }
}
