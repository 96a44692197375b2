//! Minimal CSV rendering for the projects export.
//!
//! Every cell is wrapped in double quotes with embedded quotes doubled, so
//! the output survives commas, newlines, and quotes inside free-text fields
//! without a dialect negotiation.

/// Quote a single cell: wrap in double quotes, doubling embedded quotes.
pub fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Render a header row plus data rows into CSV text.
///
/// Cells are comma-joined, rows newline-joined. The caller is responsible
/// for giving every row the same arity as `headers`.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_row(headers.iter().copied()));
    for row in rows {
        lines.push(join_row(row.iter().map(String::as_str)));
    }
    lines.join("\n")
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(quote).collect::<Vec<_>>().join(",")
}
