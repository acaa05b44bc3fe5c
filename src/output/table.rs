use comfy_table::{Cell, Color};

use crate::core::HistoryEntry;
use crate::output::format::{create_styled_table, format_timestamp, header_cell, styled_cell};

/// A history entry plus whether its file is still on disk
#[derive(Debug, Clone)]
pub(crate) struct HistoryRow {
    pub(crate) entry: HistoryEntry,
    pub(crate) exists: bool,
}

pub(crate) fn render_history_table(rows: &[HistoryRow], use_color: bool) -> String {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", use_color),
        header_cell("File", use_color),
        header_cell("Directory", use_color),
        header_cell("Last accessed", use_color),
        header_cell("Status", use_color),
    ]);

    let warn_color = if use_color { Some(Color::Yellow) } else { None };
    let ok_color = if use_color { Some(Color::Green) } else { None };

    for (i, row) in rows.iter().enumerate() {
        let status = if row.exists {
            styled_cell("ok", ok_color, false)
        } else {
            styled_cell("(File deleted)", warn_color, true)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&row.entry.label),
            Cell::new(row.entry.directory()),
            Cell::new(format_timestamp(row.entry.last_accessed)),
            status,
        ]);
    }
    table.to_string()
}

pub(crate) fn print_history_table(rows: &[HistoryRow], use_color: bool) {
    if rows.is_empty() {
        println!("No recent files.");
        return;
    }
    println!("{}", render_history_table(rows, use_color));
    let missing = rows.iter().filter(|r| !r.exists).count();
    println!(
        "\n  {} recent file(s), {} deleted from disk\n",
        rows.len(),
        missing
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, exists: bool) -> HistoryRow {
        HistoryRow {
            entry: HistoryEntry {
                label: path.rsplit('/').next().unwrap_or(path).to_string(),
                file_path: path.to_string(),
                last_accessed: 1_700_000_000_000,
            },
            exists,
        }
    }

    #[test]
    fn table_lists_rows_in_order_and_marks_deleted() {
        let rendered = render_history_table(
            &[row("/tmp/b.txt", true), row("/tmp/a.txt", false)],
            false,
        );
        let b = rendered.find("b.txt").unwrap();
        let a = rendered.find("a.txt").unwrap();
        assert!(b < a);
        assert!(rendered.contains("(File deleted)"));
        assert!(rendered.contains("Last accessed"));
    }
}
