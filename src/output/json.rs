use crate::output::format::format_rfc3339;
use crate::output::table::HistoryRow;

/// History as a pretty JSON array, most recent first
pub(crate) fn output_history_json(rows: &[HistoryRow]) -> String {
    let output: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "label": row.entry.label,
                "filePath": row.entry.file_path,
                "lastAccessed": row.entry.last_accessed,
                "lastAccessedAt": format_rfc3339(row.entry.last_accessed),
                "exists": row.exists,
            })
        })
        .collect();
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "[]".to_string())
}
