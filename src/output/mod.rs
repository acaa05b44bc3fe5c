mod format;
mod json;
mod table;

pub(crate) use json::output_history_json;
pub(crate) use table::{HistoryRow, print_history_table};
