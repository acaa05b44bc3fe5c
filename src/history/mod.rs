//! History module - persisted state and the recent-files store

mod state;
mod store;

pub(crate) use state::{GlobalState, get_state_path};
pub(crate) use store::HistoryStore;
