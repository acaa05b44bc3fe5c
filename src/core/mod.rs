//! Core module - path equality, history types and the creation planner

mod path_eq;
mod planner;
mod types;

pub(crate) use path_eq::path_equal;
pub(crate) use planner::{lead_label, plan, with_default_extension};
pub(crate) use types::{HistoryEntry, Intent, basename, join_under};
