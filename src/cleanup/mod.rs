//! Cleanup module - deletes files created this session per the configured strategy

mod tracker;

pub(crate) use tracker::SessionCleanupTracker;
