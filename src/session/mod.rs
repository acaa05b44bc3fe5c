//! Session module - the creation flow, the picker state machine and file materialization

mod create;
mod materialize;
mod picker;
#[cfg(test)]
pub(crate) mod testing;

pub(crate) use create::{CreateFileArgs, DirectoryChoice, PickerHost, create_file};
pub(crate) use materialize::Workspace;
pub(crate) use picker::{Candidate, InteractiveSession, ItemButton, SessionEvent};
