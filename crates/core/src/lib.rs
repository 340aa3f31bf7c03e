//! View-definition editing engine.
//!
//! A view is a named projection over one or more data sources, optionally
//! joined by compositions. It is edited only through reversible [`command`]s
//! that are paired with their inverses into [`undoable`]s, tracked by the
//! [`undo_manager`], and persisted together with the current definition as an
//! [`editor_state`].

pub mod command;
pub mod command_factory;
pub mod composition;
pub mod editor_state;
pub mod error;
pub mod session;
pub mod source_path;
pub mod types;
pub mod undo_manager;
pub mod undoable;
pub mod view_definition;
