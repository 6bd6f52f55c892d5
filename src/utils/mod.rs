//! Helpers shared by the shell and the pages.
//!
//! - `errors`: color-eyre and panic hooks, plus the `trace_dbg!` macro
//! - `help_msg`: key/description pairs shown in the help bar and popup
//! - `key_events`: comparable, printable wrapper around crossterm key events
//! - `logging`: tracing subscriber writing to the data directory

#[cfg(not(tarpaulin_include))]
pub(crate) mod errors;
pub(crate) mod help_msg;
pub(crate) mod key_events;
#[cfg(not(tarpaulin_include))]
pub(crate) mod logging;
