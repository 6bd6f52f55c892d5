//! Plain state types that the pages render.

pub(crate) mod login_form;
