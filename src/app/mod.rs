//! Glue between the terminal and the session: display events and input.

pub mod event;
pub mod input;
