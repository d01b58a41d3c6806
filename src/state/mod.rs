//! Application state module
//!
//! The engine's read accessors are its interface to presentation layers;
//! the terminal UI uses only part of them.

#![allow(dead_code)]

mod form_engine;
mod forms;
mod submission;

pub use form_engine::*;
pub use forms::*;
pub use submission::*;
