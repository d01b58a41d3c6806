//! Form rendering module
//!
//! - `field_renderer`: a single labelled input with its error
//! - `signup_form`: the signup form and its submitted confirmation

mod field_renderer;
mod signup_form;

pub use signup_form::{draw_signup_form, draw_submitted};
