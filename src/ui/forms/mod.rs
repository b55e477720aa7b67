//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `entry_form`: The dynamic form with its progress gauge

mod entry_form;
mod field_renderer;

pub use entry_form::draw_form;
