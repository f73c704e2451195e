//! Markdown renderers for synchronized records

mod profile;
mod stages;

pub use profile::{format_month, render_profile};
pub use stages::render_stages;
