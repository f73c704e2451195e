//! Local record storage
//!
//! Every synchronized entity lives in its own directory under the base
//! directory. This module knows the layout and how to write into it safely.

mod record;

pub use record::{RecordDir, files, sanitize_key, write_atomic};
