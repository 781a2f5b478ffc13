/// Shared kernel: error taxonomy, result alias and file helpers
pub mod error;
pub mod path;
pub mod result;
pub mod security;

pub use result::Result;
