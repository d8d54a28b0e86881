//! Types shared by every pdfqa crate.

pub mod error;

pub use error::{Error, Result};
