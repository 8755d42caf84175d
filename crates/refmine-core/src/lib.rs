//! Core shared types for refmine.
//!
//! This crate is intentionally small: text offsets, line/column conversion and
//! a couple of helpers shared by the engine and the CLI.

mod text;

use std::any::Any;

pub use text::{LineCol, LineIndex, TextRange, TextSize};

/// Best-effort conversion of a panic payload into a printable message.
pub fn panic_payload_to_str(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return message;
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.as_str();
    }
    "<non-string panic payload>"
}
