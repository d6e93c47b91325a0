//! Request handlers.

pub mod generate;
pub mod health;
pub mod pipeline;
pub mod research;
pub mod scripts;
pub mod transcribe;

pub use health::{health, ready};
