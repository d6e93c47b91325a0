//! Generative-language client for the Scribo pipeline.
//!
//! Wraps the Gemini REST API for the three generation stages:
//! - research brief synthesis ([`brief`])
//! - script component generation ([`components`])
//! - final script assembly ([`assemble`])
//!
//! All stages share one policy: a blocked, empty or malformed completion
//! is a typed error with its diagnostics attached, never silently
//! replaced with fabricated content.

pub mod assemble;
pub mod brief;
pub mod client;
pub mod components;
pub mod cost;
pub mod error;
pub mod rewrite;

pub use assemble::assemble_script;
pub use brief::synthesize_brief;
pub use client::{GeminiClient, GenerateOptions};
pub use components::{generate_components, ComponentBundle};
pub use cost::{estimate_tokens, CostEstimate};
pub use error::{GenError, GenResult};
pub use rewrite::script_from_transcript;
