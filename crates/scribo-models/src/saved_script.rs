//! Saved script documents.
//!
//! The single durable write of a pipeline run: once the user is happy
//! with an assembled script they save it, sources and all, as one
//! document. Nothing earlier in the pipeline is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::Source;

/// A script the user explicitly saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScript {
    /// Document id (uuid v4).
    pub id: Uuid,
    /// Display title, defaults to the video idea when absent.
    pub title: String,
    /// The idea the pipeline ran on.
    pub video_idea: String,
    /// Assembled script body.
    pub script: String,
    /// Research sources the run was based on, persisted verbatim.
    #[serde(default)]
    pub sources: Vec<Source>,
    pub created_at: DateTime<Utc>,
}

impl SavedScript {
    pub fn new(
        title: impl Into<String>,
        video_idea: impl Into<String>,
        script: impl Into<String>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            video_idea: video_idea.into(),
            script: script.into(),
            sources,
            created_at: Utc::now(),
        }
    }
}
