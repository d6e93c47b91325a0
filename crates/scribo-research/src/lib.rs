//! Source search and content extraction for the Scribo research stage.
//!
//! Both operations soft-fail: one bad source must never abort a
//! multi-source research pass. Search degrades to an empty list with a
//! diagnostic; extraction degrades to descriptive failure text.

pub mod captions;
pub mod error;
pub mod extract;
pub mod scrub;
pub mod search;

pub use error::{ResearchError, ResearchResult};
pub use extract::{is_video_url, Extraction, Extractor};
pub use scrub::scrub_text;
pub use search::{SearchClient, SearchOutcome, MAX_RESULTS_PER_REQUEST};
