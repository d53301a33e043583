//! Analysis backend client and result model.

pub mod client;
pub mod types;
pub mod verdict;

pub use client::{AnalysisClient, AnalysisError, DEFAULT_ENDPOINT};
pub use types::{AnalysisResponse, AnalysisResult, ReasoningPoint, Source};
pub use verdict::{display_label, display_name_for_url, reasoning_points_or_summary, Tier};
