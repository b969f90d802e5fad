pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod llm;
pub mod pipeline;
pub mod platform;
pub mod profile;
pub mod telemetry;

pub use errors::{AgentError, ErrorCategory};
pub use extractor::{JobPosting, extract, extract_from_text};
pub use platform::{PlatformInfo, UrlAnalysis, validate_and_analyze};
pub use profile::{CanonicalProfile, ProfileNormalizer};
