//! Content generation pipeline.
//!
//! The [`Orchestrator`] loads a job posting, normalizes the applicant's
//! profile and drives four external stages in a fixed order: relevance
//! selection, generation, feedback and, on a follow-up request,
//! modification. Stages are trait objects injected at construction.

pub mod content;
pub mod format;
pub mod orchestrator;
pub mod retry;
pub mod stages;

pub use content::{
    ContentKind, CoverLetter, FeedbackItem, FeedbackReport, FeedbackType, FilteredProfile,
    GeneratedContent, QuestionAnswer,
};
pub use orchestrator::{
    GenerateRequest, JobSource, ModifyRequest, Orchestrator, PipelineOutput, PreparedInputs,
};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use stages::{
    FeedbackStage, GenerationStage, GenerationTask, ModificationInput, ModificationStage,
    RelevanceStage, Stages,
};
