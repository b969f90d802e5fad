use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::AgentError;
use crate::extractor::JobPosting;
use crate::pipeline::content::{FeedbackItem, FeedbackReport, FilteredProfile, GeneratedContent};
use crate::profile::CanonicalProfile;

/// What the generation stage is asked to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationTask {
    CoverLetter,
    Answer { question: String },
}

/// Everything the modification stage needs to rewrite a piece of content.
///
/// `instructions` is the rendered feedback list, possibly amended by the
/// orchestrator on a second attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationInput {
    pub original: GeneratedContent,
    pub selected_feedback: Vec<FeedbackItem>,
    pub instructions: String,
    pub job: JobPosting,
    pub profile: FilteredProfile,
}

/// Picks the parts of a profile that matter for a job.
#[async_trait]
pub trait RelevanceStage: Send + Sync {
    async fn select(
        &self,
        job: &JobPosting,
        profile: &CanonicalProfile,
    ) -> Result<FilteredProfile, AgentError>;
}

#[async_trait]
pub trait GenerationStage: Send + Sync {
    async fn generate(
        &self,
        task: &GenerationTask,
        job: &JobPosting,
        profile: &FilteredProfile,
    ) -> Result<GeneratedContent, AgentError>;
}

#[async_trait]
pub trait FeedbackStage: Send + Sync {
    async fn review(
        &self,
        content: &GeneratedContent,
        job: &JobPosting,
        profile: &FilteredProfile,
    ) -> Result<FeedbackReport, AgentError>;
}

#[async_trait]
pub trait ModificationStage: Send + Sync {
    async fn modify(&self, input: &ModificationInput) -> Result<GeneratedContent, AgentError>;
}

/// The four external stages the orchestrator drives.
#[derive(Clone)]
pub struct Stages {
    pub relevance: Arc<dyn RelevanceStage>,
    pub generation: Arc<dyn GenerationStage>,
    pub feedback: Arc<dyn FeedbackStage>,
    pub modification: Arc<dyn ModificationStage>,
}

impl Stages {
    pub fn new(
        relevance: Arc<dyn RelevanceStage>,
        generation: Arc<dyn GenerationStage>,
        feedback: Arc<dyn FeedbackStage>,
        modification: Arc<dyn ModificationStage>,
    ) -> Self {
        Self {
            relevance,
            generation,
            feedback,
            modification,
        }
    }

    /// One value serving all four stages.
    pub fn shared<S>(stages: Arc<S>) -> Self
    where
        S: RelevanceStage + GenerationStage + FeedbackStage + ModificationStage + 'static,
    {
        Self {
            relevance: stages.clone(),
            generation: stages.clone(),
            feedback: stages.clone(),
            modification: stages,
        }
    }
}
