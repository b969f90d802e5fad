use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::AgentError;
use crate::extractor::{self, JobPosting};
use crate::fetcher::PageFetcher;
use crate::pipeline::content::{FeedbackItem, FeedbackReport, FilteredProfile, GeneratedContent};
use crate::pipeline::format::{self, IDENTICAL_OUTPUT_AMENDMENT};
use crate::pipeline::retry::{RetryPolicy, retry_with_backoff};
use crate::pipeline::stages::{GenerationTask, ModificationInput, Stages};
use crate::platform::{login::is_login_walled, validate_and_analyze};
use crate::profile::{CanonicalProfile, ProfileNormalizer};

/// Where the job posting comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    Url(String),
    /// Description pasted by the applicant.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub job_source: JobSource,
    pub raw_profile: Value,
    pub task: GenerationTask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub content: GeneratedContent,
    pub feedback: FeedbackReport,
    pub job: JobPosting,
    pub filtered_profile: FilteredProfile,
}

/// Follow-up request applying chosen feedback to earlier output.
#[derive(Debug, Clone)]
pub struct ModifyRequest {
    pub original: GeneratedContent,
    pub selected_feedback: Vec<FeedbackItem>,
    pub job: JobPosting,
    pub filtered_profile: FilteredProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInputs {
    pub job: JobPosting,
    pub profile: CanonicalProfile,
}

/// Sequences one request through loading, normalization and the four stages.
pub struct Orchestrator {
    fetcher: Arc<dyn PageFetcher>,
    stages: Stages,
    retry: RetryPolicy,
    normalizer: ProfileNormalizer,
}

impl Orchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, stages: Stages, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            stages,
            retry,
            normalizer: ProfileNormalizer::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: ProfileNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub async fn load_job(&self, source: &JobSource) -> Result<JobPosting, AgentError> {
        match source {
            JobSource::Url(url) => self.load_job_from_url(url).await,
            JobSource::Text(text) => {
                if text.trim().is_empty() {
                    return Err(AgentError::validation(
                        "job description text is empty",
                        Some("job_description_text"),
                    ));
                }
                info!("parsing pasted job description");
                Ok(extractor::extract_from_text(text))
            }
        }
    }

    async fn load_job_from_url(&self, url: &str) -> Result<JobPosting, AgentError> {
        let analysis = validate_and_analyze(url);
        let platform = match (analysis.valid, analysis.platform_info) {
            (true, Some(platform)) => platform,
            _ => {
                let reason = analysis.error.unwrap_or_else(|| "invalid URL".to_string());
                return Err(AgentError::validation(reason, Some("job_description_url")));
            }
        };
        for warning in &analysis.warnings {
            debug!(url, warning = %warning, "job URL warning");
        }

        info!(url, provider = %platform.provider, "loading job posting");
        let fetcher = &self.fetcher;
        let url = url.trim();
        let page = retry_with_backoff(&self.retry, "fetch_job_page", move || async move {
            fetcher.fetch_page(url).await.map_err(|e| {
                AgentError::from(e).with_detail("url", url.to_string())
            })
        })
        .await?;

        if is_login_walled(url, &page.final_url, &page.body) {
            warn!(url, final_url = %page.final_url, provider = %platform.provider, "job posting is behind a login wall");
            return Err(AgentError::authentication(
                format!("{} redirected to a login page or login prompt", url),
                Some(platform.provider.as_str()),
            ));
        }

        Ok(extractor::extract(&page.body, &page.final_url))
    }

    /// Loads the job posting and normalizes the profile.
    pub async fn prepare(
        &self,
        job_source: &JobSource,
        raw_profile: &Value,
    ) -> Result<PreparedInputs, AgentError> {
        let job = self.load_job(job_source).await?;
        info!("normalizing profile");
        let profile = self.normalizer.normalize(raw_profile);
        Ok(PreparedInputs { job, profile })
    }

    /// Relevance, generation and feedback in that order. Only job loading and
    /// generation failures reach the caller.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<PipelineOutput, AgentError> {
        let PreparedInputs { job, profile } =
            self.prepare(&request.job_source, &request.raw_profile).await?;

        info!("selecting relevant profile data");
        let relevance = &self.stages.relevance;
        let (job_ref, profile_ref) = (&job, &profile);
        let filtered_profile = retry_with_backoff(&self.retry, "relevance", move || {
            relevance.select(job_ref, profile_ref)
        })
        .await
        .unwrap_or_else(|e| {
            warn!(category = %e.category, error = %e.message, "relevance selection failed, using general profile");
            FilteredProfile::general()
        });

        info!(task = ?request.task, "generating content");
        let generation = &self.stages.generation;
        let (task, filtered) = (&request.task, &filtered_profile);
        let content = retry_with_backoff(&self.retry, "generation", move || {
            generation.generate(task, job_ref, filtered)
        })
        .await?;

        info!("reviewing generated content");
        let feedback_stage = &self.stages.feedback;
        let generated = &content;
        let feedback = retry_with_backoff(&self.retry, "feedback", move || {
            feedback_stage.review(generated, job_ref, filtered)
        })
        .await
        .unwrap_or_else(|e| {
            warn!(category = %e.category, error = %e.message, "feedback failed, returning no suggestions");
            FeedbackReport::default()
        });

        Ok(PipelineOutput {
            content,
            feedback,
            job,
            filtered_profile,
        })
    }

    /// Applies the selected feedback. Never fails: any stage failure yields
    /// the original content. Unchanged output triggers exactly one more
    /// attempt with an amended instruction, whose result is accepted as is.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), kind = %request.original.kind()))]
    pub async fn modify(&self, request: &ModifyRequest) -> GeneratedContent {
        let mut input = ModificationInput {
            original: request.original.clone(),
            selected_feedback: request.selected_feedback.clone(),
            instructions: format::selected_feedback(&request.selected_feedback),
            job: request.job.clone(),
            profile: request.filtered_profile.clone(),
        };

        let first = match self.run_modification(&input).await {
            Some(content) => content,
            None => return request.original.clone(),
        };

        if request.selected_feedback.is_empty() || !first.is_unchanged_from(&request.original) {
            return first;
        }

        info!("modification returned identical content, retrying once");
        input.instructions.push_str(IDENTICAL_OUTPUT_AMENDMENT);
        self.run_modification(&input).await.unwrap_or(first)
    }

    async fn run_modification(&self, input: &ModificationInput) -> Option<GeneratedContent> {
        let modification = &self.stages.modification;
        let result = retry_with_backoff(&self.retry, "modification", move || {
            modification.modify(input)
        })
        .await;

        match result {
            Ok(content) if content.kind() == input.original.kind() => Some(content),
            Ok(content) => {
                warn!(expected = %input.original.kind(), got = %content.kind(), "modification changed the content type, keeping original");
                None
            }
            Err(e) => {
                warn!(category = %e.category, error = %e.message, "modification failed, keeping original");
                None
            }
        }
    }

    /// Convenience wrapper over [`Self::generate`] for cover letters.
    pub async fn cover_letter(
        &self,
        job_source: JobSource,
        raw_profile: Value,
    ) -> Result<PipelineOutput, AgentError> {
        self.generate(&GenerateRequest {
            job_source,
            raw_profile,
            task: GenerationTask::CoverLetter,
        })
        .await
    }

    pub async fn answer(
        &self,
        job_source: JobSource,
        raw_profile: Value,
        question: impl Into<String>,
    ) -> Result<PipelineOutput, AgentError> {
        self.generate(&GenerateRequest {
            job_source,
            raw_profile,
            task: GenerationTask::Answer {
                question: question.into(),
            },
        })
        .await
    }
}
