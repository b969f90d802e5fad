use async_trait::async_trait;
use tracing::info;

use crate::errors::AgentError;
use crate::extractor::JobPosting;
use crate::llm::client::ChatClient;
use crate::pipeline::content::{
    CoverLetter, FeedbackReport, FilteredProfile, GeneratedContent, QuestionAnswer,
};
use crate::pipeline::format;
use crate::pipeline::stages::{
    FeedbackStage, GenerationStage, GenerationTask, ModificationInput, ModificationStage,
    RelevanceStage,
};
use crate::profile::CanonicalProfile;

const RELEVANCE_INSTRUCTIONS: &str = "You select the parts of an applicant profile that matter for a job posting. \
Pick the single career variant that fits the job best. If that variant carries CONTENT GUIDANCE, copy it into content_guidance verbatim. \
Reply with JSON only: {\"selected_profile_version\": string, \"relevant_skills\": [string], \"relevant_experience\": [string], \
\"relevant_education\": [string], \"motivational_alignment\": string, \"content_guidance\": string}.";

const COVER_LETTER_INSTRUCTIONS: &str = "You write concise, specific cover letters from the applicant's point of view. \
Use only facts from the profile and follow any content guidance. \
Reply with JSON only: {\"title\": string, \"body\": string, \"key_points_used\": [string]}.";

const ANSWER_INSTRUCTIONS: &str = "You answer recruiter screening questions from the applicant's point of view. \
Use only facts from the profile; list anything you had to assume. \
Reply with JSON only: {\"answer\": string, \"assumptions\": [string], \"follow_up_question\": string or null}.";

const FEEDBACK_INSTRUCTIONS: &str = "You review application content against the job posting and the applicant profile. \
Suggest at most five concrete improvements, each typed as tone, alignment, clarity, emphasis or structure. \
Reply with JSON only: {\"feedback_items\": [{\"type\": string, \"suggestion\": string}]}.";

const MODIFICATION_INSTRUCTIONS: &str = "You revise application content by applying the selected feedback. \
Every feedback item must lead to a visible change; keep everything else intact. \
Reply with JSON only, in the same shape as the original content.";

/// The four pipeline stages backed by one chat model.
#[derive(Debug, Clone)]
pub struct LlmStages {
    client: ChatClient,
}

impl LlmStages {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

fn context(job: &JobPosting, profile: &FilteredProfile) -> String {
    format!(
        "JOB POSTING:\n{}\n\nAPPLICANT PROFILE:\n{}",
        format::job_posting(job),
        format::filtered_profile(profile)
    )
}

#[async_trait]
impl RelevanceStage for LlmStages {
    async fn select(
        &self,
        job: &JobPosting,
        profile: &CanonicalProfile,
    ) -> Result<FilteredProfile, AgentError> {
        let user = format!(
            "JOB POSTING:\n{}\n\nAPPLICANT PROFILE:\n{}",
            format::job_posting(job),
            format::canonical_profile(profile)
        );
        let filtered: FilteredProfile = self
            .client
            .complete_json(RELEVANCE_INSTRUCTIONS, &user)
            .await?;
        info!(version = %filtered.selected_profile_version, "profile variant selected");
        Ok(filtered)
    }
}

#[async_trait]
impl GenerationStage for LlmStages {
    async fn generate(
        &self,
        task: &GenerationTask,
        job: &JobPosting,
        profile: &FilteredProfile,
    ) -> Result<GeneratedContent, AgentError> {
        let context = context(job, profile);
        match task {
            GenerationTask::CoverLetter => {
                let letter: CoverLetter = self
                    .client
                    .complete_json(COVER_LETTER_INSTRUCTIONS, &context)
                    .await?;
                Ok(letter.into())
            }
            GenerationTask::Answer { question } => {
                let user = format!("{}\n\nHR QUESTION:\n{}", context, question);
                let answer: QuestionAnswer = self
                    .client
                    .complete_json(ANSWER_INSTRUCTIONS, &user)
                    .await?;
                Ok(answer.into())
            }
        }
    }
}

#[async_trait]
impl FeedbackStage for LlmStages {
    async fn review(
        &self,
        content: &GeneratedContent,
        job: &JobPosting,
        profile: &FilteredProfile,
    ) -> Result<FeedbackReport, AgentError> {
        let user = format!(
            "{}\n\nCONTENT TO REVIEW:\n{}",
            context(job, profile),
            format::generated_content(content)
        );
        self.client.complete_json(FEEDBACK_INSTRUCTIONS, &user).await
    }
}

#[async_trait]
impl ModificationStage for LlmStages {
    async fn modify(&self, input: &ModificationInput) -> Result<GeneratedContent, AgentError> {
        let user = format!(
            "{}\n\nORIGINAL CONTENT:\n{}\n\n{}",
            context(&input.job, &input.profile),
            format::generated_content(&input.original),
            input.instructions
        );
        match &input.original {
            GeneratedContent::CoverLetter(_) => {
                let letter: CoverLetter = self
                    .client
                    .complete_json(MODIFICATION_INSTRUCTIONS, &user)
                    .await?;
                Ok(letter.into())
            }
            GeneratedContent::QuestionAnswer(_) => {
                let answer: QuestionAnswer = self
                    .client
                    .complete_json(MODIFICATION_INSTRUCTIONS, &user)
                    .await?;
                Ok(answer.into())
            }
        }
    }
}
