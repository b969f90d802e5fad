use async_trait::async_trait;
use mockall::{Sequence, mock};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use job_agent::errors::{AgentError, ErrorCategory};
use job_agent::extractor::JobPosting;
use job_agent::fetcher::{FetchError, FetchedPage, PageFetcher};
use job_agent::pipeline::format::IDENTICAL_OUTPUT_AMENDMENT;
use job_agent::pipeline::{
    CoverLetter, FeedbackItem, FeedbackReport, FeedbackStage, FeedbackType, FilteredProfile,
    GeneratedContent, GenerationStage, GenerationTask, JobSource, ModificationInput,
    ModificationStage, ModifyRequest, Orchestrator, QuestionAnswer, RelevanceStage, RetryPolicy,
    Stages,
};
use job_agent::profile::CanonicalProfile;

mock! {
    pub Fetcher {}
    #[async_trait]
    impl PageFetcher for Fetcher {
        async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
    }
}

mock! {
    pub Relevance {}
    #[async_trait]
    impl RelevanceStage for Relevance {
        async fn select(
            &self,
            job: &JobPosting,
            profile: &CanonicalProfile,
        ) -> Result<FilteredProfile, AgentError>;
    }
}

mock! {
    pub Generation {}
    #[async_trait]
    impl GenerationStage for Generation {
        async fn generate(
            &self,
            task: &GenerationTask,
            job: &JobPosting,
            profile: &FilteredProfile,
        ) -> Result<GeneratedContent, AgentError>;
    }
}

mock! {
    pub Feedback {}
    #[async_trait]
    impl FeedbackStage for Feedback {
        async fn review(
            &self,
            content: &GeneratedContent,
            job: &JobPosting,
            profile: &FilteredProfile,
        ) -> Result<FeedbackReport, AgentError>;
    }
}

mock! {
    pub Modification {}
    #[async_trait]
    impl ModificationStage for Modification {
        async fn modify(&self, input: &ModificationInput) -> Result<GeneratedContent, AgentError>;
    }
}

const JOB_URL: &str = "https://acme.io/careers/data-engineer";

const JOB_HTML: &str = r#"<html><head><title>Data Engineer | Acme</title></head><body>
<h1>Senior Data Engineer</h1>
<p>Responsibilities:</p>
<ul><li>Build batch and streaming pipelines in Spark</li><li>Own the warehouse data model</li></ul>
<p>About us:</p>
<p>Acme builds logistics software used by thousands of warehouses.</p>
</body></html>"#;

struct Mocks {
    fetcher: MockFetcher,
    relevance: MockRelevance,
    generation: MockGeneration,
    feedback: MockFeedback,
    modification: MockModification,
}

impl Mocks {
    fn new() -> Self {
        Self {
            fetcher: MockFetcher::new(),
            relevance: MockRelevance::new(),
            generation: MockGeneration::new(),
            feedback: MockFeedback::new(),
            modification: MockModification::new(),
        }
    }

    fn serving_job_page(mut self) -> Self {
        self.fetcher
            .expect_fetch_page()
            .withf(|url| url == JOB_URL)
            .times(1)
            .returning(|url| Ok(page(url, JOB_HTML)));
        self
    }

    fn build(self) -> Orchestrator {
        let stages = Stages::new(
            Arc::new(self.relevance),
            Arc::new(self.generation),
            Arc::new(self.feedback),
            Arc::new(self.modification),
        );
        Orchestrator::new(Arc::new(self.fetcher), stages, fast_retry())
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5)).without_jitter()
}

fn page(url: &str, body: &str) -> FetchedPage {
    FetchedPage {
        final_url: url.to_string(),
        body: body.to_string(),
    }
}

fn filtered() -> FilteredProfile {
    FilteredProfile {
        selected_profile_version: "data_engineering".to_string(),
        relevant_skills: vec!["Spark".to_string()],
        relevant_experience: vec!["Four years of Airflow".to_string()],
        relevant_education: vec![],
        motivational_alignment: "Wants to own pipelines end to end".to_string(),
        content_guidance: String::new(),
    }
}

fn letter(body: &str) -> GeneratedContent {
    CoverLetter {
        title: "Application for Senior Data Engineer".to_string(),
        body: body.to_string(),
        key_points_used: vec!["Spark".to_string()],
    }
    .into()
}

fn report() -> FeedbackReport {
    FeedbackReport {
        feedback_items: vec![tone_item()],
    }
}

fn tone_item() -> FeedbackItem {
    FeedbackItem {
        kind: FeedbackType::Tone,
        suggestion: "Open with the Spark migration".to_string(),
    }
}

fn raw_profile() -> serde_json::Value {
    json!({"data pipeline experience": "Four years running Airflow DAGs", "education": "BSc"})
}

fn modify_request(selected_feedback: Vec<FeedbackItem>) -> ModifyRequest {
    ModifyRequest {
        original: letter("Dear Acme team, I build pipelines."),
        selected_feedback,
        job: job_agent::extract(JOB_HTML, JOB_URL),
        filtered_profile: filtered(),
    }
}

#[tokio::test]
async fn test_generate_runs_stages_in_order() {
    let mut mocks = Mocks::new().serving_job_page();
    let mut seq = Sequence::new();

    mocks
        .relevance
        .expect_select()
        .withf(|job, profile| {
            job.title.as_deref() == Some("Senior Data Engineer")
                && profile.career_background.get("data_engineering").is_some()
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(filtered()));
    mocks
        .generation
        .expect_generate()
        .withf(|task, _, profile| {
            *task == GenerationTask::CoverLetter
                && profile.selected_profile_version == "data_engineering"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(letter("Dear Acme team, I build pipelines.")));
    mocks
        .feedback
        .expect_review()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(report()));

    let output = mocks
        .build()
        .cover_letter(JobSource::Url(JOB_URL.to_string()), raw_profile())
        .await
        .unwrap();

    assert_eq!(output.content, letter("Dear Acme team, I build pipelines."));
    assert_eq!(output.feedback, report());
    assert_eq!(output.filtered_profile, filtered());
    assert_eq!(output.job.responsibilities.len(), 2);
}

#[tokio::test]
async fn test_answer_task_carries_question() {
    let mut mocks = Mocks::new();
    mocks.relevance.expect_select().returning(|_, _| Ok(filtered()));
    mocks
        .generation
        .expect_generate()
        .withf(|task, job, _| {
            matches!(task, GenerationTask::Answer { question } if question == "Can you relocate?")
                && job.url == "manual"
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(QuestionAnswer {
                answer: "Yes, within the EU.".to_string(),
                assumptions: vec![],
                follow_up_question: None,
            }
            .into())
        });
    mocks
        .feedback
        .expect_review()
        .returning(|_, _, _| Ok(FeedbackReport::default()));

    let output = mocks
        .build()
        .answer(
            JobSource::Text("Platform Engineer\n\nRequirements:\n- Kubernetes in production".to_string()),
            raw_profile(),
            "Can you relocate?",
        )
        .await
        .unwrap();

    assert_eq!(output.content.primary_text(), "Yes, within the EU.");
    assert_eq!(output.job.title.as_deref(), Some("Platform Engineer"));
}

#[tokio::test]
async fn test_relevance_failure_degrades_to_general_profile() {
    let mut mocks = Mocks::new().serving_job_page();
    mocks
        .relevance
        .expect_select()
        .times(1)
        .returning(|_, _| Err(AgentError::parsing("model reply is not JSON")));
    mocks
        .generation
        .expect_generate()
        .withf(|_, _, profile| profile.selected_profile_version == "General")
        .times(1)
        .returning(|_, _, _| Ok(letter("Dear Acme team")));
    mocks
        .feedback
        .expect_review()
        .returning(|_, _, _| Ok(FeedbackReport::default()));

    let output = mocks
        .build()
        .cover_letter(JobSource::Url(JOB_URL.to_string()), raw_profile())
        .await
        .unwrap();

    assert_eq!(output.filtered_profile, FilteredProfile::general());
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let mut mocks = Mocks::new().serving_job_page();
    mocks.relevance.expect_select().returning(|_, _| Ok(filtered()));
    mocks
        .generation
        .expect_generate()
        .times(1)
        .returning(|_, _, _| Err(AgentError::generation("quota exceeded")));
    mocks.feedback.expect_review().times(0);

    let err = mocks
        .build()
        .cover_letter(JobSource::Url(JOB_URL.to_string()), raw_profile())
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Generation);
    assert!(err.user_message.contains("busy"));
}

#[tokio::test]
async fn test_feedback_failure_yields_empty_report() {
    let mut mocks = Mocks::new().serving_job_page();
    mocks.relevance.expect_select().returning(|_, _| Ok(filtered()));
    mocks
        .generation
        .expect_generate()
        .returning(|_, _, _| Ok(letter("Dear Acme team")));
    mocks
        .feedback
        .expect_review()
        .returning(|_, _, _| Err(AgentError::generation("model refused")));

    let output = mocks
        .build()
        .cover_letter(JobSource::Url(JOB_URL.to_string()), raw_profile())
        .await
        .unwrap();

    assert!(output.feedback.feedback_items.is_empty());
}

#[tokio::test]
async fn test_transient_fetch_failures_are_retried() {
    let mut mocks = Mocks::new();
    let mut seq = Sequence::new();
    mocks
        .fetcher
        .expect_fetch_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(FetchError::RequestTimeout));
    mocks
        .fetcher
        .expect_fetch_page()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|url| Ok(page(url, JOB_HTML)));

    let orchestrator = mocks.build();
    let job = orchestrator
        .load_job(&JobSource::Url(JOB_URL.to_string()))
        .await
        .unwrap();

    assert_eq!(job.title.as_deref(), Some("Senior Data Engineer"));
}

#[tokio::test]
async fn test_missing_posting_is_not_retried() {
    let mut mocks = Mocks::new();
    mocks.fetcher.expect_fetch_page().times(1).returning(|_| {
        Err(FetchError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            retriable: false,
        })
    });

    let err = mocks
        .build()
        .load_job(&JobSource::Url(JOB_URL.to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Network);
    assert!(err.user_message.contains("could not be found"));
    assert_eq!(err.details["url"], json!(JOB_URL));
}

#[tokio::test]
async fn test_login_walled_page_is_rejected() {
    let mut mocks = Mocks::new();
    mocks.fetcher.expect_fetch_page().times(1).returning(|_| {
        Ok(page(
            "https://www.linkedin.com/authwall?trk=jobs",
            "<html><body>Join to view this job</body></html>",
        ))
    });
    mocks.relevance.expect_select().times(0);

    let err = mocks
        .build()
        .cover_letter(
            JobSource::Url("https://www.linkedin.com/jobs/view/123".to_string()),
            raw_profile(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Authentication);
    assert!(err.user_message.contains("requires login to view"));
    assert_eq!(err.details["provider"], json!("LinkedIn"));
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_fetching() {
    // Unexpected fetches panic inside the mock
    for url in ["not a url", "https://facebook.com/acme/jobs"] {
        let err = Mocks::new()
            .build()
            .load_job(&JobSource::Url(url.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::Validation, "{url}");
        assert!(err.user_message.contains("valid job posting URL"));
    }
}

#[tokio::test]
async fn test_empty_pasted_text_is_rejected() {
    let err = Mocks::new()
        .build()
        .load_job(&JobSource::Text("  \n ".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::Validation);
}

#[tokio::test]
async fn test_identical_modification_is_retried_exactly_once() {
    let mut mocks = Mocks::new();
    let mut seq = Sequence::new();
    mocks
        .modification
        .expect_modify()
        .withf(|input| !input.instructions.contains(IDENTICAL_OUTPUT_AMENDMENT))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|input| Ok(input.original.clone()));
    mocks
        .modification
        .expect_modify()
        .withf(|input| {
            input.instructions.ends_with(IDENTICAL_OUTPUT_AMENDMENT)
                && input.instructions.contains("1. Tone: Open with the Spark migration")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|input| Ok(input.original.clone()));

    let request = modify_request(vec![tone_item()]);
    let content = mocks.build().modify(&request).await;

    // The retry result is accepted even though it is still identical
    assert_eq!(content, request.original);
}

#[tokio::test]
async fn test_retry_result_is_returned_when_it_differs() {
    let mut mocks = Mocks::new();
    let mut seq = Sequence::new();
    mocks
        .modification
        .expect_modify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(letter("  Dear Acme team, I build pipelines.\n")));
    mocks
        .modification
        .expect_modify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(letter("Dear Acme team, I led the Spark migration.")));

    let content = mocks.build().modify(&modify_request(vec![tone_item()])).await;
    assert_eq!(content.primary_text(), "Dear Acme team, I led the Spark migration.");
}

#[tokio::test]
async fn test_identical_modification_without_feedback_is_not_retried() {
    let mut mocks = Mocks::new();
    mocks
        .modification
        .expect_modify()
        .withf(|input| input.instructions == "No feedback selected for application.")
        .times(1)
        .returning(|input| Ok(input.original.clone()));

    let request = modify_request(vec![]);
    assert_eq!(mocks.build().modify(&request).await, request.original);
}

#[tokio::test]
async fn test_changed_modification_is_returned_directly() {
    let mut mocks = Mocks::new();
    mocks
        .modification
        .expect_modify()
        .times(1)
        .returning(|_| Ok(letter("Dear Acme team, I migrated nightly batches to Spark.")));

    let content = mocks.build().modify(&modify_request(vec![tone_item()])).await;
    assert_eq!(
        content.primary_text(),
        "Dear Acme team, I migrated nightly batches to Spark."
    );
}

#[tokio::test]
async fn test_modification_failure_returns_original() {
    let mut mocks = Mocks::new();
    mocks
        .modification
        .expect_modify()
        .times(1)
        .returning(|_| Err(AgentError::parsing("model reply is not JSON")));

    let request = modify_request(vec![tone_item()]);
    assert_eq!(mocks.build().modify(&request).await, request.original);
}

#[tokio::test]
async fn test_rate_limited_modification_is_retried_with_backoff() {
    let mut mocks = Mocks::new();
    let mut seq = Sequence::new();
    mocks
        .modification
        .expect_modify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(AgentError::rate_limited("429 Too Many Requests")));
    mocks
        .modification
        .expect_modify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(letter("Dear Acme team, I led the Spark migration.")));

    let content = mocks.build().modify(&modify_request(vec![tone_item()])).await;
    assert_eq!(content.primary_text(), "Dear Acme team, I led the Spark migration.");
}
