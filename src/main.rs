use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use job_agent::{
    AgentError, ProfileNormalizer,
    config::Config,
    fetcher::HttpPageFetcher,
    llm::{ChatClient, LlmStages},
    pipeline::{JobSource, ModifyRequest, Orchestrator, PipelineOutput, RetryPolicy, Stages},
    telemetry, validate_and_analyze,
};

#[derive(Parser)]
#[command(name = "job-agent", version, about = "Tailored job application content from a posting and a profile")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a posting URL and identify the job board behind it
    Analyze { url: String },
    /// Extract a structured job posting
    Extract(JobArgs),
    /// Normalize a profile JSON file into the canonical shape
    Normalize { profile: PathBuf },
    /// Generate a cover letter with feedback
    CoverLetter {
        #[command(flatten)]
        job: JobArgs,
        #[arg(long)]
        profile: PathBuf,
    },
    /// Answer a recruiter question with feedback
    Answer {
        #[command(flatten)]
        job: JobArgs,
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        question: String,
    },
    /// Apply feedback from an earlier cover-letter/answer run
    Modify {
        /// JSON output of a previous `cover-letter` or `answer` run
        #[arg(long)]
        from: PathBuf,
        /// 1-based feedback items to apply, e.g. `--apply 1,3`
        #[arg(long, value_delimiter = ',')]
        apply: Vec<usize>,
    },
}

#[derive(Args)]
struct JobArgs {
    /// Job posting URL
    #[arg(long, conflicts_with = "text_file", required_unless_present = "text_file")]
    url: Option<String>,
    /// File holding a pasted job description
    #[arg(long)]
    text_file: Option<PathBuf>,
    /// Fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl JobArgs {
    fn source(&self) -> Result<JobSource> {
        match (&self.url, &self.text_file) {
            (Some(url), _) => Ok(JobSource::Url(url.clone())),
            (None, Some(path)) => Ok(JobSource::Text(
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
            )),
            (None, None) => bail!("either --url or --text-file is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Analyze { url } => print_json(&validate_and_analyze(&url)),
        Command::Normalize { profile } => {
            let raw = read_json(&profile)?;
            print_json(&ProfileNormalizer::new().normalize(&raw))
        }
        Command::Extract(job) => {
            let orchestrator = orchestrator(&config, job.timeout)?;
            let posting = orchestrator.load_job(&job.source()?).await.map_err(user_facing)?;
            print_json(&posting)
        }
        Command::CoverLetter { job, profile } => {
            let orchestrator = orchestrator(&config, job.timeout)?;
            let output = orchestrator
                .cover_letter(job.source()?, read_json(&profile)?)
                .await
                .map_err(user_facing)?;
            print_json(&output)
        }
        Command::Answer {
            job,
            profile,
            question,
        } => {
            let orchestrator = orchestrator(&config, job.timeout)?;
            let output = orchestrator
                .answer(job.source()?, read_json(&profile)?, question)
                .await
                .map_err(user_facing)?;
            print_json(&output)
        }
        Command::Modify { from, apply } => {
            let previous: PipelineOutput = serde_json::from_value(read_json(&from)?)
                .with_context(|| format!("{} is not a pipeline output", from.display()))?;
            let selected_feedback = apply
                .iter()
                .map(|&n| {
                    n.checked_sub(1)
                        .and_then(|i| previous.feedback.feedback_items.get(i))
                        .cloned()
                        .with_context(|| format!("no feedback item #{}", n))
                })
                .collect::<Result<Vec<_>>>()?;

            let orchestrator = orchestrator(&config, None)?;
            let content = orchestrator
                .modify(&ModifyRequest {
                    original: previous.content,
                    selected_feedback,
                    job: previous.job,
                    filtered_profile: previous.filtered_profile,
                })
                .await;
            print_json(&content)
        }
    }
}

fn orchestrator(config: &Config, timeout_secs: Option<u64>) -> Result<Orchestrator> {
    let config = match timeout_secs {
        Some(secs) => config.clone().with_fetch_timeout(Duration::from_secs(secs)),
        None => config.clone(),
    };
    let fetcher = Arc::new(HttpPageFetcher::new(config.fetch_timeout()));
    let client = ChatClient::from_config(&config).map_err(user_facing)?;
    let stages = Stages::shared(Arc::new(LlmStages::new(client)));
    Ok(Orchestrator::new(fetcher, stages, RetryPolicy::from_config(&config)))
}

fn user_facing(err: AgentError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", err.user_message, err)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
