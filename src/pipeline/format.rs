//! Deterministic plain-text renderings of pipeline inputs, used to build
//! stage requests. Blocks are separated by a blank line; list items are
//! bulleted under their heading.

use crate::extractor::JobPosting;
use crate::pipeline::content::{FeedbackItem, FilteredProfile, GeneratedContent};
use crate::profile::{CanonicalProfile, CareerEntry};

/// Responsibilities and requirements shown per job posting.
const JOB_LIST_LIMIT: usize = 5;

/// Appended to the feedback instructions when a modification came back unchanged.
pub const IDENTICAL_OUTPUT_AMENDMENT: &str = "\nIMPORTANT: The previous attempt matched the original. Apply each feedback item and change wording/structure so differences are visible.";

fn bulleted<S: AsRef<str>>(heading: &str, items: &[S]) -> String {
    let mut block = heading.to_string();
    for item in items {
        block.push_str("\n- ");
        block.push_str(item.as_ref());
    }
    block
}

fn first_few(items: &[String]) -> &[String] {
    &items[..items.len().min(JOB_LIST_LIMIT)]
}

pub fn job_posting(job: &JobPosting) -> String {
    let mut sections = Vec::new();

    if let Some(title) = &job.title {
        sections.push(format!("Title: {}", title));
    }
    sections.push(format!("Role Summary: {}", job.role_summary));

    if !job.responsibilities.is_empty() {
        sections.push(bulleted("Responsibilities:", first_few(&job.responsibilities)));
    }
    if !job.requirements.is_empty() {
        sections.push(bulleted("Requirements:", first_few(&job.requirements)));
    }
    sections.push(format!("Company Context: {}", job.company_context));

    sections.join("\n\n")
}

pub fn filtered_profile(profile: &FilteredProfile) -> String {
    let mut sections = vec![format!(
        "Selected Profile Version: {}",
        profile.selected_profile_version
    )];

    if !profile.content_guidance.trim().is_empty() {
        sections.push(format!(
            "Content Guidance (must follow):\n{}",
            profile.content_guidance.trim()
        ));
    }
    for (heading, items) in [
        ("Relevant Skills:", &profile.relevant_skills),
        ("Relevant Experience:", &profile.relevant_experience),
        ("Relevant Education:", &profile.relevant_education),
    ] {
        if !items.is_empty() {
            sections.push(bulleted(heading, items.as_slice()));
        }
    }
    sections.push(format!(
        "Motivational Alignment: {}",
        profile.motivational_alignment
    ));

    sections.join("\n\n")
}

/// Full profile rendering for relevance selection. Story initiators are
/// surfaced as content guidance for their slot.
pub fn canonical_profile(profile: &CanonicalProfile) -> String {
    let mut lines = vec![
        "Education Background:".to_string(),
        profile.education_background.clone(),
        "\nMotivation:".to_string(),
        profile.motivation.clone(),
        "\nCareer Background Variants:".to_string(),
    ];

    for (name, entry) in &profile.career_background.careers {
        match entry {
            None => lines.push(format!("\n{}: Not provided", name)),
            Some(CareerEntry::Text(text)) => {
                lines.push(format!("\n{}:", name));
                lines.push(format!("  {}", text));
            }
            Some(CareerEntry::Story(story)) => {
                lines.push(format!("\n{}:", name));
                if let Some(initiator) = &story.initiator {
                    lines.push(format!("  CONTENT GUIDANCE: {}", initiator));
                    lines.push(format!(
                        "  IMPORTANT: Follow this guidance when generating content for {}",
                        name
                    ));
                }
                if let Some(achievement) = &story.achievement_sample {
                    lines.push(format!("  Achievements: {}", achievement));
                }
                if let Some(education) = &story.education_profile {
                    lines.push(format!("  Education: {}", education));
                }
                if let Some(goals) = &story.motivation_goals {
                    lines.push(format!("  Motivation: {}", goals));
                }
            }
        }
    }

    lines.join("\n")
}

pub fn generated_content(content: &GeneratedContent) -> String {
    match content {
        GeneratedContent::CoverLetter(letter) => format!(
            "Cover Letter:\n\nTitle: {}\n\nBody:\n{}\n\n{}",
            letter.title,
            letter.body,
            bulleted("Key Points Used:", &letter.key_points_used)
        ),
        GeneratedContent::QuestionAnswer(qa) => {
            let mut text = format!("HR Question Answer:\n\nAnswer: {}\n", qa.answer);
            if !qa.assumptions.is_empty() {
                text.push('\n');
                text.push_str(&bulleted("Assumptions:", &qa.assumptions));
            }
            if let Some(question) = &qa.follow_up_question {
                text.push_str(&format!("\nFollow-up Question: {}", question));
            }
            text
        }
    }
}

pub fn selected_feedback(items: &[FeedbackItem]) -> String {
    if items.is_empty() {
        return "No feedback selected for application.".to_string();
    }

    let numbered: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}: {}", i + 1, item.kind.label(), item.suggestion))
        .collect();
    format!("Selected Feedback to Apply:\n{}", numbered.join("\n"))
}
