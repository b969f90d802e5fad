use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub key_points_used: Vec<String>,
}

/// Answer to a recruiter's screening question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub answer: String,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    CoverLetter,
    QuestionAnswer,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoverLetter => "cover_letter",
            Self::QuestionAnswer => "question_answer",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the generation and modification stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum GeneratedContent {
    CoverLetter(CoverLetter),
    QuestionAnswer(QuestionAnswer),
}

impl GeneratedContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::CoverLetter(_) => ContentKind::CoverLetter,
            Self::QuestionAnswer(_) => ContentKind::QuestionAnswer,
        }
    }

    /// The field a reader actually reads: the letter body or the answer.
    pub fn primary_text(&self) -> &str {
        match self {
            Self::CoverLetter(letter) => &letter.body,
            Self::QuestionAnswer(qa) => &qa.answer,
        }
    }

    /// True when `other` has the same kind and the same trimmed primary text.
    /// Titles, key points and assumptions are not compared.
    pub fn is_unchanged_from(&self, other: &GeneratedContent) -> bool {
        self.kind() == other.kind() && self.primary_text().trim() == other.primary_text().trim()
    }
}

impl From<CoverLetter> for GeneratedContent {
    fn from(letter: CoverLetter) -> Self {
        Self::CoverLetter(letter)
    }
}

impl From<QuestionAnswer> for GeneratedContent {
    fn from(answer: QuestionAnswer) -> Self {
        Self::QuestionAnswer(answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Tone,
    Alignment,
    Clarity,
    Emphasis,
    Structure,
}

impl FeedbackType {
    /// Capitalised name used when listing feedback for a reader.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tone => "Tone",
            Self::Alignment => "Alignment",
            Self::Clarity => "Clarity",
            Self::Emphasis => "Emphasis",
            Self::Structure => "Structure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    #[serde(default)]
    pub feedback_items: Vec<FeedbackItem>,
}

/// The slice of a profile judged relevant to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredProfile {
    pub selected_profile_version: String,
    #[serde(default)]
    pub relevant_skills: Vec<String>,
    #[serde(default)]
    pub relevant_experience: Vec<String>,
    #[serde(default)]
    pub relevant_education: Vec<String>,
    pub motivational_alignment: String,
    #[serde(default)]
    pub content_guidance: String,
}

impl FilteredProfile {
    /// Stand-in used when relevance selection fails.
    pub fn general() -> Self {
        Self {
            selected_profile_version: "General".to_string(),
            relevant_skills: Vec::new(),
            relevant_experience: Vec::new(),
            relevant_education: Vec::new(),
            motivational_alignment: "Seeking to apply skills to this role.".to_string(),
            content_guidance: String::new(),
        }
    }
}
