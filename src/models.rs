use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One annotated mistake returned by grammar analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarError {
    pub id: String,
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];
}

impl FromStr for Level {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

/// Marker for a fill-in position inside `story_with_blanks`.
pub const BLANK_MARKER: &str = "___";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub story_with_blanks: String,
    pub solution: Vec<String>,
    pub level: Level,
    pub category: String,
}

impl Challenge {
    pub fn blank_count(&self) -> usize {
        self.story_with_blanks.matches(BLANK_MARKER).count()
    }

    /// Text around the blanks; an input goes between consecutive parts.
    pub fn story_parts(&self) -> Vec<&str> {
        self.story_with_blanks.split(BLANK_MARKER).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChallenge {
    pub challenge_id: String,
    pub completed_at: DateTime<Utc>,
    pub user_answers: Vec<String>,
    pub is_correct: bool,
    pub level: Level,
    pub category: String,
}

/// Running counters for a single UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    #[serde(default)]
    pub stories_analyzed: u64,
    #[serde(default)]
    pub mistakes_found: u64,
    #[serde(default)]
    pub challenges_completed: u64,
    #[serde(default)]
    pub challenges_attempted: u64,
    #[serde(default)]
    pub correct_answers: u64,
    #[serde(default)]
    pub total_answers: u64,
}

impl DailyProgress {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            stories_analyzed: 0,
            mistakes_found: 0,
            challenges_completed: 0,
            challenges_attempted: 0,
            correct_answers: 0,
            total_answers: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    pub level: Option<Level>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub theme: crate::theme::DailyTheme,
    pub prompt: String,
}
