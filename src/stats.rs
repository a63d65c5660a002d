use crate::errors::StorageError;
use crate::models::{CompletedChallenge, DailyProgress, GrammarError, Level};
use crate::progress::progress_for;
use crate::storage::{PersistedStore, keys};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub level: Level,
    pub attempted: usize,
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub total_attempted: usize,
    pub total_correct: usize,
    pub success_rate: u32,
    pub by_level: Vec<LevelStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub date: NaiveDate,
    pub today: Option<DailyProgress>,
    pub today_accuracy: u32,
    pub challenge_stats: ChallengeStats,
    pub mistake_bank: Vec<GrammarError>,
    pub completed_challenges: Vec<CompletedChallenge>,
}

/// Whole percent of `part` in `whole`, rounded half away from zero; 0 when
/// `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn challenge_stats(completed: &[CompletedChallenge]) -> ChallengeStats {
    let total_attempted = completed.len();
    let total_correct = completed.iter().filter(|c| c.is_correct).count();

    let by_level = Level::ALL
        .iter()
        .map(|&level| {
            let at_level = completed.iter().filter(|c| c.level == level);
            LevelStats {
                level,
                attempted: at_level.clone().count(),
                correct: at_level.filter(|c| c.is_correct).count(),
            }
        })
        .collect();

    ChallengeStats {
        total_attempted,
        total_correct,
        success_rate: percentage(total_correct as u64, total_attempted as u64),
        by_level,
    }
}

pub async fn build_report(store: &PersistedStore) -> ProgressReport {
    build_report_at(store, Utc::now().date_naive()).await
}

pub async fn build_report_at(store: &PersistedStore, today: NaiveDate) -> ProgressReport {
    let mistake_bank: Vec<GrammarError> = store.get(keys::MISTAKE_BANK, Vec::new()).await;
    let completed_challenges: Vec<CompletedChallenge> = store.get(keys::COMPLETED_CHALLENGES, Vec::new()).await;
    let today_progress = progress_for(store, today).await;
    let today_accuracy = today_progress
        .as_ref()
        .map(|p| percentage(p.correct_answers, p.total_answers))
        .unwrap_or(0);

    ProgressReport {
        date: today,
        today: today_progress,
        today_accuracy,
        challenge_stats: challenge_stats(&completed_challenges),
        mistake_bank,
        completed_challenges,
    }
}

/// Adds `error` to the mistake bank unless an entry with its id exists.
/// Returns whether it was added.
pub async fn save_mistake(store: &PersistedStore, error: GrammarError) -> Result<bool, StorageError> {
    store
        .update(keys::MISTAKE_BANK, Vec::<GrammarError>::new(), move |bank| {
            if bank.iter().any(|m| m.id == error.id) {
                return false;
            }
            bank.push(error);
            true
        })
        .await
}

pub async fn remove_mistake(store: &PersistedStore, id: &str) -> Result<bool, StorageError> {
    store
        .update(keys::MISTAKE_BANK, Vec::<GrammarError>::new(), |bank| {
            remove_where(bank, |m| m.id == id)
        })
        .await
}

pub async fn remove_completed(store: &PersistedStore, challenge_id: &str) -> Result<bool, StorageError> {
    store
        .update(keys::COMPLETED_CHALLENGES, Vec::<CompletedChallenge>::new(), |history| {
            remove_where(history, |c| c.challenge_id == challenge_id)
        })
        .await
}

fn remove_where<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}
