use crate::errors::StorageError;
use crate::models::DailyProgress;
use crate::storage::{PersistedStore, keys};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    AnalysisCompleted { mistakes: usize },
    ChallengeSubmitted { correct: bool },
}

impl DailyProgress {
    /// Folds one event into the record for `today`, starting over when the
    /// stored record belongs to another day.
    pub fn apply(self, event: ProgressEvent, today: NaiveDate) -> DailyProgress {
        let mut next = if self.date == today {
            self
        } else {
            DailyProgress::empty(today)
        };

        match event {
            ProgressEvent::AnalysisCompleted { mistakes } => {
                next.stories_analyzed = next.stories_analyzed.saturating_add(1);
                next.mistakes_found = next.mistakes_found.saturating_add(mistakes as u64);
            }
            ProgressEvent::ChallengeSubmitted { correct } => {
                next.challenges_attempted = next.challenges_attempted.saturating_add(1);
                next.total_answers = next.total_answers.saturating_add(1);
                if correct {
                    next.challenges_completed = next.challenges_completed.saturating_add(1);
                    next.correct_answers = next.correct_answers.saturating_add(1);
                }
            }
        }

        next
    }
}

pub async fn record_event(
    store: &PersistedStore,
    event: ProgressEvent,
    today: NaiveDate,
) -> Result<DailyProgress, StorageError> {
    store
        .update(keys::DAILY_PROGRESS, DailyProgress::empty(today), |current| {
            *current = current.clone().apply(event, today);
            current.clone()
        })
        .await
}

/// The stored record, if it belongs to `today`.
pub async fn progress_for(store: &PersistedStore, today: NaiveDate) -> Option<DailyProgress> {
    store
        .get_opt::<DailyProgress>(keys::DAILY_PROGRESS)
        .await
        .filter(|progress| progress.date == today)
}
