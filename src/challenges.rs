use crate::cache::{CacheEntry, CacheSlot, Expiry, get_or_fetch_at};
use crate::errors::{ChallengeError, GenerationError};
use crate::gemini::ChallengeDraft;
use crate::models::{Challenge, CompletedChallenge, DailyProgress, Level};
use crate::progress::{ProgressEvent, record_event};
use crate::state::AppState;
use crate::storage::{PersistedStore, keys};
use crate::theme::{DailyTheme, theme_for};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub per_blank: Vec<bool>,
    pub is_correct: bool,
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Compares answers to the solution blank by blank, ignoring case and
/// surrounding whitespace. A missing answer counts as empty.
pub fn grade(solution: &[String], answers: &[String]) -> Grade {
    let per_blank: Vec<bool> = solution
        .iter()
        .enumerate()
        .map(|(index, expected)| {
            let given = answers.get(index).map(String::as_str).unwrap_or("");
            normalize(given) == normalize(expected)
        })
        .collect();
    let is_correct = per_blank.iter().all(|ok| *ok);
    Grade { per_blank, is_correct }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCard {
    pub challenge: Challenge,
    pub story_parts: Vec<String>,
    pub completed: Option<CompletedChallenge>,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeBoard {
    pub theme: DailyTheme,
    pub level: Option<Level>,
    pub challenges: Vec<ChallengeCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub grade: Grade,
    pub solution: Vec<String>,
    pub record: CompletedChallenge,
    pub progress: DailyProgress,
}

/// Today's challenge set for the daily theme, generated at most once per
/// UTC day unless generation fails. When two requests miss the cache at
/// once, only the newer one's set is stored and returned.
pub async fn todays_challenges_at(state: &AppState, now: DateTime<Utc>) -> Result<Vec<Challenge>, ChallengeError> {
    let theme = theme_for(now);
    let slot = CacheSlot {
        key: keys::DAILY_CHALLENGES,
        partition: Some(theme.category),
        expiry: Expiry::EndOfDay,
    };

    get_or_fetch_at(&state.store, slot, &state.gates.challenges, now, move || async move {
        let drafts = state.generator.generate_challenges(&theme).await.map_err(|err| {
            error!("challenge generation failed: {err}");
            ChallengeError::Remote(err)
        })?;
        let challenges = into_challenges(drafts, &theme);
        if challenges.is_empty() {
            return Err(ChallengeError::Remote(GenerationError::Empty));
        }
        info!(count = challenges.len(), theme = theme.title, "generated challenges");
        Ok(challenges)
    })
    .await
}

fn into_challenges(drafts: Vec<ChallengeDraft>, theme: &DailyTheme) -> Vec<Challenge> {
    drafts
        .into_iter()
        .filter_map(|draft| {
            let level = match draft.level.parse::<Level>() {
                Ok(level) => level,
                Err(reason) => {
                    warn!(title = %draft.title, "skipping generated challenge: {reason}");
                    return None;
                }
            };
            let challenge = Challenge {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                story_with_blanks: draft.story_with_blanks,
                solution: draft.solution,
                level,
                category: theme.category.to_string(),
            };
            if challenge.blank_count() != challenge.solution.len() {
                warn!(
                    title = %challenge.title,
                    blanks = challenge.blank_count(),
                    answers = challenge.solution.len(),
                    "generated challenge has mismatched blanks"
                );
            }
            Some(challenge)
        })
        .collect()
}

pub async fn challenge_board_at(
    state: &AppState,
    level: Option<Level>,
    now: DateTime<Utc>,
) -> Result<ChallengeBoard, ChallengeError> {
    let challenges = todays_challenges_at(state, now).await?;
    let history: Vec<CompletedChallenge> = state.store.get(keys::COMPLETED_CHALLENGES, Vec::new()).await;

    let challenges = challenges
        .into_iter()
        .filter(|challenge| level.is_none_or(|level| challenge.level == level))
        .map(|challenge| {
            let completed = history.iter().find(|c| c.challenge_id == challenge.id).cloned();
            let grade = completed
                .as_ref()
                .map(|record| grade(&challenge.solution, &record.user_answers));
            ChallengeCard {
                story_parts: challenge.story_parts().into_iter().map(str::to_string).collect(),
                challenge,
                completed,
                grade,
            }
        })
        .collect();

    Ok(ChallengeBoard {
        theme: theme_for(now),
        level,
        challenges,
    })
}

/// Finds a challenge in whatever set is currently stored, expired or not.
async fn stored_challenge(store: &PersistedStore, challenge_id: &str) -> Option<Challenge> {
    store
        .get_opt::<CacheEntry<Vec<Challenge>>>(keys::DAILY_CHALLENGES)
        .await?
        .payload
        .into_iter()
        .find(|challenge| challenge.id == challenge_id)
}

pub async fn submit_answers(
    state: &AppState,
    challenge_id: &str,
    answers: Vec<String>,
) -> Result<Submission, ChallengeError> {
    submit_answers_at(state, challenge_id, answers, Utc::now()).await
}

/// Grades a submission and records it. Resubmitting replaces the earlier
/// record in place but counts as another attempt for today.
pub async fn submit_answers_at(
    state: &AppState,
    challenge_id: &str,
    mut answers: Vec<String>,
    now: DateTime<Utc>,
) -> Result<Submission, ChallengeError> {
    let challenge = stored_challenge(&state.store, challenge_id)
        .await
        .ok_or_else(|| ChallengeError::UnknownChallenge(challenge_id.to_string()))?;

    let grade = grade(&challenge.solution, &answers);
    answers.resize(challenge.solution.len(), String::new());
    let record = CompletedChallenge {
        challenge_id: challenge.id.clone(),
        completed_at: now,
        user_answers: answers,
        is_correct: grade.is_correct,
        level: challenge.level,
        category: challenge.category.clone(),
    };

    let stored = record.clone();
    state
        .store
        .update(keys::COMPLETED_CHALLENGES, Vec::<CompletedChallenge>::new(), move |history| {
            upsert(history, stored)
        })
        .await?;

    let progress = record_event(
        &state.store,
        ProgressEvent::ChallengeSubmitted {
            correct: grade.is_correct,
        },
        now.date_naive(),
    )
    .await?;
    info!(challenge = %challenge.id, correct = grade.is_correct, "challenge submitted");

    Ok(Submission {
        grade,
        solution: challenge.solution,
        record,
        progress,
    })
}

fn upsert(history: &mut Vec<CompletedChallenge>, record: CompletedChallenge) {
    match history.iter_mut().find(|c| c.challenge_id == record.challenge_id) {
        Some(existing) => *existing = record,
        None => history.push(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::app_state;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 20, 10, 0, 0).unwrap()
    }

    #[test]
    fn grading_ignores_case_and_edge_whitespace() {
        let result = grade(&strings(&["went", "had"]), &strings(&["Went ", " had"]));
        assert_eq!(result.per_blank, vec![true, true]);
        assert!(result.is_correct);
    }

    #[test]
    fn grading_reports_each_blank() {
        let result = grade(&strings(&["went", "had"]), &strings(&["go", "had"]));
        assert_eq!(result.per_blank, vec![false, true]);
        assert!(!result.is_correct);
    }

    #[test]
    fn inner_whitespace_still_matters() {
        let result = grade(&strings(&["had been"]), &strings(&["had  been"]));
        assert!(!result.is_correct);
    }

    #[test]
    fn missing_answers_are_wrong() {
        let result = grade(&strings(&["went", "had"]), &strings(&["went"]));
        assert_eq!(result.per_blank, vec![true, false]);
    }

    #[tokio::test]
    async fn challenges_are_generated_once_per_day() {
        let (state, generator) = app_state();
        generator.draft("Trip", "We ___ to Rome.", &["went"], "Easy");

        let first = todays_challenges_at(&state, now()).await.unwrap();
        let later = todays_challenges_at(&state, now() + Duration::hours(5)).await.unwrap();

        assert_eq!(first, later);
        assert_eq!(generator.challenge_calls.load(Ordering::SeqCst), 1);
        assert_eq!(first[0].category, theme_for(now()).category);
    }

    #[tokio::test]
    async fn next_day_regenerates() {
        let (state, generator) = app_state();
        generator.draft("Trip", "We ___ to Rome.", &["went"], "Easy");

        todays_challenges_at(&state, now()).await.unwrap();
        todays_challenges_at(&state, now() + Duration::days(1)).await.unwrap();
        assert_eq!(generator.challenge_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_generation_is_an_error_and_not_cached() {
        let (state, generator) = app_state();

        let err = todays_challenges_at(&state, now()).await.unwrap_err();
        assert!(matches!(err, ChallengeError::Remote(GenerationError::Empty)));
        assert!(
            state
                .store
                .get_opt::<CacheEntry<Vec<Challenge>>>(keys::DAILY_CHALLENGES)
                .await
                .is_none()
        );

        generator.draft("Trip", "We ___ to Rome.", &["went"], "easy");
        let challenges = todays_challenges_at(&state, now()).await.unwrap();
        assert_eq!(challenges[0].level, Level::Easy);
    }

    #[tokio::test]
    async fn overlapping_generation_keeps_the_newer_set() {
        let (state, generator) = app_state();
        generator.draft("Trip", "We ___ to Rome.", &["went"], "Easy");
        let served: Arc<Mutex<Option<Vec<Challenge>>>> = Arc::default();
        let (newer, newer_served) = (state.clone(), served.clone());
        generator.during_next_call(Box::new(move || {
            Box::pin(async move {
                let set = todays_challenges_at(&newer, now()).await.unwrap();
                *newer_served.lock().unwrap() = Some(set);
            })
        }));

        let err = todays_challenges_at(&state, now()).await.unwrap_err();
        assert!(matches!(err, ChallengeError::Superseded));
        assert_eq!(generator.challenge_calls.load(Ordering::SeqCst), 2);

        let served = served.lock().unwrap().take().unwrap();
        let stored = todays_challenges_at(&state, now()).await.unwrap();
        assert_eq!(stored, served);
        assert_eq!(generator.challenge_calls.load(Ordering::SeqCst), 2);

        let submission = submit_answers_at(&state, &served[0].id, strings(&["went"]), now()).await.unwrap();
        assert!(submission.grade.is_correct);
    }

    #[tokio::test]
    async fn unknown_levels_are_skipped() {
        let (state, generator) = app_state();
        generator.draft("Odd", "I ___.", &["ran"], "Extreme");
        generator.draft("Fine", "I ___.", &["ran"], "Hard");

        let challenges = todays_challenges_at(&state, now()).await.unwrap();
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].title, "Fine");
    }

    #[tokio::test]
    async fn board_filters_by_level_and_shows_completion() {
        let (state, generator) = app_state();
        generator.draft("Easy one", "I ___ home.", &["went"], "Easy");
        generator.draft("Hard one", "She ___ ___ there.", &["had", "been"], "Hard");

        let all = todays_challenges_at(&state, now()).await.unwrap();
        let hard_id = all.iter().find(|c| c.level == Level::Hard).unwrap().id.clone();
        submit_answers_at(&state, &hard_id, strings(&["had", "gone"]), now()).await.unwrap();

        let board = challenge_board_at(&state, Some(Level::Hard), now()).await.unwrap();
        assert_eq!(board.challenges.len(), 1);
        let card = &board.challenges[0];
        assert_eq!(card.story_parts, strings(&["She ", " ", " there."]));
        assert_eq!(card.grade.as_ref().unwrap().per_blank, vec![true, false]);
        assert!(!card.completed.as_ref().unwrap().is_correct);
    }

    #[tokio::test]
    async fn resubmission_overwrites_record_and_counts_twice() {
        let (state, generator) = app_state();
        generator.draft("First", "I ___ and ___.", &["went", "had"], "Medium");
        generator.draft("Second", "It ___.", &["rained"], "Easy");
        let challenges = todays_challenges_at(&state, now()).await.unwrap();
        let first = challenges[0].id.clone();
        let second = challenges[1].id.clone();

        submit_answers_at(&state, &first, strings(&["go", "had"]), now()).await.unwrap();
        submit_answers_at(&state, &second, strings(&["rained"]), now()).await.unwrap();
        let last = submit_answers_at(&state, &first, strings(&["Went ", " had"]), now())
            .await
            .unwrap();

        assert!(last.grade.is_correct);
        let history: Vec<CompletedChallenge> = state.store.get(keys::COMPLETED_CHALLENGES, Vec::new()).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].challenge_id, first);
        assert!(history[0].is_correct);
        assert_eq!(history[1].challenge_id, second);

        assert_eq!(last.progress.challenges_attempted, 3);
        assert_eq!(last.progress.total_answers, 3);
        assert_eq!(last.progress.correct_answers, 2);
        assert_eq!(last.progress.challenges_completed, 2);
    }

    #[tokio::test]
    async fn stored_answers_match_solution_length() {
        let (state, generator) = app_state();
        generator.draft("Pair", "I ___ and ___.", &["went", "had"], "Easy");
        let id = todays_challenges_at(&state, now()).await.unwrap()[0].id.clone();

        let submission = submit_answers_at(&state, &id, strings(&["went"]), now()).await.unwrap();
        assert_eq!(submission.record.user_answers, strings(&["went", ""]));
    }

    #[tokio::test]
    async fn unknown_challenge_is_rejected() {
        let (state, _generator) = app_state();
        let err = submit_answers_at(&state, "nope", Vec::new(), now()).await.unwrap_err();
        assert!(matches!(err, ChallengeError::UnknownChallenge(id) if id == "nope"));
    }
}
