use crate::cache::{CacheSlot, EXAMPLES_TTL_HOURS, Expiry, get_or_fetch_at};
use crate::errors::{GenerationError, PromptError};
use crate::models::PromptResponse;
use crate::state::AppState;
use crate::storage::keys;
use crate::theme::theme_for;
use crate::theory::TENSES_GUIDE;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{error, warn};

pub const EXAMPLE_FALLBACK: &str = "Could not load an example at this time.";
const EXAMPLES_PER_TENSE: usize = 3;

pub type ExampleMap = BTreeMap<String, Vec<String>>;

pub async fn daily_prompt_at(state: &AppState, now: DateTime<Utc>) -> Result<PromptResponse, PromptError> {
    let theme = theme_for(now);
    let slot = CacheSlot {
        key: keys::DAILY_PROMPT,
        partition: Some(theme.category),
        expiry: Expiry::EndOfDay,
    };

    let prompt = get_or_fetch_at(&state.store, slot, &state.gates.prompt, now, move || async move {
        state.generator.generate_prompt(&theme).await.map_err(|err| {
            error!("prompt generation failed: {err}");
            PromptError::Remote(err)
        })
    })
    .await?;
    Ok(PromptResponse { theme, prompt })
}

/// Example sentences for every tense in the guide, refreshed every 12 hours.
pub async fn tense_examples_at(state: &AppState, now: DateTime<Utc>) -> Result<ExampleMap, PromptError> {
    let slot = CacheSlot {
        key: keys::TENSE_EXAMPLES,
        partition: None,
        expiry: Expiry::After(Duration::hours(EXAMPLES_TTL_HOURS)),
    };

    get_or_fetch_at(&state.store, slot, &state.gates.examples, now, move || async move {
        generate_all_examples(state).await
    })
    .await
}

/// Requests every tense concurrently. A tense that fails gets a fallback
/// line; the whole batch fails only when no tense succeeds.
async fn generate_all_examples(state: &AppState) -> Result<ExampleMap, PromptError> {
    let tenses: Vec<_> = TENSES_GUIDE.tenses().collect();
    let results = join_all(tenses.iter().map(|tense| state.generator.generate_examples(tense))).await;

    let mut examples = ExampleMap::new();
    let mut last_error: Option<GenerationError> = None;
    let mut succeeded = 0usize;
    for (tense, result) in tenses.iter().zip(results) {
        let lines = match result {
            Ok(mut lines) => {
                succeeded += 1;
                lines.truncate(EXAMPLES_PER_TENSE);
                lines
            }
            Err(err) => {
                warn!(tense = tense.name, "example generation failed: {err}");
                last_error = Some(err);
                vec![EXAMPLE_FALLBACK.to_string()]
            }
        };
        examples.insert(tense.name.to_string(), lines);
    }

    if succeeded == 0 {
        return Err(PromptError::Examples(last_error.unwrap_or(GenerationError::Empty)));
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::app_state;
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn prompt_is_cached_for_the_day() {
        let (state, generator) = app_state();
        *generator.prompt.lock().unwrap() = "Describe your last holiday.".to_string();

        let first = daily_prompt_at(&state, now()).await.unwrap();
        *generator.prompt.lock().unwrap() = "Something else.".to_string();
        let second = daily_prompt_at(&state, now() + Duration::hours(10)).await.unwrap();

        assert_eq!(first.prompt, "Describe your last holiday.");
        assert_eq!(second.prompt, first.prompt);
        assert_eq!(first.theme, theme_for(now()));
        assert_eq!(generator.prompt_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn overlapping_prompt_requests_keep_the_newer_prompt() {
        let (state, generator) = app_state();
        *generator.prompt.lock().unwrap() = "Write about a storm.".to_string();
        let (newer, scripted) = (state.clone(), generator.clone());
        generator.during_next_call(Box::new(move || {
            Box::pin(async move {
                *scripted.prompt.lock().unwrap() = "Write about a picnic.".to_string();
                daily_prompt_at(&newer, now()).await.unwrap();
                *scripted.prompt.lock().unwrap() = "Write about a storm.".to_string();
            })
        }));

        let err = daily_prompt_at(&state, now()).await.unwrap_err();
        assert!(matches!(err, PromptError::Superseded));

        let cached = daily_prompt_at(&state, now()).await.unwrap();
        assert_eq!(cached.prompt, "Write about a picnic.");
        assert_eq!(generator.prompt_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prompt_failure_is_surfaced() {
        let (state, generator) = app_state();
        generator.fail.store(true, Ordering::SeqCst);

        let err = daily_prompt_at(&state, now()).await.unwrap_err();
        assert!(matches!(err, PromptError::Remote(_)));
    }

    #[tokio::test]
    async fn examples_cover_every_tense_and_expire_after_twelve_hours() {
        let (state, generator) = app_state();
        *generator.examples.lock().unwrap() =
            vec!["One.".to_string(), "Two.".to_string(), "Three.".to_string(), "Four.".to_string()];

        let examples = tense_examples_at(&state, now()).await.unwrap();
        assert_eq!(examples.len(), 12);
        assert!(examples.values().all(|lines| lines.len() == 3));
        assert_eq!(generator.example_calls.load(Ordering::SeqCst), 12);

        tense_examples_at(&state, now() + Duration::hours(11)).await.unwrap();
        assert_eq!(generator.example_calls.load(Ordering::SeqCst), 12);

        tense_examples_at(&state, now() + Duration::hours(12)).await.unwrap();
        assert_eq!(generator.example_calls.load(Ordering::SeqCst), 24);
    }

    #[tokio::test]
    async fn failing_tense_gets_fallback_line() {
        let (state, generator) = app_state();
        *generator.examples.lock().unwrap() = vec!["I walk.".to_string()];
        generator.failing_tenses.lock().unwrap().insert("Past Perfect".to_string());

        let examples = tense_examples_at(&state, now()).await.unwrap();
        assert_eq!(examples["Past Perfect"], vec![EXAMPLE_FALLBACK.to_string()]);
        assert_eq!(examples["Simple Present"], vec!["I walk.".to_string()]);
    }

    #[tokio::test]
    async fn all_tenses_failing_caches_nothing() {
        let (state, generator) = app_state();
        generator.fail.store(true, Ordering::SeqCst);

        let err = tense_examples_at(&state, now()).await.unwrap_err();
        assert!(matches!(err, PromptError::Examples(_)));

        generator.fail.store(false, Ordering::SeqCst);
        *generator.examples.lock().unwrap() = vec!["Ok.".to_string()];
        tense_examples_at(&state, now()).await.unwrap();
        assert_eq!(generator.example_calls.load(Ordering::SeqCst), 24);
    }
}
