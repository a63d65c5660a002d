use crate::errors::AnalysisError;
use crate::gemini::ErrorAnnotation;
use crate::models::{DailyProgress, GrammarError};
use crate::progress::{ProgressEvent, record_event};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

/// A run of the analyzed text, either untouched or covered by one mistake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Segment {
    Plain { text: String },
    Highlight { error_id: String, start: usize, text: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub text: String,
    pub errors: Vec<GrammarError>,
    pub segments: Vec<Segment>,
    pub progress: DailyProgress,
}

pub async fn analyze_story(state: &AppState, text: &str) -> Result<AnalysisResult, AnalysisError> {
    analyze_story_at(state, text, Utc::now()).await
}

pub async fn analyze_story_at(
    state: &AppState,
    text: &str,
    now: DateTime<Utc>,
) -> Result<AnalysisResult, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyText);
    }

    let token = state.gates.analysis.begin().await;
    let annotations = state.generator.analyze(text).await.map_err(|err| {
        error!("grammar analysis failed: {err}");
        AnalysisError::Remote(err)
    })?;
    let errors: Vec<GrammarError> = annotations.into_iter().map(with_fresh_id).collect();

    let Some(_commit) = state.gates.analysis.claim(token).await else {
        warn!("dropping analysis result superseded by a newer request");
        return Err(AnalysisError::Superseded);
    };

    let progress = record_event(
        &state.store,
        ProgressEvent::AnalysisCompleted {
            mistakes: errors.len(),
        },
        now.date_naive(),
    )
    .await?;
    info!(mistakes = errors.len(), "story analyzed");

    let result = AnalysisResult {
        segments: highlight(text, &errors),
        text: text.to_string(),
        errors,
        progress,
    };
    *state.latest_analysis.lock().await = Some(result.clone());
    Ok(result)
}

fn with_fresh_id(annotation: ErrorAnnotation) -> GrammarError {
    GrammarError {
        id: Uuid::new_v4().to_string(),
        original_text: annotation.original_text,
        corrected_text: annotation.corrected_text,
        explanation: annotation.explanation,
        kind: annotation.kind,
    }
}

/// Splits `text` into plain and highlighted runs.
///
/// Mistakes are visited in order of their first occurrence; each one claims
/// the first match that starts at or after the end of the previous claim.
/// Mistakes with no such match (or an empty original text) get no span.
pub fn highlight(text: &str, errors: &[GrammarError]) -> Vec<Segment> {
    let mut ordered: Vec<&GrammarError> = errors.iter().filter(|e| !e.original_text.is_empty()).collect();
    ordered.sort_by_key(|e| text.find(e.original_text.as_str()));

    let mut segments = Vec::new();
    let mut last = 0;
    for error in ordered {
        let Some(offset) = text[last..].find(error.original_text.as_str()) else {
            continue;
        };
        let start = last + offset;
        if start > last {
            segments.push(Segment::Plain {
                text: text[last..start].to_string(),
            });
        }
        segments.push(Segment::Highlight {
            error_id: error.id.clone(),
            start,
            text: error.original_text.clone(),
        });
        last = start + error.original_text.len();
    }

    if last < text.len() {
        segments.push(Segment::Plain {
            text: text[last..].to_string(),
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use crate::testing::app_state;
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;

    fn error(id: &str, original: &str) -> GrammarError {
        GrammarError {
            id: id.to_string(),
            original_text: original.to_string(),
            corrected_text: String::new(),
            explanation: String::new(),
            kind: "Grammar".to_string(),
        }
    }

    fn highlighted(segments: &[Segment]) -> Vec<(usize, &str)> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Highlight { start, text, .. } => Some((*start, text.as_str())),
                Segment::Plain { .. } => None,
            })
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn single_mistake_highlights_first_occurrence() {
        let segments = highlight("I are happy", &[error("a", "I are")]);
        assert_eq!(
            segments,
            vec![
                Segment::Highlight {
                    error_id: "a".to_string(),
                    start: 0,
                    text: "I are".to_string()
                },
                Segment::Plain {
                    text: " happy".to_string()
                },
            ]
        );
    }

    #[test]
    fn repeated_phrase_claims_successive_matches() {
        let text = "he go home and he go out";
        let segments = highlight(text, &[error("a", "he go"), error("b", "he go")]);
        assert_eq!(highlighted(&segments), vec![(0, "he go"), (15, "he go")]);
    }

    #[test]
    fn errors_are_ordered_by_position_not_input_order() {
        let text = "She have two cat.";
        let segments = highlight(text, &[error("b", "cat"), error("a", "have")]);
        assert_eq!(highlighted(&segments), vec![(4, "have"), (13, "cat")]);
    }

    #[test]
    fn unlocatable_and_empty_mistakes_are_skipped() {
        let text = "Yesterday I go to school.";
        let segments = highlight(text, &[error("a", "missing"), error("b", ""), error("c", "go")]);
        assert_eq!(highlighted(&segments), vec![(12, "go")]);
        let rebuilt: String = segments
            .iter()
            .map(|s| match s {
                Segment::Plain { text } | Segment::Highlight { text, .. } => text.as_str(),
            })
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn no_errors_yields_plain_text() {
        let segments = highlight("All fine.", &[]);
        assert_eq!(
            segments,
            vec![Segment::Plain {
                text: "All fine.".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_remote_call() {
        let (state, generator) = app_state();
        let err = analyze_story_at(&state, "   \n\t", now()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyText));
        assert_eq!(generator.analyze_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn analysis_records_daily_progress() {
        let (state, generator) = app_state();
        generator.annotate("I are", "I am");

        let result = analyze_story_at(&state, "I are happy", now()).await.unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(highlighted(&result.segments), vec![(0, "I are")]);
        assert_eq!(result.progress.date, now().date_naive());
        assert_eq!(result.progress.stories_analyzed, 1);
        assert_eq!(result.progress.mistakes_found, 1);

        let stored: DailyProgress = state.store.get_opt(keys::DAILY_PROGRESS).await.unwrap();
        assert_eq!(stored, result.progress);
        assert!(state.latest_analysis.lock().await.is_some());
    }

    #[tokio::test]
    async fn each_error_gets_a_unique_id() {
        let (state, generator) = app_state();
        generator.annotate("go", "went");
        generator.annotate("go", "went");

        let result = analyze_story_at(&state, "I go and go", now()).await.unwrap();
        assert_ne!(result.errors[0].id, result.errors[1].id);
    }

    #[tokio::test]
    async fn remote_failure_leaves_progress_untouched() {
        let (state, generator) = app_state();
        generator.fail.store(true, Ordering::SeqCst);

        let err = analyze_story_at(&state, "Some text", now()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Remote(_)));
        assert!(
            state
                .store
                .get_opt::<DailyProgress>(keys::DAILY_PROGRESS)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn superseded_response_is_dropped() {
        let (state, generator) = app_state();
        generator.annotate("I are", "I am");
        let newer = state.clone();
        generator.during_next_call(Box::new(move || {
            Box::pin(async move {
                newer.gates.analysis.begin().await;
            })
        }));

        let err = analyze_story_at(&state, "I are happy", now()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Superseded));
        assert!(state.latest_analysis.lock().await.is_none());
        assert!(
            state
                .store
                .get_opt::<DailyProgress>(keys::DAILY_PROGRESS)
                .await
                .is_none()
        );
    }
}
