//! Scripted stand-in for the remote generation service.

use crate::errors::GenerationError;
use crate::gemini::{ChallengeDraft, ErrorAnnotation, GenerationService};
use crate::state::AppState;
use crate::storage::PersistedStore;
use crate::theme::DailyTheme;
use crate::theory::TenseDetail;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Hook = Box<dyn FnOnce() -> futures::future::BoxFuture<'static, ()> + Send>;

#[derive(Default)]
pub struct FakeGenerator {
    pub annotations: Mutex<Vec<ErrorAnnotation>>,
    pub drafts: Mutex<Vec<ChallengeDraft>>,
    pub prompt: Mutex<String>,
    pub examples: Mutex<Vec<String>>,
    pub failing_tenses: Mutex<HashSet<String>>,
    pub fail: AtomicBool,
    pub analyze_calls: AtomicUsize,
    pub challenge_calls: AtomicUsize,
    pub prompt_calls: AtomicUsize,
    pub example_calls: AtomicUsize,
    during_call: Mutex<Option<Hook>>,
}

impl FakeGenerator {
    pub fn annotate(&self, original: &str, corrected: &str) {
        self.annotations.lock().unwrap().push(ErrorAnnotation {
            original_text: original.to_string(),
            corrected_text: corrected.to_string(),
            explanation: format!("Use '{corrected}'."),
            kind: "Grammar".to_string(),
        });
    }

    pub fn draft(&self, title: &str, story: &str, solution: &[&str], level: &str) {
        self.drafts.lock().unwrap().push(ChallengeDraft {
            title: title.to_string(),
            story_with_blanks: story.to_string(),
            solution: solution.iter().map(|s| s.to_string()).collect(),
            level: level.to_string(),
        });
    }

    /// Runs `hook` inside the next remote call, before it returns.
    pub fn during_next_call(&self, hook: Hook) {
        *self.during_call.lock().unwrap() = Some(hook);
    }

    async fn enter(&self) -> Result<(), GenerationError> {
        let hook = self.during_call.lock().unwrap().take();
        if let Some(hook) = hook {
            hook().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::Status {
                status: 500,
                body: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationService for FakeGenerator {
    async fn analyze(&self, _text: &str) -> Result<Vec<ErrorAnnotation>, GenerationError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        Ok(self.annotations.lock().unwrap().clone())
    }

    async fn generate_challenges(&self, _theme: &DailyTheme) -> Result<Vec<ChallengeDraft>, GenerationError> {
        self.challenge_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        Ok(self.drafts.lock().unwrap().clone())
    }

    async fn generate_prompt(&self, _theme: &DailyTheme) -> Result<String, GenerationError> {
        self.prompt_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        Ok(self.prompt.lock().unwrap().clone())
    }

    async fn generate_examples(&self, tense: &TenseDetail) -> Result<Vec<String>, GenerationError> {
        self.example_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        if self.failing_tenses.lock().unwrap().contains(tense.name) {
            return Err(GenerationError::Empty);
        }
        Ok(self.examples.lock().unwrap().clone())
    }
}

pub fn app_state() -> (AppState, Arc<FakeGenerator>) {
    let generator = Arc::new(FakeGenerator::default());
    let state = AppState::new(PersistedStore::in_memory(), generator.clone());
    (state, generator)
}
