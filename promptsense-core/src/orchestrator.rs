//! Runs one external call per user-triggered submission and normalizes the outcome.
//!
//! The orchestrator is the only place that talks to a [`PromptService`]. It
//! rejects empty inputs before any request goes out, bounds every call with the
//! configured timeout, checks the score range, and logs the detailed cause of
//! every failure. Callers get a plain [`ServiceError`] back and are expected to
//! show [`SERVICE_ERROR_MESSAGE`](crate::error::SERVICE_ERROR_MESSAGE).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::service::PromptService;
use crate::session::{Command, Completion, ServiceReply};
use crate::types::{AnalysisResult, IterationAdvice};

/// Fallback bound on a single outbound call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Wraps a shared [`PromptService`] with validation and a timeout.
#[derive(Clone)]
pub struct Orchestrator {
    service: Arc<dyn PromptService>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn PromptService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Scores and rewrites `prompt`.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for a blank prompt (no request is sent), `Timeout` when the
    /// service does not answer in time, `InvalidResponse` for a score outside
    /// 0..=100, and whatever the service itself reports.
    pub async fn run_analysis(&self, prompt: &str) -> Result<AnalysisResult> {
        require_text(prompt)?;
        info!(chars = prompt.len(), "starting analysis");
        let result = self.bounded(self.service.analyze(prompt)).await;
        let result = result.and_then(validate_analysis);
        log_failure("analysis", &result);
        result
    }

    /// Explains how `observed_output` diverged from `original_prompt`.
    ///
    /// # Errors
    ///
    /// `EmptyInput` if either text is blank, otherwise as [`Self::run_analysis`].
    pub async fn run_debug_advice(
        &self,
        original_prompt: &str,
        observed_output: &str,
    ) -> Result<IterationAdvice> {
        require_text(original_prompt)?;
        require_text(observed_output)?;
        info!(
            prompt_chars = original_prompt.len(),
            output_chars = observed_output.len(),
            "starting fix advice"
        );
        let result = self
            .bounded(self.service.fix_advice(original_prompt, observed_output))
            .await;
        log_failure("fix advice", &result);
        result
    }

    /// Executes a session [`Command`] and tags the outcome with its request id.
    pub async fn execute(&self, command: Command) -> Completion {
        match command {
            Command::Analyze { id, prompt } => {
                let result = self.run_analysis(&prompt).await.map(ServiceReply::Analysis);
                Completion { id, result }
            }
            Command::FixAdvice { id, prompt, observed_output } => {
                let result = self
                    .run_debug_advice(&prompt, &observed_output)
                    .await
                    .map(ServiceReply::Advice);
                Completion { id, result }
            }
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ServiceError::EmptyInput);
    }
    Ok(())
}

fn validate_analysis(result: AnalysisResult) -> Result<AnalysisResult> {
    if !(0..=100).contains(&result.score) {
        return Err(ServiceError::InvalidResponse(format!(
            "score {} outside 0..=100",
            result.score
        )));
    }
    Ok(result)
}

fn log_failure<T>(operation: &str, result: &Result<T>) {
    if let Err(e) = result {
        warn!(operation, error = %e, "service call failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::session::RequestId;
    use crate::types::GroupedChecklist;

    fn analysis(score: i64) -> AnalysisResult {
        AnalysisResult {
            score,
            summary: "ok".into(),
            strengths: vec![],
            weaknesses: vec![],
            checklist: GroupedChecklist::default(),
            prioritized_actions: vec![],
            refined_prompt: "Build a todo app.".into(),
            whats_changed: vec![],
        }
    }

    /// Counts calls and answers with a fixed score, or hangs when `hang` is set.
    struct Stub {
        calls: AtomicUsize,
        score: i64,
        hang: bool,
    }

    impl Stub {
        fn new(score: i64) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                score,
                hang: false,
            })
        }
    }

    #[async_trait]
    impl PromptService for Stub {
        async fn analyze(&self, _prompt: &str) -> Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            Ok(analysis(self.score))
        }

        async fn fix_advice(&self, _p: &str, _o: &str) -> Result<IterationAdvice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(IterationAdvice {
                misunderstanding: "m".into(),
                root_cause: "r".into(),
                fix: "f".into(),
            })
        }
    }

    #[tokio::test]
    async fn blank_prompt_never_reaches_the_service() {
        let stub = Stub::new(40);
        let orch = Orchestrator::new(stub.clone(), DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(orch.run_analysis("  \n\t").await, Err(ServiceError::EmptyInput)));
        assert!(matches!(
            orch.run_debug_advice("prompt", " ").await,
            Err(ServiceError::EmptyInput)
        ));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_run_is_a_fresh_call() {
        let stub = Stub::new(40);
        let orch = Orchestrator::new(stub.clone(), DEFAULT_REQUEST_TIMEOUT);
        orch.run_analysis("Build a todo app.").await.unwrap();
        orch.run_analysis("Build a todo app.").await.unwrap();
        orch.run_debug_advice("p", "o").await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let orch = Orchestrator::new(Stub::new(140), DEFAULT_REQUEST_TIMEOUT);
        let err = orch.run_analysis("Build a todo app.").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));

        let orch = Orchestrator::new(Stub::new(100), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(orch.run_analysis("Build a todo app.").await.unwrap().score, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_service_times_out() {
        let stub = Arc::new(Stub {
            calls: AtomicUsize::new(0),
            score: 40,
            hang: true,
        });
        let orch = Orchestrator::new(stub, Duration::from_secs(5));
        let err = orch.run_analysis("Build a todo app.").await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout { secs: 5 }));
    }

    #[tokio::test]
    async fn execute_tags_completion_with_request_id() {
        let orch = Orchestrator::new(Stub::new(40), DEFAULT_REQUEST_TIMEOUT);
        let id = RequestId::new();
        let completion = orch
            .execute(Command::FixAdvice {
                id,
                prompt: "p".into(),
                observed_output: "o".into(),
            })
            .await;
        assert_eq!(completion.id, id);
        assert!(matches!(completion.result, Ok(ServiceReply::Advice(ref a)) if a.fix == "f"));
    }
}
