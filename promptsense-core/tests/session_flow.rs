//! End-to-end session flows against a stub service.
//!
//! Exercises: Session::update, Orchestrator::execute, highlight_new_lines,
//! driven the way the terminal front-end drives them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use promptsense_core::highlight::count_new_lines;
use promptsense_core::types::GroupedChecklist;
use promptsense_core::{
    AnalysisResult, AppMode, InputField, IterationAdvice, Orchestrator, PromptService,
    RequestStatus, SERVICE_ERROR_MESSAGE, ServiceError, Session, SessionEvent,
};

/// Echoes the prompt back as the refined prompt with a fixed score, or fails.
struct EchoService {
    score: i64,
    fail: bool,
    calls: AtomicUsize,
}

impl EchoService {
    fn ok(score: i64) -> Arc<Self> {
        Arc::new(Self {
            score,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            score: 0,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PromptService for EchoService {
    async fn analyze(&self, prompt: &str) -> Result<AnalysisResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Api {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(AnalysisResult {
            score: self.score,
            summary: "Needs a target user.".into(),
            strengths: vec!["Short".into()],
            weaknesses: vec!["Vague".into()],
            checklist: GroupedChecklist::default(),
            prioritized_actions: vec!["Add target user description".into()],
            refined_prompt: prompt.to_owned(),
            whats_changed: vec![],
        })
    }

    async fn fix_advice(
        &self,
        _prompt: &str,
        observed: &str,
    ) -> Result<IterationAdvice, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::EmptyContent);
        }
        Ok(IterationAdvice {
            misunderstanding: format!("Lovable interpreted this as {observed}"),
            root_cause: "No layout constraint".into(),
            fix: "Use a 7-column CSS grid.".into(),
        })
    }
}

/// Submits and, if a command was issued, runs it and feeds the completion back.
async fn run(session: Session, orchestrator: &Orchestrator) -> Session {
    let (session, command) = session.update(SessionEvent::Submit);
    let Some(command) = command else {
        return session;
    };
    assert_eq!(session.status(), RequestStatus::Loading);
    let completion = orchestrator.execute(command).await;
    session.update(SessionEvent::Completed(completion)).0
}

fn with_input(session: Session, field: InputField, text: &str) -> Session {
    session
        .update(SessionEvent::SetInput {
            field,
            text: text.into(),
        })
        .0
}

#[tokio::test]
async fn analyze_success_renders_score_and_no_new_lines() {
    let orchestrator = Orchestrator::new(EchoService::ok(40), Duration::from_secs(5));
    let session = with_input(
        Session::new(AppMode::Analyze),
        InputField::Prompt,
        "Build a todo app.",
    );

    let session = run(session, &orchestrator).await;

    assert_eq!(session.status(), RequestStatus::Success);
    let result = session.analysis().expect("analysis stored");
    assert_eq!(result.score, 40);
    assert_eq!(count_new_lines(session.prompt(), &result.refined_prompt), 0);
    assert!(session.advice().is_none());
}

#[tokio::test]
async fn failing_service_ends_in_error_not_loading() {
    let orchestrator = Orchestrator::new(EchoService::failing(), Duration::from_secs(5));
    let session = with_input(
        Session::new(AppMode::Analyze),
        InputField::Prompt,
        "Build a todo app.",
    );

    let session = run(session, &orchestrator).await;

    assert_eq!(session.status(), RequestStatus::Error);
    assert_eq!(session.error(), Some(SERVICE_ERROR_MESSAGE));
    assert!(session.analysis().is_none());
}

#[tokio::test]
async fn debug_mode_without_observed_output_never_calls_out() {
    let service = EchoService::ok(40);
    let orchestrator = Orchestrator::new(service.clone(), Duration::from_secs(5));
    let session = with_input(Session::new(AppMode::Debug), InputField::Prompt, "Build a todo app.");

    assert!(!session.can_submit());
    let session = run(session, &orchestrator).await;

    assert_eq!(session.status(), RequestStatus::Idle);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn debug_mode_stores_advice() {
    let orchestrator = Orchestrator::new(EchoService::ok(40), Duration::from_secs(5));
    let session = with_input(
        Session::new(AppMode::Debug),
        InputField::Prompt,
        "Build a habit grid.",
    );
    let session = with_input(session, InputField::ObservedOutput, "a list view");

    let session = run(session, &orchestrator).await;

    assert_eq!(session.status(), RequestStatus::Success);
    let advice = session.advice().expect("advice stored");
    assert_eq!(advice.misunderstanding, "Lovable interpreted this as a list view");
    assert!(session.analysis().is_none());
}

#[tokio::test]
async fn completion_arriving_after_mode_switch_is_dropped() {
    let orchestrator = Orchestrator::new(EchoService::ok(88), Duration::from_secs(5));
    let session = with_input(
        Session::new(AppMode::Analyze),
        InputField::Prompt,
        "Build a todo app.",
    );

    let (session, command) = session.update(SessionEvent::Submit);
    let command = command.expect("command issued");
    let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Debug));

    let completion = orchestrator.execute(command).await;
    let session = session.update(SessionEvent::Completed(completion)).0;

    assert_eq!(session.mode(), AppMode::Debug);
    assert_eq!(session.status(), RequestStatus::Idle);
    assert!(session.analysis().is_none());
    assert!(session.advice().is_none());
}

#[tokio::test]
async fn example_prompt_highlights_only_added_lines() {
    let orchestrator = Orchestrator::new(EchoService::ok(92), Duration::from_secs(5));
    let (session, _) = Session::new(AppMode::Analyze).update(SessionEvent::LoadExample);

    let session = run(session, &orchestrator).await;
    let refined = format!("{}\n- Keyboard shortcut to mark all done.", session.prompt());

    assert_eq!(count_new_lines(session.prompt(), &refined), 1);
}
