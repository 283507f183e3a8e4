//! Session state machine.
//!
//! A [`Session`] is the whole of the per-user view state: mode, inputs, request
//! status, the last result for the active mode, and the error banner text.
//! It changes only through [`Session::update`], a pure transition taking the
//! session by value and returning it together with an optional [`Command`] for
//! the caller to execute. The caller feeds the outcome back as
//! [`SessionEvent::Completed`].
//!
//! ```text
//!            Submit                 Completed(Ok)
//!   Idle ─────────────▶ Loading ─────────────────▶ Success
//!    ▲  ▲                  │                          │
//!    │  │                  │ Completed(Err)           │ Submit
//!    │  │                  ▼                          ▼
//!    │  └──────────────  Error ─────── Submit ──────▶ Loading
//!    │   SwitchMode / LoadExample (from any state)
//! ```
//!
//! Every submission carries a fresh [`RequestId`]. A completion whose id does
//! not match the pending request (because the mode was switched, or the example
//! loaded, while it was in flight) is dropped.

use std::fmt;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::prompts::SAMPLE_PROMPT;
use crate::types::{AnalysisResult, AppMode, IterationAdvice, RequestStatus};

/// Identifies one submission so its completion can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Work the session asks its owner to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze {
        id: RequestId,
        prompt: String,
    },
    FixAdvice {
        id: RequestId,
        prompt: String,
        observed_output: String,
    },
}

impl Command {
    pub fn id(&self) -> RequestId {
        match self {
            Command::Analyze { id, .. } | Command::FixAdvice { id, .. } => *id,
        }
    }
}

/// A successful service answer, one variant per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    Analysis(AnalysisResult),
    Advice(IterationAdvice),
}

/// Outcome of a [`Command`], tagged with the id it was issued under.
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub result: Result<ServiceReply, ServiceError>,
}

/// The two editable text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// The prompt under evaluation (both modes).
    Prompt,
    /// What the generator produced (Debug mode only).
    ObservedOutput,
}

/// Everything that can happen to a session.
#[derive(Debug)]
pub enum SessionEvent {
    Submit,
    SwitchMode(AppMode),
    LoadExample,
    SetInput { field: InputField, text: String },
    Completed(Completion),
}

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    id: RequestId,
    mode: AppMode,
}

/// Per-session view state. See the module docs for the transition diagram.
#[derive(Debug, Default)]
pub struct Session {
    mode: AppMode,
    prompt: String,
    observed_output: String,
    status: RequestStatus,
    analysis: Option<AnalysisResult>,
    advice: Option<IterationAdvice>,
    error: Option<String>,
    pending: Option<PendingRequest>,
}

impl Session {
    pub fn new(mode: AppMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn observed_output(&self) -> &str {
        &self.observed_output
    }

    pub fn input(&self, field: InputField) -> &str {
        match field {
            InputField::Prompt => &self.prompt,
            InputField::ObservedOutput => &self.observed_output,
        }
    }

    /// Last successful analysis, present only in Analyze mode.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Last successful advice, present only in Debug mode.
    pub fn advice(&self) -> Option<&IterationAdvice> {
        self.advice.as_ref()
    }

    /// User-facing error text from the most recent failed run.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// Id of the request whose completion the session is waiting for.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.map(|p| p.id)
    }

    /// Whether [`SessionEvent::Submit`] would start a request right now.
    ///
    /// Requires a non-blank prompt, a non-blank observed output in Debug mode,
    /// and no request already loading.
    pub fn can_submit(&self) -> bool {
        if self.is_loading() || self.prompt.trim().is_empty() {
            return false;
        }
        self.mode != AppMode::Debug || !self.observed_output.trim().is_empty()
    }

    /// Applies one event and returns the next state plus any command to run.
    pub fn update(mut self, event: SessionEvent) -> (Self, Option<Command>) {
        let command = match event {
            SessionEvent::Submit => self.submit(),
            SessionEvent::SwitchMode(mode) => {
                self.mode = mode;
                self.reset();
                None
            }
            SessionEvent::LoadExample => {
                self.prompt = SAMPLE_PROMPT.to_owned();
                self.reset();
                None
            }
            SessionEvent::SetInput { field, text } => {
                match field {
                    InputField::Prompt => self.prompt = text,
                    InputField::ObservedOutput => self.observed_output = text,
                }
                None
            }
            SessionEvent::Completed(completion) => {
                self.complete(completion);
                None
            }
        };
        (self, command)
    }

    fn submit(&mut self) -> Option<Command> {
        if !self.can_submit() {
            debug!(status = ?self.status, mode = ?self.mode, "submit ignored");
            return None;
        }
        let id = RequestId::new();
        self.status = RequestStatus::Loading;
        self.error = None;
        self.pending = Some(PendingRequest {
            id,
            mode: self.mode,
        });
        let command = match self.mode {
            AppMode::Analyze => Command::Analyze {
                id,
                prompt: self.prompt.clone(),
            },
            AppMode::Debug => Command::FixAdvice {
                id,
                prompt: self.prompt.clone(),
                observed_output: self.observed_output.clone(),
            },
        };
        Some(command)
    }

    fn complete(&mut self, completion: Completion) {
        let pending = match self.pending {
            Some(p) if p.id == completion.id => p,
            _ => {
                debug!(request = %completion.id, "discarding stale completion");
                return;
            }
        };
        self.pending = None;

        match (pending.mode, completion.result) {
            (AppMode::Analyze, Ok(ServiceReply::Analysis(result))) => {
                self.analysis = Some(result);
                self.status = RequestStatus::Success;
            }
            (AppMode::Debug, Ok(ServiceReply::Advice(advice))) => {
                self.advice = Some(advice);
                self.status = RequestStatus::Success;
            }
            (mode, Ok(_)) => {
                warn!(?mode, "reply kind does not match request mode");
                self.fail(ServiceError::InvalidResponse("reply kind mismatch".into()));
            }
            (_, Err(e)) => self.fail(e),
        }
    }

    /// Keeps the previous result; only the banner and status change.
    fn fail(&mut self, error: ServiceError) {
        self.error = Some(error.user_message().to_owned());
        self.status = RequestStatus::Error;
    }

    /// Back to `Idle` with no results, no error and nothing in flight.
    fn reset(&mut self) {
        self.status = RequestStatus::Idle;
        self.analysis = None;
        self.advice = None;
        self.error = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SERVICE_ERROR_MESSAGE;
    use crate::types::GroupedChecklist;

    fn analysis(score: i64) -> AnalysisResult {
        AnalysisResult {
            score,
            summary: "s".into(),
            strengths: vec![],
            weaknesses: vec![],
            checklist: GroupedChecklist::default(),
            prioritized_actions: vec![],
            refined_prompt: "r".into(),
            whats_changed: vec![],
        }
    }

    fn advice() -> IterationAdvice {
        IterationAdvice {
            misunderstanding: "m".into(),
            root_cause: "r".into(),
            fix: "f".into(),
        }
    }

    fn set(session: Session, field: InputField, text: &str) -> Session {
        session
            .update(SessionEvent::SetInput {
                field,
                text: text.into(),
            })
            .0
    }

    fn submit(session: Session) -> (Session, RequestId) {
        let (session, command) = session.update(SessionEvent::Submit);
        (session, command.expect("submit should issue a command").id())
    }

    fn complete(
        session: Session,
        id: RequestId,
        result: Result<ServiceReply, ServiceError>,
    ) -> Session {
        session.update(SessionEvent::Completed(Completion { id, result })).0
    }

    #[test]
    fn starts_idle_in_requested_mode() {
        let session = Session::new(AppMode::Debug);
        assert_eq!(session.status(), RequestStatus::Idle);
        assert_eq!(session.mode(), AppMode::Debug);
        assert!(!session.can_submit());
    }

    #[test]
    fn blank_prompt_submit_is_a_no_op_from_every_state() {
        // Idle
        let (session, command) = Session::default().update(SessionEvent::Submit);
        assert!(command.is_none());
        assert_eq!(session.status(), RequestStatus::Idle);

        // Success, then the prompt is cleared
        let session = set(Session::default(), InputField::Prompt, "Build a todo app.");
        let (session, id) = submit(session);
        let session = complete(session, id, Ok(ServiceReply::Analysis(analysis(40))));
        let session = set(session, InputField::Prompt, "   ");
        let (session, command) = session.update(SessionEvent::Submit);
        assert!(command.is_none());
        assert_eq!(session.status(), RequestStatus::Success);
    }

    #[test]
    fn submit_moves_to_loading_and_issues_analyze() {
        let session = set(Session::default(), InputField::Prompt, "Build a todo app.");
        let (session, command) = session.update(SessionEvent::Submit);
        assert_eq!(session.status(), RequestStatus::Loading);
        match command {
            Some(Command::Analyze { id, prompt }) => {
                assert_eq!(prompt, "Build a todo app.");
                assert_eq!(session.pending_request(), Some(id));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, first) = submit(session);
        let (session, command) = session.update(SessionEvent::Submit);
        assert!(command.is_none());
        assert_eq!(session.pending_request(), Some(first));
    }

    #[test]
    fn debug_mode_needs_observed_output() {
        let session = set(Session::new(AppMode::Debug), InputField::Prompt, "p");
        let (session, command) = session.update(SessionEvent::Submit);
        assert!(command.is_none());
        assert_eq!(session.status(), RequestStatus::Idle);

        let session = set(session, InputField::ObservedOutput, "blank page");
        let (_, command) = session.update(SessionEvent::Submit);
        assert!(matches!(
            command,
            Some(Command::FixAdvice { ref observed_output, .. }) if observed_output == "blank page"
        ));
    }

    #[test]
    fn failure_shows_fixed_message_and_keeps_previous_result() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, id) = submit(session);
        let session = complete(session, id, Ok(ServiceReply::Analysis(analysis(40))));

        let (session, id) = submit(session);
        assert!(session.error().is_none());
        let session = complete(session, id, Err(ServiceError::EmptyContent));
        assert_eq!(session.status(), RequestStatus::Error);
        assert_eq!(session.error(), Some(SERVICE_ERROR_MESSAGE));
        assert_eq!(session.analysis().map(|a| a.score), Some(40));
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn resubmit_after_error_clears_banner() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, id) = submit(session);
        let session = complete(session, id, Err(ServiceError::Timeout { secs: 1 }));
        let (session, _) = submit(session);
        assert_eq!(session.status(), RequestStatus::Loading);
        assert!(session.error().is_none());
    }

    #[test]
    fn mode_switch_resets_from_every_state() {
        let loaded = || {
            let session = set(Session::default(), InputField::Prompt, "p");
            submit(session)
        };

        // Loading
        let (session, _) = loaded();
        let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Debug));
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.pending_request().is_none());

        // Success
        let (session, id) = loaded();
        let session = complete(session, id, Ok(ServiceReply::Analysis(analysis(90))));
        let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Debug));
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.analysis().is_none() && session.advice().is_none());

        // Error, switching to the mode already active
        let (session, id) = loaded();
        let session = complete(session, id, Err(ServiceError::EmptyContent));
        let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Analyze));
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.error().is_none());
        assert_eq!(session.prompt(), "p");
    }

    #[test]
    fn late_completion_after_mode_switch_is_discarded() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, stale) = submit(session);
        let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Debug));
        let session = complete(session, stale, Ok(ServiceReply::Analysis(analysis(70))));
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.analysis().is_none());
    }

    #[test]
    fn completion_for_superseded_request_is_discarded() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, stale) = submit(session);
        let (session, _) = session.update(SessionEvent::SwitchMode(AppMode::Analyze));
        let (session, current) = submit(session);

        let session = complete(session, stale, Err(ServiceError::EmptyContent));
        assert_eq!(session.status(), RequestStatus::Loading);

        let session = complete(session, current, Ok(ServiceReply::Analysis(analysis(55))));
        assert_eq!(session.status(), RequestStatus::Success);
        assert_eq!(session.analysis().map(|a| a.score), Some(55));
    }

    #[test]
    fn mismatched_reply_kind_is_an_error() {
        let session = set(Session::default(), InputField::Prompt, "p");
        let (session, id) = submit(session);
        let session = complete(session, id, Ok(ServiceReply::Advice(advice())));
        assert_eq!(session.status(), RequestStatus::Error);
        assert!(session.advice().is_none());
    }

    #[test]
    fn load_example_fills_prompt_and_resets() {
        let session = set(Session::new(AppMode::Debug), InputField::Prompt, "p");
        let session = set(session, InputField::ObservedOutput, "o");
        let (session, id) = submit(session);
        let session = complete(session, id, Ok(ServiceReply::Advice(advice())));

        let (session, command) = session.update(SessionEvent::LoadExample);
        assert!(command.is_none());
        assert_eq!(session.prompt(), SAMPLE_PROMPT);
        assert_eq!(session.observed_output(), "o");
        assert_eq!(session.mode(), AppMode::Debug);
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.advice().is_none());
    }
}
