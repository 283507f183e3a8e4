//! Core of PromptSense: everything that is not terminal rendering.
//!
//! - [`types`]: the data model returned by the external service.
//! - [`highlight`]: marks which lines of a rewritten prompt are new.
//! - [`service`] / [`gemini`]: the external service seam and its HTTP provider.
//! - [`orchestrator`]: one validated, time-bounded call per submission.
//! - [`session`]: the Idle / Loading / Success / Error state machine.

pub mod error;
pub mod gemini;
pub mod highlight;
pub mod orchestrator;
pub mod prompts;
pub mod service;
pub mod session;
pub mod types;

pub use error::{ServiceError, SERVICE_ERROR_MESSAGE};
pub use orchestrator::Orchestrator;
pub use service::PromptService;
pub use session::{Command, Completion, InputField, RequestId, ServiceReply, Session, SessionEvent};
pub use types::{
    AnalysisResult, AppMode, ChecklistItem, GroupedChecklist, IterationAdvice, RequestStatus,
};
