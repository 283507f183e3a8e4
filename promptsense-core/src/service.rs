//! The seam between PromptSense and whatever model produces its verdicts.
//!
//! The rest of the core only ever sees `dyn PromptService`, so tests swap in a
//! stub without touching the session or the highlighter.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnalysisResult, IterationAdvice};

/// An external service that scores prompts and explains failed generations.
///
/// Each call is one outbound request returning a fully populated result or an
/// error. Implementations must not retry or cache.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Evaluates `prompt` and returns the score, checklist and rewrite.
    async fn analyze(&self, prompt: &str) -> Result<AnalysisResult>;

    /// Explains why `observed_output` diverged from what `original_prompt` asked for.
    async fn fix_advice(&self, original_prompt: &str, observed_output: &str)
        -> Result<IterationAdvice>;
}
