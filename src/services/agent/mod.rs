/// Conversational agent abstraction
///
/// The agent receives the caller's chat history plus the new prompt and
/// answers with raw text. That text may be prose or a JSON recommendation
/// payload; interpreting it is the recommendation pipeline's job.
use crate::models::ChatTurn;

pub mod gemini;

pub use gemini::GeminiClient;

/// Reply used whenever the agent cannot be reached
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting to my brain right now. Please try again in a moment.";

/// Stateless conversational agent
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    /// Raw reply text for `prompt` given the prior `history`
    ///
    /// Never fails: implementations log their own errors and answer with
    /// [`FALLBACK_REPLY`] instead.
    async fn respond(&self, history: &[ChatTurn], prompt: &str) -> String;
}
