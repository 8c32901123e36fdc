use serde::{Deserialize, Serialize};

/// Who produced a turn of the conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    /// The recommendation agent. Gemini calls this role "model".
    #[serde(alias = "model", alias = "assistant")]
    Agent,
}

/// One historical exchange, supplied by the caller on every chat request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    #[serde(alias = "content")]
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Agent,
            text: text.into(),
        }
    }
}
