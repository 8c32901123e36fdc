/// Google Gemini agent
///
/// Uses the REST `generateContent` endpoint with a fixed system instruction
/// that turns the model into a movie recommender. When the model has enough
/// to go on it answers with a bare JSON payload:
///
/// ```text
/// {"recommendations": [{"title": "...", "year": 2017, "tmdb_id": 335984}, ...]}
/// ```
use crate::{
    error::{AppError, AppResult},
    models::{ChatRole, ChatTurn},
    services::agent::{AgentClient, FALLBACK_REPLY},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_INSTRUCTION: &str = r#"You are MirAI, a conversational movie recommendation expert. Help the user find the right movie through natural conversation.

RULES:
1. GATHER INFORMATION: When the request is vague (e.g. "find me a movie"), ask clarifying questions first: genre, actors, director, mood, or movies they liked. Do not recommend anything until you know at least a genre and an actor, or a movie to compare against.
2. RECOMMEND WITH JSON: Once you have enough specific information, your reply MUST be ONLY a valid JSON object and nothing else. It has a single key "recommendations" whose value is an array of 5 objects, each with the keys "title", "year" and "tmdb_id".
3. CONVERSE NORMALLY: For everything else (greetings, follow-up discussion, small talk) reply as a friendly movie assistant in the user's language. Do not output JSON in that case.

JSON FORMAT EXAMPLE:
{
  "recommendations": [
    { "title": "Blade Runner 2049", "year": 2017, "tmdb_id": 335984 },
    { "title": "Ex Machina", "year": 2014, "tmdb_id": 264660 }
  ]
}"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl GeminiContent {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

fn gemini_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Agent => "model",
    }
}

/// Builds the request body: history in order, then the prompt as the last user turn
fn build_request(history: &[ChatTurn], prompt: &str) -> GenerateContentRequest {
    let mut contents: Vec<GeminiContent> = history
        .iter()
        .filter(|turn| !turn.text.is_empty())
        .map(|turn| GeminiContent::text(Some(gemini_role(turn.role)), &turn.text))
        .collect();
    contents.push(GeminiContent::text(Some("user"), prompt));

    GenerateContentRequest {
        system_instruction: GeminiContent::text(None, SYSTEM_INSTRUCTION),
        contents,
    }
}

/// Joins the text parts of the first candidate
fn reply_text(response: GenerateContentResponse) -> AppResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::ExternalApi(
            "Gemini returned no text candidates".to_string(),
        ));
    }

    Ok(text)
}

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    /// One `generateContent` round-trip
    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(history, prompt))
            .send()
            .await
            .map_err(|e| e.without_url())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| e.without_url())?;
        reply_text(body)
    }
}

#[async_trait::async_trait]
impl AgentClient for GeminiClient {
    async fn respond(&self, history: &[ChatTurn], prompt: &str) -> String {
        match self.generate(history, prompt).await {
            Ok(text) => {
                tracing::info!(
                    model = %self.model,
                    history_len = history.len(),
                    reply_len = text.len(),
                    provider = "gemini",
                    "Agent reply received"
                );
                text
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    error = %e,
                    provider = "gemini",
                    "Agent call failed, using fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_request_orders_history_then_prompt() {
        let history = vec![
            ChatTurn::user("Find me a movie"),
            ChatTurn::agent("What genre do you like?"),
        ];
        let request = serde_json::to_value(build_request(&history, "Sci-fi with Oscar Isaac")).unwrap();

        assert_eq!(
            request["contents"],
            json!([
                {"role": "user", "parts": [{"text": "Find me a movie"}]},
                {"role": "model", "parts": [{"text": "What genre do you like?"}]},
                {"role": "user", "parts": [{"text": "Sci-fi with Oscar Isaac"}]}
            ])
        );
        assert!(request["systemInstruction"]["role"].is_null());
        assert!(request["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("\"recommendations\""));
    }

    #[test]
    fn test_build_request_skips_empty_turns() {
        let history = vec![ChatTurn::user(""), ChatTurn::agent("Hello!")];
        let request = build_request(&history, "hi");
        assert_eq!(request.contents.len(), 2);
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]}}],
            "usageMetadata": {"totalTokenCount": 12}
        }))
        .unwrap();
        assert_eq!(reply_text(response).unwrap(), "Hello there");
    }

    #[test]
    fn test_reply_text_without_candidates_fails() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(reply_text(response).is_err());
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(
            "key".to_string(),
            "https://generativelanguage.googleapis.com/".to_string(),
            "gemini-flash-latest".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_agent_yields_fallback() {
        let client = GeminiClient::new(
            "key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "gemini-flash-latest".to_string(),
            Duration::from_millis(500),
        )
        .unwrap();
        let reply = client.respond(&[], "Hi").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
