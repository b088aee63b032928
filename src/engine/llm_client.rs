use log::{debug, error};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::engine::backend::{BackendError, ChatBackend, ChatSession};
use crate::model::message::{Message, Role};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gemini `generateContent` over blocking HTTP.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(config: &AppConfig, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                error!("falling back to default HTTP client: {e}");
                Client::new()
            });

        Self {
            client,
            api_key: api_key.into(),
            model_name: config.model_name.clone(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_name)
    }

    fn require_key(&self) -> Result<&str, BackendError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(BackendError::MissingCredential);
        }
        Ok(key)
    }
}

impl ChatBackend for GeminiBackend {
    fn send_turn(&self, session: &mut ChatSession, text: &str) -> Result<String, BackendError> {
        let key = self.require_key()?;
        let request = build_request(session, text);

        debug!(
            "sending turn on session {} ({} prior messages)",
            session.id,
            session.history().len()
        );

        let resp = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(http_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = resp
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        let reply = extract_text(&body)?;

        session.record_turn(text, &reply);
        Ok(reply)
    }

    fn check_connectivity(&self) -> Result<(), BackendError> {
        let key = self.require_key()?;

        let resp = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", key)
            .send()
            .map_err(transport)?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().unwrap_or_default();
            Err(http_error(status.as_u16(), &body))
        }
    }
}

fn build_request(session: &ChatSession, text: &str) -> GenerateContentRequest {
    let mut contents: Vec<Content> = session.history().iter().map(to_content).collect();
    contents.push(to_content(&Message::user(text)));

    let system_instruction = Some(session.system_instruction())
        .filter(|s| !s.trim().is_empty())
        .map(|s| Content {
            role: None,
            parts: vec![Part {
                text: Some(s.to_string()),
            }],
        });

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig { temperature: 0.9 },
    }
}

fn to_content(message: &Message) -> Content {
    let role = match message.role {
        Role::Model => "model",
        _ => "user",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: Some(message.content.clone()),
        }],
    }
}

fn extract_text(body: &GenerateContentResponse) -> Result<String, BackendError> {
    let content = body
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .ok_or_else(|| BackendError::InvalidResponse("no candidates in response".into()))?;

    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(BackendError::InvalidResponse("empty reply".into()));
    }
    Ok(text)
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

fn http_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    BackendError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_history_then_new_turn() {
        let log = vec![
            Message::user("hello"),
            Message::system("local note"),
            Message::model("hi"),
        ];
        let session = ChatSession::with_history("be a narrator", &log);

        let request = build_request(&session, "next");
        let json = serde_json::to_value(&request).unwrap();

        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "next");
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "be a narrator"
        );
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn reply_parts_are_joined() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&body).unwrap(), "ab");
    }

    #[test]
    fn blocked_reply_is_invalid() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(
            extract_text(&body),
            Err(BackendError::InvalidResponse(_))
        ));

        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(&body).is_err());
    }

    #[test]
    fn provider_error_message_is_extracted() {
        let err = http_error(
            400,
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            err,
            BackendError::Http {
                status: 400,
                message: "API key not valid.".into()
            }
        );

        let err = http_error(502, "Bad Gateway\n");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn empty_key_never_hits_the_network() {
        let backend = GeminiBackend::new(&AppConfig::default(), "  ");
        let mut session = ChatSession::new("x");

        assert_eq!(
            backend.send_turn(&mut session, "hi"),
            Err(BackendError::MissingCredential)
        );
        assert_eq!(
            backend.check_connectivity(),
            Err(BackendError::MissingCredential)
        );
        assert!(session.history().is_empty());
    }
}
