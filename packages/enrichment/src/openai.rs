//! `OpenAI` chat-completions markdown generator.

use serde::{Deserialize, Serialize};

use crate::EnrichmentError;
use crate::generator::DescriptionGenerator;

/// Default API root for `OpenAI`.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Instructions sent ahead of every description. The listings are Romanian,
/// so the summary layout is too.
const MARKDOWN_PROMPT: &str = "\
Te rog să formatezi și să structurezi următoarea descriere imobiliară în markdown, ca și \
cum ai fi un agent imobiliar profesionist. Asigură-te că incluzi secțiuni clare pentru \
Adresa, Locație, Facilități, Acte și alte detalii relevante. Nu pune titlu, nu folosi bold, \
nu fa resize la tabel, vreau să fie cât mai structurate și cât mai simple de citit. \
Ca exemplu de cum vreau să arate:
Localizare:
  - Adresa:
  - Zona:
Caracteristici:
  - Suprafața terenului:
  - Construcții existente:
  - Posibilități:
  - Certificate de urbanism:
    - POT:
    - CUT:
    - Deschidere:
Accesibilitate și facilități:
  - Proximitate:
Descriere zonă:
  - Infrastructură și facilități:
Informații suplimentare:

";

/// Generates listing markdown through an `OpenAI`-compatible
/// chat-completions endpoint.
pub struct OpenAiMarkdownGenerator {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiMarkdownGenerator {
    /// Creates a generator against the public `OpenAI` API.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key: Some(api_key),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Points the generator at another `OpenAI`-compatible server.
    ///
    /// Local servers usually need no key, so `api_key` may be `None`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str, api_key: Option<String>) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.api_key = api_key;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn build_prompt(raw: &str) -> String {
    format!("{MARKDOWN_PROMPT}{raw}")
}

fn build_request<'a>(model: &'a str, raw: &str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: build_prompt(raw),
        }],
        max_tokens: 500,
        temperature: 0.9,
    }
}

/// Extracts the trimmed markdown from a chat-completions response body.
fn parse_completion(body: &str) -> Result<String, EnrichmentError> {
    let response: ChatResponse = serde_json::from_str(body)?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(EnrichmentError::Generator {
            message: "No content in chat completion response".to_string(),
        });
    }

    Ok(text)
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message)
}

#[async_trait::async_trait]
impl DescriptionGenerator for OpenAiMarkdownGenerator {
    async fn generate(&self, raw: &str) -> Result<String, EnrichmentError> {
        if raw.trim().is_empty() {
            return Err(EnrichmentError::EmptyInput);
        }

        let request = build_request(&self.model, raw);

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(EnrichmentError::Generator {
                message: error_message(status, &body),
            });
        }

        parse_completion(&body)
    }
}

/// Builds the markdown generator from environment variables.
///
/// Reads `OPENAI_API_KEY`, `AI_MODEL` (default [`DEFAULT_MODEL`]) and
/// `AI_BASE_URL`. When `AI_BASE_URL` is set the key is optional.
///
/// # Errors
///
/// Returns [`EnrichmentError::Config`] if neither `OPENAI_API_KEY` nor
/// `AI_BASE_URL` is set.
pub fn create_generator_from_env() -> Result<OpenAiMarkdownGenerator, EnrichmentError> {
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let model = std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    if let Ok(base_url) = std::env::var("AI_BASE_URL") {
        log::info!("Using OpenAI-compatible server at {base_url} (model {model})");
        return Ok(OpenAiMarkdownGenerator::new(String::new(), model)
            .with_base_url(&base_url, api_key));
    }

    let api_key = api_key.ok_or_else(|| EnrichmentError::Config {
        message: "OPENAI_API_KEY environment variable not set".to_string(),
    })?;
    log::info!("Using OpenAI (model {model})");
    Ok(OpenAiMarkdownGenerator::new(api_key, model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_ends_with_description() {
        let prompt = build_prompt("Teren 500 mp in Pipera");
        assert!(prompt.starts_with("Te rog să formatezi"));
        assert!(prompt.contains("    - POT:\n    - CUT:\n"));
        assert!(prompt.ends_with("Informații suplimentare:\n\nTeren 500 mp in Pipera"));
    }

    #[test]
    fn request_body_shape() {
        let value = serde_json::to_value(build_request("gpt-4o", "Teren")).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(
            value["messages"][0]["content"]
                .as_str()
                .unwrap()
                .ends_with("Teren")
        );
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Localizare:\n  - Zona: Amzei \n"}}]}"#;
        assert_eq!(
            parse_completion(body).unwrap(),
            "Localizare:\n  - Zona: Amzei"
        );
    }

    #[test]
    fn empty_choices_is_generator_error() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(EnrichmentError::Generator { .. })
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(EnrichmentError::Generator { .. })
        ));
    }

    #[test]
    fn malformed_body_is_json_error() {
        assert!(matches!(
            parse_completion("not json"),
            Err(EnrichmentError::Json(_))
        ));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"message":"Invalid API key"}}"#;
        assert_eq!(
            error_message(reqwest::StatusCode::UNAUTHORIZED, body),
            "Invalid API key"
        );
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down"),
            "HTTP 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let generator = OpenAiMarkdownGenerator::new("k".to_string(), "m".to_string())
            .with_base_url("http://localhost:11434/v1/", None);
        assert_eq!(
            generator.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_request() {
        let generator = OpenAiMarkdownGenerator::new("k".to_string(), "m".to_string())
            .with_base_url("http://127.0.0.1:9", None);
        assert!(matches!(
            generator.generate(" \n").await,
            Err(EnrichmentError::EmptyInput)
        ));
    }
}
