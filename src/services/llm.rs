use crate::errors::RequestError;
use crate::models::{ApiConfig, ApiErrorBody, ChatRequest, ChatResponse};
use futures_util::future::{FutureExt, LocalBoxFuture};
use reqwest::Client;

/// One round trip to the completion endpoint, returning the assistant text.
pub trait ChatTransport {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> LocalBoxFuture<'a, Result<String, RequestError>>;
}

pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl LlmService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim().to_string(),
            api_key: config.api_key.trim().to_string(),
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<String, RequestError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        parse_completion(status, &body)
    }
}

impl ChatTransport for LlmService {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> LocalBoxFuture<'a, Result<String, RequestError>> {
        self.post(request).boxed_local()
    }
}

/// Turn a status code and raw body into the assistant's reply.
pub fn parse_completion(status: u16, body: &str) -> Result<String, RequestError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(RequestError::Api { status, message });
    }

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| RequestError::Parse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| RequestError::Parse("response contained no choices".into()))?
        .message
        .content
        .ok_or_else(|| RequestError::Parse("first choice has no content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice() {
        let body = r#"{"id":"gen-1","choices":[{"message":{"role":"assistant","content":"Hi!"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_completion(200, body), Ok("Hi!".to_string()));
    }

    #[test]
    fn empty_choices_is_parse_error() {
        assert!(matches!(parse_completion(200, r#"{"choices":[]}"#), Err(RequestError::Parse(_))));
        assert!(matches!(parse_completion(200, r#"{}"#), Err(RequestError::Parse(_))));
    }

    #[test]
    fn null_content_is_parse_error() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(matches!(parse_completion(200, body), Err(RequestError::Parse(_))));
    }

    #[test]
    fn malformed_success_body_is_parse_error() {
        assert!(matches!(parse_completion(200, "<html>oops</html>"), Err(RequestError::Parse(_))));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        assert_eq!(
            parse_completion(429, body),
            Err(RequestError::Api {
                status: 429,
                message: "Rate limit exceeded".into()
            })
        );
    }

    #[test]
    fn api_error_without_body_uses_default_message() {
        assert_eq!(
            parse_completion(502, "Bad Gateway"),
            Err(RequestError::Api {
                status: 502,
                message: "API request failed".into()
            })
        );
    }
}
