
#[cfg(test)]
pub(crate) mod mock;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;

use crate::error::{Error, GenerationError, IntoQuizResult, QuizResult};
use crate::parser;
use crate::question::{QuizQuestion, QuizSettings};

pub const QUIZ_ROUTE: &str = "/api/generate-quiz";
pub const CONTENT_ROUTE: &str = "/api/generate-content";
pub const MATERIALS_ROUTE: &str = "/api/generate-materials";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Materials,
    Roadmap,
}

/// The `{success, response?, error?}` reply every backend route returns.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    response: Option<String>,
    error: Option<String>,
}

impl Envelope {
    fn into_text(self, default_error: &str) -> Result<String, GenerationError> {
        if self.success {
            Ok(self.response.unwrap_or_default())
        } else {
            Err(GenerationError::GenerationFailed(
                self.error.unwrap_or_else(|| default_error.to_string())
            ))
        }
    }
}

#[derive(Serialize)]
struct ContentRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct MaterialsRequest<'a> {
    topic: &'a str,
    #[serde(rename = "type")]
    kind: MaterialKind,
}

/// Talks to the generation backend. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    base: String,
}

impl GenerationClient {
    pub fn new(base: &str) -> QuizResult<Self> {
        let uri: Uri = base.parse()?;
        if uri.scheme_str() != Some("http") {
            return Err(Error::String(format!("Unsupported backend scheme: {}", base)));
        }
        Ok(GenerationClient { base: base.trim_end_matches('/').to_string() })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn request_quiz(&self, settings: &QuizSettings) -> Result<Vec<QuizQuestion>, GenerationError> {
        let markdown = self.request_quiz_markdown(settings).await?;
        let questions = parser::parse_quiz_response(&markdown);
        if questions.is_empty() {
            log::warn!("Backend answered for {:?} but no question could be parsed", settings.topic());
            return Err(GenerationError::ParseYieldedNoQuestions);
        }
        Ok(questions)
    }

    pub async fn request_quiz_markdown(&self, settings: &QuizSettings) -> Result<String, GenerationError> {
        settings.validate()?;
        log::info!(
            "Requesting {} {} question(s) on {:?} ({})",
            settings.question_count().get(), settings.kind(), settings.topic(), settings.difficulty()
        );
        self.post(QUIZ_ROUTE, settings, "Failed to generate quiz").await
    }

    pub async fn request_content(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::Validation("Please enter a prompt".into()));
        }
        self.post(CONTENT_ROUTE, &ContentRequest { prompt }, "Failed to generate content").await
    }

    pub async fn request_materials(&self, topic: &str, kind: MaterialKind) -> Result<String, GenerationError> {
        if topic.trim().is_empty() {
            return Err(GenerationError::Validation("Please enter a topic".into()));
        }
        self.post(MATERIALS_ROUTE, &MaterialsRequest { topic, kind }, "Failed to generate learning materials").await
    }

    async fn post<T: Serialize>(&self, route: &str, body: &T, default_error: &str) -> Result<String, GenerationError> {
        let envelope = match self.send(route, body).await {
            Ok(envelope) => envelope,
            Err(e) => {
                log::error!("Request to {} failed: {}", route, e);
                return Err(e.into());
            }
        };
        envelope.into_text(default_error).inspect_err(|e| {
            log::warn!("Backend reported failure on {}: {}", route, e);
        })
    }

    async fn send<T: Serialize>(&self, route: &str, body: &T) -> QuizResult<Envelope> {
        let uri: Uri = format!("{}{}", self.base, route).parse()?;
        let host = uri.host()
            .ok_or_else(|| Error::String(format!("Backend uri has no host: {}", uri)))?;
        let port = uri.port_u16().unwrap_or(80);

        let stream = TcpStream::connect((host, port)).await?;
        let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await?;
        tokio::task::spawn(async move {
            if let Err(e) = connection.await {
                log::debug!("Backend connection closed with error: {}", e);
            }
        });

        let authority = uri.authority().map(|a| a.to_string()).unwrap_or_default();
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(HOST, authority)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(serde_json::to_vec(body)?)))
            .into_result()?;

        let response = sender.send_request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        log::debug!("Backend answered {} with {} bytes", status, bytes.len());
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockBackend;
    use crate::question::{Difficulty, QuestionCount, QuestionKind};
    use hyper::StatusCode;

    const QUIZ: &str = "1. What is 2+2?\nA) 3\nB) 4*\nC) 5\nD) 6\nExplanation: Basic arithmetic.";

    fn settings(topic: &str) -> QuizSettings {
        QuizSettings::new(topic, Difficulty::Medium, QuestionKind::MultipleChoice, QuestionCount::default())
    }

    fn envelope_ok(text: &str) -> String {
        serde_json::json!({ "success": true, "response": text }).to_string()
    }

    #[tokio::test]
    async fn request_quiz_posts_settings_and_parses_reply() {
        let mut backend = MockBackend::start(StatusCode::OK, envelope_ok(QUIZ)).await;
        let client = GenerationClient::new(&backend.url()).unwrap();

        let questions = client.request_quiz(&settings("Arithmetic")).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer(), "4");

        let (path, body) = backend.next_request().await;
        assert_eq!(path, QUIZ_ROUTE);
        assert_eq!(body, serde_json::json!({
            "topic": "Arithmetic",
            "difficulty": "medium",
            "type": "mcq",
            "questionCount": 10,
        }));
    }

    #[tokio::test]
    async fn backend_failure_carries_message() {
        let backend = MockBackend::start(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success": false, "error": "model overloaded"}"#.to_string(),
        ).await;
        let client = GenerationClient::new(&backend.url()).unwrap();
        let err = client.request_quiz(&settings("Rust")).await.unwrap_err();
        assert_eq!(err, GenerationError::GenerationFailed("model overloaded".into()));
    }

    #[tokio::test]
    async fn backend_failure_without_message_uses_default() {
        let backend = MockBackend::start(StatusCode::OK, r#"{"success": false}"#.to_string()).await;
        let client = GenerationClient::new(&backend.url()).unwrap();
        let err = client.request_quiz(&settings("Rust")).await.unwrap_err();
        assert_eq!(err, GenerationError::GenerationFailed("Failed to generate quiz".into()));
        let err = client.request_materials("Rust", MaterialKind::Roadmap).await.unwrap_err();
        assert_eq!(err, GenerationError::GenerationFailed("Failed to generate learning materials".into()));
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_error() {
        let backend = MockBackend::start(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".to_string()).await;
        let client = GenerationClient::new(&backend.url()).unwrap();
        let err = client.request_quiz(&settings("Rust")).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let addr = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let client = GenerationClient::new(&format!("http://{}", addr)).unwrap();
        let err = client.request_quiz(&settings("Rust")).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[tokio::test]
    async fn unparseable_reply_yields_no_questions_error() {
        let backend = MockBackend::start(StatusCode::OK, envelope_ok("I cannot help with that.")).await;
        let client = GenerationClient::new(&backend.url()).unwrap();
        let err = client.request_quiz(&settings("Rust")).await.unwrap_err();
        assert_eq!(err, GenerationError::ParseYieldedNoQuestions);
    }

    #[tokio::test]
    async fn empty_topic_is_rejected_before_sending() {
        let mut backend = MockBackend::start(StatusCode::OK, envelope_ok(QUIZ)).await;
        let client = GenerationClient::new(&backend.url()).unwrap();
        let err = client.request_quiz(&settings("  ")).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
        assert!(backend.try_next_request().is_none());
    }

    #[tokio::test]
    async fn materials_and_content_routes_return_raw_text() {
        let mut backend = MockBackend::start(StatusCode::OK, envelope_ok("# Roadmap")).await;
        let client = GenerationClient::new(&format!("{}/", backend.url())).unwrap();

        assert_eq!(client.request_materials("Rust", MaterialKind::Roadmap).await.unwrap(), "# Roadmap");
        let (path, body) = backend.next_request().await;
        assert_eq!(path, MATERIALS_ROUTE);
        assert_eq!(body, serde_json::json!({ "topic": "Rust", "type": "roadmap" }));

        assert_eq!(client.request_content("Explain lifetimes").await.unwrap(), "# Roadmap");
        let (path, body) = backend.next_request().await;
        assert_eq!(path, CONTENT_ROUTE);
        assert_eq!(body, serde_json::json!({ "prompt": "Explain lifetimes" }));
    }

    #[test]
    fn only_plain_http_backends_are_accepted() {
        assert!(GenerationClient::new("https://example.com").is_err());
        assert!(GenerationClient::new("not a uri").is_err());
        assert_eq!(GenerationClient::new("http://localhost:5000/").unwrap().base(), "http://localhost:5000");
    }
}
