use super::client::{ChatEngine, ChatError};
use super::messages::ChatRequest;
use super::prompt::{build_messages, Tone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_QUESTION: &str = "No question received.";
pub const NO_ANSWER: &str = "No answer returned from Ollama.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerRequest {
    /// Interview question or running transcript
    #[serde(default, alias = "transcript")]
    pub question: String,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Model names reported by the chat engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Produces spoken-style interview answers.
///
/// Never fails: engine problems come back as readable text in the answer.
#[derive(Clone)]
pub struct AnswerService {
    engine: Arc<dyn ChatEngine>,
    default_model: String,
}

impl AnswerService {
    pub fn new(engine: Arc<dyn ChatEngine>, default_model: impl Into<String>) -> Self {
        Self {
            engine,
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub async fn answer(&self, req: &AnswerRequest) -> AnswerResponse {
        AnswerResponse {
            answer: self.answer_text(req).await,
        }
    }

    async fn answer_text(&self, req: &AnswerRequest) -> String {
        let question = req.question.trim();
        if question.is_empty() {
            return NO_QUESTION.to_string();
        }

        let tone = Tone::parse(req.tone.as_deref().unwrap_or_default());
        let model = req
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model)
            .to_string();

        let request = ChatRequest {
            model,
            messages: build_messages(question, req.resume.as_deref(), tone),
            stream: false,
        };

        info!(
            "Requesting answer from {} (model={}, tone={:?}, {} chars)",
            self.engine.base_url(),
            request.model,
            tone,
            question.len()
        );

        match self.engine.chat(&request).await {
            Ok(reply) => {
                let content = reply.content();
                if content.is_empty() {
                    NO_ANSWER.to_string()
                } else {
                    content.to_string()
                }
            }
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                self.describe_failure(&e)
            }
        }
    }

    /// User-facing text for an engine failure
    pub fn describe_failure(&self, err: &ChatError) -> String {
        match err {
            ChatError::Unreachable { base_url, .. } => unreachable_message(base_url),
            ChatError::Timeout(after) => format!(
                "Ollama did not answer within {} seconds.\n\
                 The model may still be loading; try again, or pick a smaller model.",
                after.as_secs()
            ),
            other => format!("Ollama error: {}", other),
        }
    }

    pub async fn list_models(&self) -> ModelsResponse {
        match self.engine.list_models().await {
            Ok(models) => ModelsResponse {
                models,
                error: None,
            },
            Err(e) => {
                warn!("Could not list chat models: {}", e);
                ModelsResponse {
                    models: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Diagnostic for an engine that could not be contacted at all
pub fn unreachable_message(base_url: &str) -> String {
    format!(
        "Ollama is not running or not reachable at {base_url}.\n\
         Fix:\n\
         1) Install Ollama\n\
         2) Start it (ollama serve)\n\
         3) Verify: open {base_url}/api/tags in a browser\n\
         If this backend runs in the cloud, it cannot reach Ollama on your laptop; \
         expose Ollama through a tunnel and set OLLAMA_BASE_URL to the tunnel address."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::messages::{ChatMessage, ChatResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Test double recording every request it receives
    struct RecordingEngine {
        reply: Result<String, fn() -> ChatError>,
        calls: AtomicUsize,
        last: Mutex<Option<ChatRequest>>,
    }

    impl RecordingEngine {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn failing(err: fn() -> ChatError) -> Self {
            Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatEngine for RecordingEngine {
        fn base_url(&self) -> &str {
            "http://ollama.test"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(ChatResponse {
                    message: Some(ChatMessage {
                        role: "assistant".to_string(),
                        content: text.clone(),
                    }),
                }),
                Err(make) => Err(make()),
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, ChatError> {
            match &self.reply {
                Ok(_) => Ok(vec!["llama3:latest".to_string()]),
                Err(make) => Err(make()),
            }
        }
    }

    fn question(q: &str) -> AnswerRequest {
        AnswerRequest {
            question: q.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_question_skips_engine() {
        let engine = Arc::new(RecordingEngine::replying("unused"));
        let service = AnswerService::new(engine.clone(), "llama3:latest");

        assert_eq!(service.answer(&question("   \n")).await.answer, NO_QUESTION);
        assert_eq!(service.answer(&question("")).await.answer, NO_QUESTION);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_answer_uses_defaults() {
        let engine = Arc::new(RecordingEngine::replying("  I led the migration.  "));
        let service = AnswerService::new(engine.clone(), "llama3:latest");

        let resp = service.answer(&question("Tell me about yourself")).await;
        assert_eq!(resp.answer, "I led the migration.");

        let sent = engine.last.lock().unwrap().clone().expect("request recorded");
        assert_eq!(sent.model, "llama3:latest");
        assert!(!sent.stream);
        assert!(sent.messages[0].content.contains("30 to 60 seconds"));
        assert!(sent.messages[1].content.contains("Tell me about yourself"));
        assert!(!sent.messages[1].content.contains("Resume context"));
    }

    #[tokio::test]
    async fn test_answer_honours_model_tone_resume() {
        let engine = Arc::new(RecordingEngine::replying("ok"));
        let service = AnswerService::new(engine.clone(), "llama3:latest");

        let req = AnswerRequest {
            question: "Biggest weakness?".to_string(),
            resume: Some("Ten years of Rust".to_string()),
            model: Some("qwen2:7b".to_string()),
            tone: Some("detailed".to_string()),
        };
        service.answer(&req).await;

        let sent = engine.last.lock().unwrap().clone().expect("request recorded");
        assert_eq!(sent.model, "qwen2:7b");
        assert!(sent.messages[0].content.contains("60 to 90 seconds"));
        assert!(sent.messages[1].content.contains("Resume context:\nTen years of Rust"));
    }

    #[tokio::test]
    async fn test_empty_reply_substituted() {
        let service = AnswerService::new(Arc::new(RecordingEngine::replying("   ")), "m");
        assert_eq!(service.answer(&question("Q?")).await.answer, NO_ANSWER);
    }

    #[tokio::test]
    async fn test_unreachable_engine_gives_diagnostic() {
        let engine = RecordingEngine::failing(|| ChatError::Unreachable {
            base_url: "http://127.0.0.1:11434".to_string(),
            reason: "connection refused".to_string(),
        });
        let service = AnswerService::new(Arc::new(engine), "m");

        let answer = service.answer(&question("Q?")).await.answer;
        assert!(answer.starts_with("Ollama is not running or not reachable"));
        assert!(answer.contains("http://127.0.0.1:11434/api/tags"));
    }

    #[tokio::test]
    async fn test_other_failures_are_text() {
        let service = AnswerService::new(
            Arc::new(RecordingEngine::failing(|| ChatError::Status {
                status: 404,
                body: "model not found".to_string(),
            })),
            "m",
        );
        let answer = service.answer(&question("Q?")).await.answer;
        assert!(answer.starts_with("Ollama error:"));
        assert!(answer.contains("model not found"));

        let slow = AnswerService::new(
            Arc::new(RecordingEngine::failing(|| ChatError::Timeout(Duration::from_secs(120)))),
            "m",
        );
        assert!(slow.answer(&question("Q?")).await.answer.contains("120 seconds"));

        let broken = AnswerService::new(
            Arc::new(RecordingEngine::failing(|| {
                ChatError::Transport("connection reset".to_string())
            })),
            "m",
        );
        let answer = broken.answer(&question("Q?")).await.answer;
        assert!(answer.starts_with("Ollama error:"));
        assert!(!answer.contains("not running"));
    }

    #[tokio::test]
    async fn test_list_models_failure_carries_error() {
        let service = AnswerService::new(
            Arc::new(RecordingEngine::failing(|| ChatError::Decode("bad json".to_string()))),
            "m",
        );
        let models = service.list_models().await;
        assert!(models.models.is_empty());
        assert!(models.error.unwrap_or_default().contains("bad json"));

        let ok = AnswerService::new(Arc::new(RecordingEngine::replying("x")), "m");
        let listed = ok.list_models().await;
        assert_eq!(listed.models, vec!["llama3:latest"]);
        assert!(listed.error.is_none());
    }
}
