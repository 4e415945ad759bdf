//! Interview answers from a locally hosted chat-completion engine (Ollama)

mod answer;
mod client;
pub mod messages;
mod prompt;

pub use answer::{
    unreachable_message, AnswerRequest, AnswerResponse, AnswerService, ModelsResponse,
    NO_ANSWER, NO_QUESTION,
};
pub use client::{ChatEngine, ChatError, OllamaClient};
pub use messages::{ChatMessage, ChatRequest, ChatResponse};
pub use prompt::{build_messages, system_prompt, user_prompt, Tone};
