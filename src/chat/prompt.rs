use super::messages::ChatMessage;
use serde::Serialize;

/// Target length/style of a spoken answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl Tone {
    /// Parse a tone selector; unknown values are `Medium`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" | "brief" => Tone::Short,
            "detailed" | "long" => Tone::Detailed,
            _ => Tone::Medium,
        }
    }

    /// Fixed length instruction for this tone
    pub fn rule(&self) -> &'static str {
        match self {
            Tone::Short => "Keep it short (20 to 30 seconds).",
            Tone::Medium => "Keep it concise (30 to 60 seconds).",
            Tone::Detailed => "Make it detailed (60 to 90 seconds) with strong structure.",
        }
    }
}

const PERSONA: &str = "You are an interview copilot. Give a confident, natural spoken answer \
in the first person, as the candidate. \
Structure: direct answer, brief example, close. \
Never say you are an AI or a language model. \
Do not use markdown headings or bullet lists; the answer is read aloud.";

pub fn system_prompt(tone: Tone) -> String {
    format!("{} {}", PERSONA, tone.rule())
}

/// Question plus an optional labelled resume section
pub fn user_prompt(question: &str, resume: Option<&str>) -> String {
    let mut user = format!("Question:\n{}\n", question.trim());
    if let Some(resume) = resume.map(str::trim).filter(|r| !r.is_empty()) {
        user.push_str(&format!("\nResume context:\n{}\n", resume));
    }
    user
}

/// The system + user exchange sent to the chat engine
pub fn build_messages(question: &str, resume: Option<&str>, tone: Tone) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(tone)),
        ChatMessage::user(user_prompt(question, resume)),
    ]
}
