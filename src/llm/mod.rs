//! Default stage implementations backed by an OpenAI-compatible chat API
//! (OpenRouter unless configured otherwise).

pub mod client;
pub mod stages;

pub use client::{ChatClient, strip_json_fences};
pub use stages::LlmStages;
