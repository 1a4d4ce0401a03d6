//! Test generation: prompt construction, the service client, and response cleanup.

pub mod client;
pub mod normalize;
pub mod prompt;

pub use client::{GenerationClient, OpenAiClient};
pub use normalize::{Extraction, NormalizedCode, normalize};
pub use prompt::{GenerationRequest, SYSTEM_INSTRUCTION, build_request};
