//! Daily reflection prompts

pub mod manager;
pub mod models;
pub mod selector;

pub use manager::PromptManager;
pub use models::*;
pub use selector::{prompt_index, select_prompt, PROMPTS};
