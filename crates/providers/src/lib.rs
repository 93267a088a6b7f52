//! LLM provider implementations for genui.
//!
//! All providers implement the `genui_core::LlmProvider` trait.
//! [`build_from_config`] selects and configures one from `AppConfig`.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_from_config, default_base_url};
