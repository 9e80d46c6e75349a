//! NudgeWealth Advisor - optional enrichment for blocked and nudged spends
//!
//! The evaluation engine decides every outcome on its own. This crate only
//! supplies friendlier wording:
//!
//! - **Redirect recommendations** when money is blocked (which savings pot
//!   or investment should receive the redirected amount, and why)
//! - **Spending nudges** when a transaction brings a category close to its
//!   limit
//!
//! ## Providers
//! - Ollama (default): `http://localhost:11434`
//! - OpenAI-compatible: OpenAI, vLLM, llama.cpp, ...
//! - Anthropic
//! - Deterministic: no model; every request fails over to the engine's
//!   templated messages
//!
//! Model output is untrusted. [`guard::AdvisoryGuard`] checks every parsed
//! response before the engine may use it; a rejected response is handled
//! exactly like a failed call.

pub mod advisor;
pub mod guard;
pub mod llm;
pub mod providers;
pub mod router;
pub mod types;

pub use advisor::*;
pub use guard::{AdvisoryGuard, GuardConfig};
pub use llm::LlmAdvisor;
pub use providers::*;
pub use router::*;
pub use types::*;
