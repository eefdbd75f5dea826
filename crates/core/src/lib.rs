//! # ragent Core
//!
//! Domain types, traits, and error definitions for the ragent
//! retrieval-augmented agent. This crate has **no framework dependencies**:
//! it defines the seams that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the agent loop is a trait here:
//! - [`Provider`]: the language model (one prompt in, one completion out)
//! - [`Tool`]: a named string-in/string-out capability
//! - [`Retriever`]: the document context source
//! - [`Clock`]: wall-clock reads, so tools can be tested deterministically
//!
//! Implementations live in their respective crates.

pub mod clock;
pub mod error;
pub mod provider;
pub mod retrieval;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AgentError, ProviderError, ToolError};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use retrieval::{NO_CONTEXT_PLACEHOLDER, Retriever, StaticRetriever};
pub use tool::{Tool, ToolDescriptor, ToolRegistry};
