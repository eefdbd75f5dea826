//! Retriever trait: the document context boundary.
//!
//! The agent only consumes ranked passages; how they are produced
//! (keyword scoring, vector search, a remote service) is an
//! implementation detail of the retriever.

/// Rendered in place of the context block when retrieval finds nothing.
pub const NO_CONTEXT_PLACEHOLDER: &str = "No specific context found in documents for this query.";

/// Source of passages that ground the model's reasoning.
///
/// Retrieval is synchronous and infallible from the agent's point of view:
/// an implementation that cannot answer returns an empty list.
pub trait Retriever: Send + Sync {
    /// Return zero or more passages, most relevant first.
    fn retrieve(&self, query: &str) -> Vec<String>;
}

/// A retriever that always returns the same passages.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    passages: Vec<String>,
}

impl StaticRetriever {
    pub fn new(passages: Vec<String>) -> Self {
        Self { passages }
    }

    /// A retriever that never finds anything.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Retriever for StaticRetriever {
    fn retrieve(&self, _query: &str) -> Vec<String> {
        self.passages.clone()
    }
}
