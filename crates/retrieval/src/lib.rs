//! Document context retrieval for ragent.
//!
//! [`KeywordRetriever`] keeps whole documents in memory and ranks them by
//! query-term overlap. It stands in for a vector store: the agent only
//! depends on the [`Retriever`] trait, so a similarity-search backend can
//! replace it without touching the loop.

use ragent_core::retrieval::Retriever;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A passage together with where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub content: String,
}

/// In-memory keyword retriever.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    documents: Vec<Document>,
    top_k: usize,
}

impl KeywordRetriever {
    pub fn new(documents: Vec<Document>, top_k: usize) -> Self {
        Self { documents, top_k }
    }

    /// Load every `*.txt` file under `dir` (recursively) as one document.
    ///
    /// A missing folder or unreadable file is logged and skipped; the
    /// result may be empty but loading never fails.
    pub fn from_dir(dir: &Path, top_k: usize) -> Self {
        let mut files = Vec::new();
        collect_txt_files(dir, &mut files);
        files.sort();

        let documents: Vec<Document> = files
            .into_iter()
            .filter_map(|path| match std::fs::read_to_string(&path) {
                Ok(content) => Some(Document {
                    source: path.display().to_string(),
                    content,
                }),
                Err(e) => {
                    warn!(path = %path.display(), "Skipping unreadable document: {e}");
                    None
                }
            })
            .collect();

        if documents.is_empty() {
            warn!(
                dir = %dir.display(),
                "No documents found; answers will not be grounded in local context"
            );
        } else {
            info!(count = documents.len(), dir = %dir.display(), "Loaded documents");
        }

        Self::new(documents, top_k)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl Retriever for KeywordRetriever {
    fn retrieve(&self, query: &str) -> Vec<String> {
        let terms = terms(query);
        if terms.is_empty() {
            return vec![];
        }

        let mut scored: Vec<(f32, &Document)> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let score = score(&terms, &doc.content);
                (score > 0.0).then_some((score, doc))
            })
            .collect();

        // Stable sort keeps load order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);

        debug!(query, hits = scored.len(), "Retrieved passages");
        scored
            .into_iter()
            .map(|(_, doc)| doc.content.clone())
            .collect()
    }
}

fn collect_txt_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), "Cannot read documents folder: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_txt_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            out.push(path);
        }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
}

fn terms(text: &str) -> HashSet<String> {
    tokens(text).collect()
}

/// Matched-term count, with raw occurrences as a tie-breaker and long
/// documents mildly penalised. Documents are tokenized the same way as the
/// query, so `alpha` does not match `alphabet`.
fn score(terms: &HashSet<String>, content: &str) -> f32 {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokens(content) {
        *counts.entry(token).or_default() += 1;
    }

    let mut matched = 0usize;
    let mut occurrences = 0usize;
    for term in terms {
        if let Some(&n) = counts.get(term) {
            matched += 1;
            occurrences += n;
        }
    }
    if matched == 0 {
        return 0.0;
    }
    let length_penalty = (content.len() as f32 / 1000.0).max(1.0);
    matched as f32 + (occurrences as f32 / length_penalty) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, content: &str) -> Document {
        Document {
            source: source.into(),
            content: content.into(),
        }
    }

    fn corpus() -> KeywordRetriever {
        KeywordRetriever::new(
            vec![
                doc("alpha.txt", "Project Alpha is led by Dana. Alpha launches on 2031-05-01."),
                doc("beta.txt", "Project Beta is a research effort on storage engines."),
                doc("misc.txt", "The cafeteria opens at nine."),
            ],
            2,
        )
    }

    #[test]
    fn ranks_best_match_first() {
        let hits = corpus().retrieve("When does Project Alpha launch?");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].contains("Alpha launches"));
        assert!(hits[1].contains("Beta"));
    }

    #[test]
    fn respects_top_k() {
        let r = KeywordRetriever::new(corpus().documents().to_vec(), 1);
        assert_eq!(r.retrieve("project").len(), 1);
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(corpus().retrieve("quantum chromodynamics").is_empty());
        assert!(corpus().retrieve("a an").is_empty());
    }

    #[test]
    fn matches_whole_words_only() {
        let r = KeywordRetriever::new(
            vec![
                doc("letters.txt", "The alphabet has twenty-six letters."),
                doc("alpha.txt", "Alpha is the first release."),
            ],
            2,
        );
        let hits = r.retrieve("alpha");
        assert_eq!(hits, vec!["Alpha is the first release.".to_string()]);
        assert!(r.retrieve("alphabets").is_empty());
    }

    #[test]
    fn loads_txt_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.txt"), "Alpha budget is 10k.").unwrap();
        std::fs::write(dir.path().join("notes.md"), "Alpha markdown is ignored.").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/beta.txt"), "Beta budget is 20k.").unwrap();

        let r = KeywordRetriever::from_dir(dir.path(), 2);
        assert_eq!(r.len(), 2);
        let hits = r.retrieve("beta budget");
        assert_eq!(hits[0], "Beta budget is 20k.");
    }

    #[test]
    fn missing_dir_yields_empty_retriever() {
        let r = KeywordRetriever::from_dir(Path::new("/nonexistent/docs"), 2);
        assert!(r.is_empty());
        assert!(r.retrieve("anything at all").is_empty());
    }
}
