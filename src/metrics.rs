use crate::indexer::extract::RelationRecord;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileMetrics {
    pub word_count: usize,
    pub definition_count: usize,
    pub call_count: usize,
}

pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Counts for one file. Records without definitions or calls report zero for them.
pub fn compute_file_metrics(source: &str, record: &RelationRecord) -> FileMetrics {
    FileMetrics {
        word_count: word_count(source),
        definition_count: record.definitions().len(),
        call_count: record.calls().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::extract::PlaceholderRecord;

    #[test]
    fn counts_words_across_punctuation() {
        assert_eq!(word_count("def run(a, b):\n    return a+b"), 7);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  -- ;; "), 0);
    }

    #[test]
    fn placeholder_metrics_are_word_count_only() {
        let source = "just some notes";
        let record = RelationRecord::Unparsed(PlaceholderRecord {
            path: "notes.txt".to_string(),
            content: source.to_string(),
            fault: None,
        });
        let metrics = compute_file_metrics(source, &record);
        assert_eq!(
            metrics,
            FileMetrics {
                word_count: 3,
                definition_count: 0,
                call_count: 0,
            }
        );
    }
}
