pub mod client;
pub mod types;

pub use client::TavilyClient;
pub use types::{SearchDepth, SearchRequest, SearchResult, TimeRange, Topic};

use crate::error::Result;
use async_trait::async_trait;

pub const NO_ANSWER: &str = "No answer found.";

/// A search provider. One call per invocation, no retries.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult>;
}

/// Joins result contents with blank lines and keeps the first `max_chars` characters.
///
/// The limit counts characters, not model tokens.
pub fn build_context(result: &SearchResult, max_chars: usize) -> String {
    let joined = result
        .results
        .iter()
        .map(|hit| hit.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    match joined.char_indices().nth(max_chars) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

pub fn answer_or_fallback(result: &SearchResult) -> String {
    result
        .answer
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(NO_ANSWER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tavily::types::SearchHit;

    fn result_with(contents: &[&str], answer: Option<&str>) -> SearchResult {
        SearchResult {
            query: "q".into(),
            answer: answer.map(String::from),
            response_time: 0.1,
            results: contents
                .iter()
                .enumerate()
                .map(|(i, c)| SearchHit {
                    title: format!("t{i}"),
                    url: format!("https://example.com/{i}"),
                    content: c.to_string(),
                    raw_content: None,
                    score: 0.5,
                    published_date: None,
                })
                .collect(),
            images: None,
        }
    }

    #[test]
    fn context_joins_in_result_order() {
        let result = result_with(&["first", "second"], None);
        assert_eq!(build_context(&result, 4000), "first\n\nsecond");
    }

    #[test]
    fn context_truncates_by_characters() {
        let result = result_with(&["abcdefgh", "ijklmnop"], None);
        let context = build_context(&result, 10);
        assert_eq!(context, "abcdefgh\n\n");
        assert_eq!(context.chars().count(), 10);
    }

    #[test]
    fn context_truncation_respects_multibyte_chars() {
        let result = result_with(&["日本語のテキスト"], None);
        assert_eq!(build_context(&result, 3), "日本語");
    }

    #[test]
    fn context_of_empty_results_is_empty() {
        assert_eq!(build_context(&result_with(&[], None), 10), "");
    }

    #[test]
    fn answer_falls_back_when_missing() {
        assert_eq!(answer_or_fallback(&result_with(&[], None)), "No answer found.");
        assert_eq!(answer_or_fallback(&result_with(&[], Some("42"))), "42");
    }
}
