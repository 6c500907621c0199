//! Prompt construction and reply parsing.
//!
//! Providers wrap JSON replies in prose or code fences often enough that
//! the parsers here cut the reply down to its outermost JSON array before
//! deserializing.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::client::{AiError, DocumentSnippet, RankedDocument};

pub const SYSTEM_PROMPT: &str =
    "You are an assistant for a team knowledge base. Be concise and factual, \
     and follow the output format requested in each task exactly.";

// ---------------------------------------------------------------------------
// Prompt builders
// ---------------------------------------------------------------------------

pub fn summarize_prompt(title: &str, content: &str) -> String {
    format!(
        "Summarize the following team document in two or three sentences of \
         plain text. Reply with the summary only.\n\nTitle: {title}\n\n{content}"
    )
}

pub fn tags_prompt(title: &str, content: &str) -> String {
    format!(
        "Suggest between 3 and 7 short lowercase tags for the following team \
         document. Reply with a JSON array of strings and nothing else.\n\n\
         Title: {title}\n\n{content}"
    )
}

pub fn ranking_prompt(query: &str, documents: &[DocumentSnippet]) -> String {
    let mut prompt = String::from(
        "Rank the documents below by semantic relevance to the query. Reply \
         with a JSON array of objects {\"id\": number, \"relevance\": number} \
         where relevance is 0-100, ordered most relevant first. Include only \
         documents that are actually relevant, and nothing but the JSON.\n\n",
    );
    let _ = writeln!(prompt, "Query: {query}\n");
    for document in documents {
        let _ = writeln!(
            prompt,
            "[id {}] {}\n{}\n",
            document.id, document.title, document.excerpt
        );
    }
    prompt
}

pub fn answer_prompt(question: &str, documents: &[DocumentSnippet]) -> String {
    let mut prompt = String::from(
        "Answer the question using only the documents below. If they do not \
         contain the answer, say so plainly.\n\n",
    );
    for document in documents {
        let _ = writeln!(
            prompt,
            "[id {}] {}\n{}\n",
            document.id, document.title, document.excerpt
        );
    }
    let _ = write!(prompt, "Question: {question}");
    prompt
}

// ---------------------------------------------------------------------------
// Reply parsers
// ---------------------------------------------------------------------------

/// Parse a tag-suggestion reply into trimmed, lowercased, deduplicated
/// tags.
pub fn parse_tags(raw: &str) -> Result<Vec<String>, AiError> {
    let json = extract_json_array(raw)
        .ok_or_else(|| AiError::Malformed("no JSON array in tag reply".to_string()))?;
    let tags: Vec<String> = serde_json::from_str(json)
        .map_err(|e| AiError::Malformed(format!("tag reply did not parse: {e}")))?;

    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    Ok(cleaned)
}

/// Parse a ranking reply. Relevance scores are clamped to 0-100; the
/// provider's ordering is preserved.
pub fn parse_rankings(raw: &str) -> Result<Vec<RankedDocument>, AiError> {
    #[derive(Deserialize)]
    struct RawRanking {
        id: i64,
        relevance: i64,
    }

    let json = extract_json_array(raw)
        .ok_or_else(|| AiError::Malformed("no JSON array in ranking reply".to_string()))?;
    let entries: Vec<RawRanking> = serde_json::from_str(json)
        .map_err(|e| AiError::Malformed(format!("ranking reply did not parse: {e}")))?;

    Ok(entries
        .into_iter()
        .map(|entry| RankedDocument {
            id: entry.id,
            relevance: entry.relevance.clamp(0, 100) as u8,
        })
        .collect())
}

/// The outermost `[...]` span of the reply, if any.
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_from_a_bare_array() {
        let tags = parse_tags(r#"["Rust", " api ", "rust", ""]"#).unwrap();
        assert_eq!(tags, vec!["rust".to_string(), "api".to_string()]);
    }

    #[test]
    fn tags_parse_through_code_fences_and_prose() {
        let raw = "Here you go:\n```json\n[\"infra\", \"oncall\"]\n```\nAnything else?";
        let tags = parse_tags(raw).unwrap();
        assert_eq!(tags, vec!["infra".to_string(), "oncall".to_string()]);
    }

    #[test]
    fn tags_reject_replies_without_an_array() {
        assert!(parse_tags("I would suggest rust and api.").is_err());
    }

    #[test]
    fn rankings_parse_and_clamp_scores() {
        let raw = r#"[{"id": 3, "relevance": 150}, {"id": 1, "relevance": -5}]"#;
        let ranked = parse_rankings(raw).unwrap();
        assert_eq!(
            ranked,
            vec![
                RankedDocument {
                    id: 3,
                    relevance: 100
                },
                RankedDocument { id: 1, relevance: 0 },
            ]
        );
    }

    #[test]
    fn rankings_reject_wrongly_shaped_entries() {
        assert!(parse_rankings(r#"[{"doc": 3}]"#).is_err());
        assert!(parse_rankings("no array here").is_err());
    }

    #[test]
    fn ranking_prompt_lists_ids_and_query() {
        let snippets = vec![DocumentSnippet::new(7, "Runbook", "Restart the worker")];
        let prompt = ranking_prompt("how do I restart", &snippets);
        assert!(prompt.contains("[id 7] Runbook"));
        assert!(prompt.contains("Query: how do I restart"));
    }
}
