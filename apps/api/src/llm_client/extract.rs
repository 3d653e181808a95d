//! Record extraction from free-form generation output.
//!
//! The service is instructed to reply with JSON only, but models wrap their
//! output in prose or code fences often enough that extraction is an ordered
//! chain of strategies, first success wins:
//!   1. parse the whole trimmed reply;
//!   2. parse the contents of a triple-backtick fence (optional `json` tag);
//!   3. parse the greedy first-`{`-to-last-`}` span.
//! Final failure aggregates every attempt's error into one `Parse` error
//! carrying the raw reply for diagnostics.

use super::GenerationError;
use crate::models::product::ProductRecord;

pub fn parse_record(raw: &str) -> Result<ProductRecord, GenerationError> {
    let trimmed = raw.trim();
    let mut attempts: Vec<String> = Vec::new();

    match serde_json::from_str::<ProductRecord>(trimmed) {
        Ok(record) => return Ok(record),
        Err(e) => attempts.push(format!("direct parse: {e}")),
    }

    match fenced_block(trimmed) {
        Some(block) => match serde_json::from_str::<ProductRecord>(block) {
            Ok(record) => return Ok(record),
            Err(e) => attempts.push(format!("fenced block: {e}")),
        },
        None => attempts.push("fenced block: no ``` fence found".to_string()),
    }

    match brace_span(trimmed) {
        Some(span) => match serde_json::from_str::<ProductRecord>(span) {
            Ok(record) => return Ok(record),
            Err(e) => attempts.push(format!("embedded object: {e}")),
        },
        None => attempts.push("embedded object: no {...} span found".to_string()),
    }

    Err(GenerationError::Parse {
        detail: attempts.join("; "),
        raw: raw.to_string(),
    })
}

/// Contents of the first triple-backtick fence, tag line stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// Greedy span from the first `{` to the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::sample_record_json;

    fn record_json() -> String {
        serde_json::to_string_pretty(&sample_record_json(
            "California Poppy",
            "Eschscholzia californica",
        ))
        .unwrap()
    }

    #[test]
    fn test_parses_bare_json_object() {
        let record = parse_record(&record_json()).unwrap();
        assert_eq!(record.title, "California Poppy");
    }

    #[test]
    fn test_parses_fenced_json_with_prose() {
        let raw = format!(
            "Here is the product record you asked for:\n```json\n{}\n```\nLet me know if you need anything else.",
            record_json()
        );
        let record = parse_record(&raw).unwrap();
        assert_eq!(record.title, "California Poppy");
    }

    #[test]
    fn test_parses_untagged_fence() {
        let raw = format!("```\n{}\n```", record_json());
        let record = parse_record(&raw).unwrap();
        assert_eq!(record.title, "California Poppy");
    }

    #[test]
    fn test_parses_embedded_object_without_fence() {
        let raw = format!(
            "Sure — the JSON object is {} and that covers every field.",
            record_json()
        );
        let record = parse_record(&raw).unwrap();
        assert_eq!(record.title, "California Poppy");
    }

    #[test]
    fn test_failure_aggregates_all_attempts_and_keeps_raw() {
        let err = parse_record("no structured content here").unwrap_err();
        match err {
            GenerationError::Parse { detail, raw } => {
                assert!(detail.contains("direct parse"));
                assert!(detail.contains("fenced block"));
                assert!(detail.contains("embedded object"));
                assert_eq!(raw, "no structured content here");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_record_fails_even_when_json_is_valid() {
        let mut value = sample_record_json("California Poppy", "Eschscholzia californica");
        value.as_object_mut().unwrap().remove("Title");
        let raw = serde_json::to_string(&value).unwrap();
        assert!(parse_record(&raw).is_err());
    }
}
