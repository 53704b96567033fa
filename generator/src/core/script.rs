//! Story script extraction and parsing
//!
//! The story endpoint answers in prose with the script embedded as a
//! fenced JSON block. This module locates the block by its literal
//! delimiter pair and parses it into ordered page drafts.

use serde_json::Value;

use crate::error::{GeneratorError, GeneratorResult};
use crate::types::RawScriptPage;
use shared::PageDraft;

/// Opening marker of the embedded script block
const FENCE_OPEN: &str = "```json\n";
/// Closing marker of the embedded script block
const FENCE_CLOSE: &str = "\n```";

/// Extract the fenced JSON block from the answer text (pure function)
pub fn extract_fenced_json(answer: &str) -> GeneratorResult<&str> {
    let open = answer
        .find(FENCE_OPEN)
        .ok_or_else(|| GeneratorError::malformed("answer is missing the ```json opening marker"))?;
    let body_start = open + FENCE_OPEN.len();
    let body_len = answer[body_start..]
        .find(FENCE_CLOSE)
        .ok_or_else(|| GeneratorError::malformed("answer is missing the ``` closing marker"))?;
    Ok(&answer[body_start..body_start + body_len])
}

/// Parse the script JSON into drafts sorted ascending by page number (pure function)
///
/// Elements missing a required field are dropped, as are duplicate page
/// numbers (first occurrence wins). Only a wholly empty or unparsable
/// script is fatal.
pub fn parse_script(json: &str) -> GeneratorResult<Vec<PageDraft>> {
    let elements: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| GeneratorError::parse(format!("script is not a JSON array: {e}")))?;

    let mut drafts: Vec<PageDraft> = Vec::with_capacity(elements.len());
    for element in elements {
        let raw: RawScriptPage = match serde_json::from_value(element) {
            Ok(raw) => raw,
            Err(_) => continue,
        };
        let (page_number, narrative_text, illustration_prompt) =
            match (raw.page, raw.page_text, raw.illustration_idea) {
                (Some(page), Some(text), Some(idea)) if page >= 1 => (page, text, idea),
                _ => continue,
            };
        drafts.push(PageDraft {
            page_number,
            narrative_text,
            illustration_prompt,
        });
    }

    if drafts.is_empty() {
        return Err(GeneratorError::parse("script contained no usable pages"));
    }

    drafts.sort_by_key(|draft| draft.page_number);
    drafts.dedup_by_key(|draft| draft.page_number);
    Ok(drafts)
}

/// Extract and parse in one step
pub fn parse_answer(answer: &str) -> GeneratorResult<Vec<PageDraft>> {
    parse_script(extract_fenced_json(answer)?)
}
