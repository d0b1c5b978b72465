use serde_json::Value;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Upper bound on the raw-text prefix carried in extraction errors
const RAW_PREVIEW_LIMIT: usize = 500;

/// One way of locating a JSON candidate inside raw model output.
///
/// Strategies are tried in a fixed order; the first one that yields a
/// candidate wins and the candidate is parsed. A parse failure fails the
/// whole extraction rather than falling through to the next strategy.
trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str>;
}

/// Fenced block explicitly tagged as JSON: ```json ... ```
struct JsonFence;

impl ExtractionStrategy for JsonFence {
    fn name(&self) -> &'static str {
        "json-fence"
    }

    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str> {
        fenced_body(raw, "```json")
    }
}

/// Generic fenced block with no tag on the opener line
struct BareFence;

impl ExtractionStrategy for BareFence {
    fn name(&self) -> &'static str {
        "bare-fence"
    }

    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str> {
        fenced_body(raw, "```")
    }
}

/// Substring from the first `{` to the last `}`, inclusive
struct BraceSpan;

impl ExtractionStrategy for BraceSpan {
    fn name(&self) -> &'static str {
        "brace-span"
    }

    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let first = raw.find('{')?;
        let last = raw.rfind('}')?;
        if last > first {
            Some(&raw[first..=last])
        } else {
            None
        }
    }
}

/// The trimmed raw text verbatim, as the last resort
struct WholeText;

impl ExtractionStrategy for WholeText {
    fn name(&self) -> &'static str {
        "raw-text"
    }

    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str> {
        Some(raw.trim())
    }
}

/// Body of the first fence whose opener starts with `opener` and whose
/// opener line carries nothing else; runs to the next closing fence.
/// Openers with a different tag on the line (e.g. ```python) are skipped
/// and the scan continues at the next occurrence.
fn fenced_body<'a>(raw: &'a str, opener: &str) -> Option<&'a str> {
    let mut search_from = 0;
    while let Some(found) = raw[search_from..].find(opener) {
        let start = search_from + found + opener.len();
        let after_opener = &raw[start..];
        let newline = after_opener.find('\n')?;

        if after_opener[..newline].trim().is_empty() {
            let body = &after_opener[newline + 1..];
            let end = body.find("```")?;
            return Some(body[..end].trim());
        }

        search_from = start;
    }
    None
}

/// Recover a JSON value from raw model output, tolerating surrounding
/// prose and markdown fencing.
pub fn extract_json(raw: &str) -> Result<Value> {
    let strategies: [&dyn ExtractionStrategy; 4] =
        [&JsonFence, &BareFence, &BraceSpan, &WholeText];

    for strategy in strategies {
        let Some(candidate) = strategy.candidate(raw) else {
            continue;
        };

        debug!(
            strategy = strategy.name(),
            candidate_chars = candidate.len(),
            "parsing extracted JSON candidate"
        );

        return serde_json::from_str(candidate).map_err(|err| PipelineError::Extraction {
            message: format!("{} (via {})", err, strategy.name()),
            raw_preview: preview(raw),
        });
    }

    Err(PipelineError::Extraction {
        message: "no extraction strategy produced a candidate".to_string(),
        raw_preview: preview(raw),
    })
}

fn preview(raw: &str) -> String {
    raw.chars().take(RAW_PREVIEW_LIMIT).collect()
}
