//! Sequence expander
//!
//! A `<sequence|start|steps|[save]|[format:0000]>` token cross-expands the
//! template into one block per generated value. The optional trailing parts
//! are identified by content, not position. With `save`, the directive
//! rewrites its own start value back into the template's stored source so
//! the next fill continues where this one left off.

use crate::error::{LabelError, LabelResult};

use super::format::format_int;
use super::resolver::{Answer, Resolver};
use super::{trim_token, FillOutcome};

/// A parsed sequence directive
#[derive(Debug, Clone)]
pub(crate) struct SequenceDirective {
    /// The `start` part verbatim; may be a prompt label rather than a number
    start_text: String,
    /// The `steps` part verbatim; preserved as-is when rebuilding
    steps_text: String,
    /// The optional trailing parts verbatim, in their original order
    extras: Vec<String>,
    /// Whether `save` was among the extras
    save: bool,
    /// Zero-padding pattern from a `format:` extra, empty for plain output
    format: String,
}

impl SequenceDirective {
    /// Parse a sequence token
    ///
    /// Valid shapes have 3 to 5 `|`-separated parts. Anything else is a
    /// format error, reported before any prompt is issued.
    pub(crate) fn parse(token: &str) -> LabelResult<Self> {
        let parts: Vec<&str> = trim_token(token).split('|').collect();
        if !(3..=5).contains(&parts.len()) {
            return Err(LabelError::bad_token(
                token,
                "<sequence|start|steps|[save]|[format:0000]>",
            ));
        }

        let mut save = false;
        let mut format = String::new();
        for part in &parts[3..] {
            if part.eq_ignore_ascii_case("save") {
                save = true;
            } else if part.to_ascii_lowercase().starts_with("format:") {
                format = part["format:".len()..].to_string();
            }
        }

        Ok(Self {
            start_text: parts[1].to_string(),
            steps_text: parts[2].to_string(),
            extras: parts[3..].iter().map(|p| p.to_string()).collect(),
            save,
            format,
        })
    }

    /// Rebuild the token with a new start, preserving the recognized extras
    /// in their original order
    fn rebuild(&self, new_start: i64) -> String {
        let mut parts = vec![
            "sequence".to_string(),
            new_start.to_string(),
            self.steps_text.clone(),
        ];
        for extra in &self.extras {
            if extra.eq_ignore_ascii_case("save")
                || extra.to_ascii_lowercase().starts_with("format:")
            {
                parts.push(extra.clone());
            }
        }
        format!("<{}>", parts.join("|"))
    }
}

/// Check whether a token is a sequence directive
pub(crate) fn is_sequence_token(token: &str) -> bool {
    trim_token(token)
        .to_ascii_lowercase()
        .starts_with("sequence|")
}

/// Expand a template around its sequence directive
///
/// `source` is the template's stored source (the persistence target);
/// `template` is the preprocessed working copy. Non-sequence tokens are
/// resolved once across the concatenated result so every block shares the
/// same values.
pub(crate) fn expand(
    source: &str,
    template: &str,
    tokens: &[String],
    seq_token: &str,
    resolver: &mut Resolver<'_>,
) -> LabelResult<FillOutcome> {
    let directive = SequenceDirective::parse(seq_token)?;

    let start = match resolver.request_int("Enter sequence start: ", &directive.start_text) {
        Answer::Value(start) => start,
        Answer::Halted => return Ok(FillOutcome::aborted()),
    };
    let steps = match resolver.request_int("Enter step count: ", &directive.steps_text) {
        Answer::Value(steps) => steps,
        Answer::Halted => return Ok(FillOutcome::aborted()),
    };

    // Persist the advanced start into the stored source, not the working
    // copy; the owning record writes it back.
    let updated_template = directive
        .save
        .then(|| source.replace(seq_token, &directive.rebuild(start + steps)));

    let mut expanded = String::new();
    for value in start..start + steps {
        expanded.push_str(&template.replace(seq_token, &format_int(value, &directive.format)));
    }

    let others: Vec<String> = tokens
        .iter()
        .filter(|t| t.as_str() != seq_token)
        .cloned()
        .collect();
    let (body, halted) = resolver.replace_all(expanded, &others)?;

    Ok(FillOutcome {
        body,
        should_print: !halted,
        updated_template,
    })
}
