//! The template fill engine
//!
//! Takes a label template, resolves its `<...>` tokens against the primary
//! data table, the built-in directive handlers and the interactive input
//! channel, and produces a rendered body ready for the printer.
//!
//! The engine processes one template at a time: a fill runs to completion
//! before the next begins, and each fill owns its own resolution context.

pub mod channels;
pub mod format;
pub mod primary_data;
pub mod scanner;

mod resolver;
mod sequence;

pub use channels::{InputSource, Reporter};
pub use primary_data::PrimaryData;

use crate::config::settings::DEFAULT_MAX_QUANTITY;
use crate::error::LabelResult;

use resolver::Resolver;

/// Engine-facing configuration, passed in at construction time
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Clamp for the `<pocet>` quantity token
    pub max_quantity: u32,
    /// Gates the `<uzivatel>` token
    pub login: bool,
    /// Value substituted for `<uzivatel>` when login is enabled
    pub user: String,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            login: false,
            user: String::new(),
        }
    }
}

/// The result of one fill
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// The rendered body; only meaningful when `should_print` is true
    pub body: String,
    /// False when the fill was cancelled or aborted
    pub should_print: bool,
    /// New template source produced by a `save` sequence directive
    pub updated_template: Option<String>,
}

impl FillOutcome {
    /// An aborted fill: empty body, nothing to print
    pub(crate) fn aborted() -> Self {
        Self {
            body: String::new(),
            should_print: false,
            updated_template: None,
        }
    }
}

/// The fill orchestrator
///
/// Owns the primary data snapshot and options for a series of sequential
/// fills. The interactive channels are supplied per call so the same engine
/// can be driven by a terminal or by a scripted test.
pub struct FillEngine {
    options: FillOptions,
    primary: PrimaryData,
}

impl FillEngine {
    /// Create an engine over a primary data table
    pub fn new(primary: PrimaryData, options: FillOptions) -> Self {
        Self { options, primary }
    }

    /// Fill one template, producing the rendered body
    ///
    /// Format errors are reported through the error channel and yield an
    /// aborted outcome; they never propagate to the caller.
    pub fn fill(
        &self,
        source: &str,
        input: &mut dyn InputSource,
        reporter: &mut dyn Reporter,
    ) -> FillOutcome {
        match self.try_fill(source, input, reporter) {
            Ok(outcome) => outcome,
            Err(err) => {
                reporter.report_error(&err.to_string());
                FillOutcome::aborted()
            }
        }
    }

    fn try_fill(
        &self,
        source: &str,
        input: &mut dyn InputSource,
        reporter: &mut dyn Reporter,
    ) -> LabelResult<FillOutcome> {
        let template = preprocess(source);
        let tokens = scanner::scan_tokens(&template)?;
        let mut resolver = Resolver::new(&self.primary, &self.options, input, reporter);

        if let Some(seq_token) = tokens.iter().find(|t| sequence::is_sequence_token(t)) {
            return sequence::expand(source, &template, &tokens, seq_token, &mut resolver);
        }

        let (body, halted) = resolver.replace_all(template, &tokens)?;
        Ok(FillOutcome {
            body,
            should_print: !halted,
            updated_template: None,
        })
    }
}

/// Strip comment lines, auto-append `<pocet>` after a bare trailing `P`
/// command, and normalize the trailing line break
fn preprocess(source: &str) -> String {
    let kept: Vec<&str> = source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect();
    let joined = kept.join("\n");
    let trimmed = joined.trim_end();

    if trimmed.ends_with('P') {
        format!("{}<pocet>\n", trimmed)
    } else {
        format!("{}\n", trimmed)
    }
}

/// Strip the surrounding angle brackets from a token
pub(crate) fn trim_token(token: &str) -> &str {
    token.trim_matches(|c| c == '<' || c == '>')
}


#[cfg(test)]
mod tests {
    use super::test_support::{Recorder, ScriptedInput};
    use super::*;

    fn engine() -> FillEngine {
        FillEngine::new(PrimaryData::new(), FillOptions::default())
    }

    fn engine_with(primary: &str) -> FillEngine {
        FillEngine::new(PrimaryData::parse(primary), FillOptions::default())
    }

    #[test]
    fn test_no_tokens_passes_through() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("N\nI8,B\nP2\n", &mut input, &mut reporter);
        assert!(outcome.should_print);
        assert_eq!(outcome.body, "N\nI8,B\nP2\n");
        assert!(outcome.updated_template.is_none());
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_comment_lines_stripped() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("# a note\nN\n  # indented note\nP2\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "N\nP2\n");
        assert!(outcome.should_print);
    }

    #[test]
    fn test_trailing_p_requests_quantity() {
        let mut input = ScriptedInput::new(&["3"]);
        let mut reporter = Recorder::default();

        let outcome = engine().fill("N\nP\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "N\nP3\n");
        assert_eq!(input.prompts.len(), 1);
    }

    #[test]
    fn test_primary_data_substitution() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let engine = engine_with("name: Acme\nsarze: L7\n");
        let outcome = engine.fill("A,\"<name>\"\nB,\"<SARZE>\"\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "A,\"Acme\"\nB,\"L7\"\n");
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_repeated_token_resolved_once() {
        let mut input = ScriptedInput::new(&["X"]);
        let mut reporter = Recorder::default();

        let outcome = engine().fill("<foo>a<foo>\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "XaX\n");
        // The prompt must fire exactly once for both occurrences.
        assert_eq!(input.prompts.len(), 1);
    }

    #[test]
    fn test_sequence_expansion() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("X<sequence|1|3>\n", &mut input, &mut reporter);
        assert!(outcome.should_print);
        assert_eq!(outcome.body, "X1\nX2\nX3\n");
        assert!(outcome.updated_template.is_none());
    }

    #[test]
    fn test_sequence_expansion_with_format() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("X<sequence|1|3|format:000>\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "X001\nX002\nX003\n");
    }

    #[test]
    fn test_sequence_persistence() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("X<sequence|1|3|save>\n", &mut input, &mut reporter);
        assert!(outcome.should_print);
        assert_eq!(
            outcome.updated_template.as_deref(),
            Some("X<sequence|4|3|save>\n")
        );
    }

    #[test]
    fn test_sequence_shares_other_token_values() {
        let mut input = ScriptedInput::new(&["1", "2", "L7"]);
        let mut reporter = Recorder::default();

        let outcome = engine().fill("<sarze>-<sequence|1|2>\n", &mut input, &mut reporter);
        assert_eq!(outcome.body, "L7-1\nL7-2\n");
        // Three prompts total: start, steps, and the lot exactly once.
        assert_eq!(input.prompts.len(), 3);
    }

    #[test]
    fn test_sequence_cancellation_stops_fill() {
        let mut input = ScriptedInput::new(&["1", ""]);
        let mut reporter = Recorder::default();

        let outcome = engine().fill("<sarze>-<sequence|1|3>\n", &mut input, &mut reporter);
        assert!(!outcome.should_print);
        assert!(outcome.body.is_empty());
        // Start and steps prompted; the cancellation must suppress the
        // remaining <sarze> prompt.
        assert_eq!(input.prompts.len(), 2);
    }

    #[test]
    fn test_malformed_sequence_reports_error_without_prompting() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("X<sequence|1>\n", &mut input, &mut reporter);
        assert!(!outcome.should_print);
        assert!(outcome.body.is_empty());
        assert_eq!(reporter.errors.len(), 1);
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_malformed_brackets_abort() {
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let outcome = engine().fill("a>b<c>\n", &mut input, &mut reporter);
        assert!(!outcome.should_print);
        assert!(outcome.body.is_empty());
        assert_eq!(reporter.errors.len(), 1);
    }

    #[test]
    fn test_cancelled_fill_keeps_partial_body_unprintable() {
        let mut input = ScriptedInput::new(&["first", ""]);
        let mut reporter = Recorder::default();

        let outcome = engine().fill("<a>|<b>|literal\n", &mut input, &mut reporter);
        assert!(!outcome.should_print);
        assert_eq!(outcome.body, "first||literal\n");
    }
}
