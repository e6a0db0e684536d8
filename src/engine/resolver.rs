//! Token resolver
//!
//! Classifies each token and produces its replacement string. Primary-data
//! lookup always wins; everything else dispatches on a closed set of
//! directive kinds. Every resolution step returns a [`Resolution`] so a
//! cancellation propagates as an explicit value instead of a shared flag.

use chrono::{Duration, Local, NaiveDate};

use crate::error::{LabelError, LabelResult};

use super::channels::{InputSource, Reporter};
use super::format::{
    far_future, format_date, format_int, parse_date, DEFAULT_DATE_PATTERN,
};
use super::primary_data::PrimaryData;
use super::{trim_token, FillOptions};

/// The GS1 function-one separator character
const GS1_SEPARATOR: &str = "\u{1D}";

/// Placeholder emitted for `<date+exp>`: the expiration is deferred to an
/// external marker downstream of the engine.
const EXPIRATION_PLACEHOLDER: &str = "expirace";

/// Outcome of one interactive coercion or token resolution
///
/// `Halted` means the user cancelled (empty answer or `"0"`) or a domain
/// abort fired; the orchestrator stops prompting and clears the print flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Answer<T> {
    Value(T),
    Halted,
}

pub(crate) type Resolution = Answer<String>;

/// The closed set of directive kinds a token can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Gs1,
    User,
    Time,
    Date,
    Quantity,
    Number,
    Freeform,
}

impl TokenKind {
    /// Classify a token body, checked in fixed priority order
    fn classify(body: &str, login: bool) -> Self {
        let lower = body.to_ascii_lowercase();
        if lower == "gs1" {
            Self::Gs1
        } else if login && lower == "uzivatel" {
            Self::User
        } else if lower.starts_with("time") {
            Self::Time
        } else if lower.starts_with("date") {
            Self::Date
        } else if lower.starts_with("pocet") {
            Self::Quantity
        } else if lower.starts_with("number") {
            Self::Number
        } else {
            Self::Freeform
        }
    }
}

/// Per-fill resolution context
///
/// Holds the read-only primary data snapshot, the engine options and the
/// host channels for the duration of one fill. Created by the orchestrator
/// at the start of a fill and discarded at the end.
pub(crate) struct Resolver<'a> {
    primary: &'a PrimaryData,
    options: &'a FillOptions,
    input: &'a mut dyn InputSource,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        primary: &'a PrimaryData,
        options: &'a FillOptions,
        input: &'a mut dyn InputSource,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            primary,
            options,
            input,
            reporter,
        }
    }

    /// Substitute every token into the text, resolving each once
    ///
    /// After a halt the remaining tokens (including the halted one) are
    /// replaced with empty strings without further prompting.
    pub(crate) fn replace_all(
        &mut self,
        mut text: String,
        tokens: &[String],
    ) -> LabelResult<(String, bool)> {
        let mut halted = false;

        for token in tokens {
            let value = if halted {
                String::new()
            } else {
                match self.resolve(token)? {
                    Answer::Value(v) => v,
                    Answer::Halted => {
                        halted = true;
                        String::new()
                    }
                }
            };
            text = text.replace(token.as_str(), &value);
        }

        Ok((text, halted))
    }

    /// Resolve one token to its replacement string
    pub(crate) fn resolve(&mut self, token: &str) -> LabelResult<Resolution> {
        let body = trim_token(token);

        // Primary data takes precedence over every directive kind.
        if let Some(value) = self.primary.lookup(body) {
            return Ok(Answer::Value(value.to_string()));
        }

        match TokenKind::classify(body, self.options.login) {
            TokenKind::Gs1 => Ok(Answer::Value(GS1_SEPARATOR.to_string())),
            TokenKind::User => Ok(Answer::Value(self.options.user.clone())),
            TokenKind::Time => Ok(self.resolve_time(body)),
            TokenKind::Date => Ok(self.resolve_date(body)),
            TokenKind::Quantity => Ok(self.resolve_quantity(body)),
            TokenKind::Number => self.resolve_number(token, body),
            TokenKind::Freeform => Ok(self.resolve_freeform(body)),
        }
    }

    /// `time`, `time+minutes` or `time+prompt`; always formatted `H:mm`
    fn resolve_time(&mut self, body: &str) -> Resolution {
        let Some(plus) = body.find('+') else {
            return Answer::Value(Local::now().format("%-H:%M").to_string());
        };

        let drift = match body[plus + 1..].parse::<i64>() {
            Ok(drift) => drift,
            Err(_) => match self.request_int("Enter minute offset: ", "30") {
                Answer::Value(drift) => drift,
                Answer::Halted => return Answer::Halted,
            },
        };

        Answer::Value((Local::now() + Duration::minutes(drift)).format("%-H:%M").to_string())
    }

    /// `date[+drift[|lotRef]][|format:pattern]` — expiration handling
    fn resolve_date(&mut self, body: &str) -> Resolution {
        // The format suffix is applied last and stripped before parsing.
        let mut parts: Vec<&str> = body.split(['+', '|']).collect();
        let pattern = match parts.last().copied() {
            Some(last) if last.to_ascii_lowercase().starts_with("format:") => {
                parts.pop();
                &last["format:".len()..]
            }
            _ => DEFAULT_DATE_PATTERN,
        };

        let today = Local::now().date_naive();

        if parts.len() == 1 {
            // Plain <date>: no drift means "now".
            return Answer::Value(format_date(today, pattern));
        }

        if parts[1].eq_ignore_ascii_case("exp") {
            return Answer::Value(EXPIRATION_PLACEHOLDER.to_string());
        }

        let Ok(drift) = parts[1].parse::<i64>() else {
            return Answer::Value(String::new());
        };
        let bottle_expiration = today + Duration::days(drift);

        if parts.len() == 2 {
            return Answer::Value(format_date(bottle_expiration, pattern));
        }

        if parts.len() == 3 {
            let lot_expiration = match self.lot_expiration(parts[2]) {
                Answer::Value(date) => date,
                Answer::Halted => return Answer::Halted,
            };

            if lot_expiration < today {
                self.reporter.report_info(&format!(
                    "Lot expiration ({}) has already passed. Labels will not be printed; \
                     check the expiration data.",
                    format_date(lot_expiration, DEFAULT_DATE_PATTERN)
                ));
                return Answer::Halted;
            }

            if lot_expiration < today + Duration::days(30) {
                self.reporter.report_info(&format!(
                    "Lot expiration ({}) is less than one month away; \
                     check the expiration data.",
                    format_date(lot_expiration, DEFAULT_DATE_PATTERN)
                ));
            }

            let date_to_print = bottle_expiration.min(lot_expiration);
            return Answer::Value(format_date(date_to_print, pattern));
        }

        // More parts than the directive defines.
        Answer::Value(String::new())
    }

    /// Resolve the lot-expiration source of a date directive
    ///
    /// Tried in order: the literal `0` (no lot expiration), a literal date,
    /// a primary-data key whose value parses as a date, and finally an
    /// interactive prompt defaulting to the far-future sentinel.
    fn lot_expiration(&mut self, source: &str) -> Answer<NaiveDate> {
        if source == "0" {
            return Answer::Value(far_future());
        }
        if let Some(date) = parse_date(source) {
            return Answer::Value(date);
        }
        if let Some(date) = self.primary.lookup(source).and_then(parse_date) {
            return Answer::Value(date);
        }

        let default = format_date(far_future(), DEFAULT_DATE_PATTERN);
        self.request_date("Enter lot expiration: ", &default)
    }

    /// `pocet` or `pocet|default` — interactive label count, clamped
    fn resolve_quantity(&mut self, body: &str) -> Resolution {
        let default = body
            .split_once('|')
            .and_then(|(_, rest)| rest.trim().parse::<i64>().ok())
            .unwrap_or(1);

        match self.request_int("Enter label count: ", &default.to_string()) {
            Answer::Value(quantity) => {
                let clamped = quantity.min(i64::from(self.options.max_quantity));
                Answer::Value(clamped.to_string())
            }
            Answer::Halted => Answer::Halted,
        }
    }

    /// `number|promptOrLiteral|format:pattern`
    fn resolve_number(&mut self, token: &str, body: &str) -> LabelResult<Resolution> {
        let parts: Vec<&str> = body.split('|').collect();
        if parts.len() < 2 {
            return Err(LabelError::bad_token(token, "<number|prompt|format:0000>"));
        }

        let pattern = match parts.get(2) {
            Some(part) if part.to_ascii_lowercase().starts_with("format:") => {
                &part["format:".len()..]
            }
            _ => "",
        };

        if let Ok(value) = parts[1].parse::<i64>() {
            return Ok(Answer::Value(format_int(value, pattern)));
        }

        let prompt = format!("Enter {}: ", parts[1]);
        Ok(match self.request_int(&prompt, "") {
            Answer::Value(value) => Answer::Value(format_int(value, pattern)),
            Answer::Halted => Answer::Halted,
        })
    }

    /// Anything unrecognized: prompt with the token body as the label
    fn resolve_freeform(&mut self, body: &str) -> Resolution {
        match self.request_raw(&format!("Enter {}", body), "") {
            Some(answer) => Answer::Value(answer),
            None => Answer::Halted,
        }
    }

    /// Issue a prompt; `None` means the user cancelled
    fn request_raw(&mut self, prompt: &str, default: &str) -> Option<String> {
        let answer = self.input.request_input(prompt, default);
        if answer.is_empty() || answer == "0" {
            None
        } else {
            Some(answer)
        }
    }

    /// Prompt for an integer; unparseable answers coerce to zero
    pub(crate) fn request_int(&mut self, prompt: &str, default: &str) -> Answer<i64> {
        match self.request_raw(prompt, default) {
            Some(answer) => Answer::Value(answer.trim().parse().unwrap_or(0)),
            None => Answer::Halted,
        }
    }

    /// Prompt for a date; unparseable answers coerce to the minimum date
    fn request_date(&mut self, prompt: &str, default: &str) -> Answer<NaiveDate> {
        match self.request_raw(prompt, default) {
            Some(answer) => Answer::Value(parse_date(&answer).unwrap_or(NaiveDate::MIN)),
            None => Answer::Halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{Recorder, ScriptedInput};

    fn options() -> FillOptions {
        FillOptions {
            max_quantity: 50,
            login: false,
            user: String::new(),
        }
    }

    fn resolve_one(
        token: &str,
        primary: &PrimaryData,
        options: &FillOptions,
        input: &mut ScriptedInput,
        reporter: &mut Recorder,
    ) -> LabelResult<Resolution> {
        let mut resolver = Resolver::new(primary, options, input, reporter);
        resolver.resolve(token)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn test_primary_data_takes_precedence() {
        // A key shadowing a directive prefix must still resolve literally.
        let primary = PrimaryData::parse("date: from-table\n");
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<date>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("from-table".to_string()));
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_gs1_token() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<GS1>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("\u{1D}".to_string()));
        let resolved =
            resolve_one("<gs1>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("\u{1D}".to_string()));
    }

    #[test]
    fn test_user_token_gated_by_login() {
        let primary = PrimaryData::new();
        let mut opts = options();
        opts.user = "alice".to_string();
        let mut reporter = Recorder::default();

        // Login disabled: falls through to a freeform prompt.
        let mut input = ScriptedInput::new(&["typed"]);
        let resolved =
            resolve_one("<uzivatel>", &primary, &opts, &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("typed".to_string()));

        // Login enabled: resolves to the configured user without prompting.
        opts.login = true;
        let mut input = ScriptedInput::echo();
        let resolved =
            resolve_one("<uzivatel>", &primary, &opts, &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("alice".to_string()));
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_plain_date_uses_default_pattern() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<date>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(
            resolved,
            Answer::Value(format_date(today(), DEFAULT_DATE_PATTERN))
        );
    }

    #[test]
    fn test_date_format_suffix() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved = resolve_one(
            "<date|format:yyyy-MM-dd>",
            &primary,
            &options(),
            &mut input,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(resolved, Answer::Value(today().format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn test_date_exp_placeholder() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<date+exp>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("expirace".to_string()));
    }

    #[test]
    fn test_date_with_drift() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<date+10>", &primary, &options(), &mut input, &mut reporter).unwrap();
        let expected = format_date(today() + Duration::days(10), DEFAULT_DATE_PATTERN);
        assert_eq!(resolved, Answer::Value(expected));
    }

    #[test]
    fn test_expired_lot_aborts() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let yesterday = format_date(today() - Duration::days(1), DEFAULT_DATE_PATTERN);
        let token = format!("<date+10|{}>", yesterday);
        let resolved =
            resolve_one(&token, &primary, &options(), &mut input, &mut reporter).unwrap();

        assert_eq!(resolved, Answer::Halted);
        assert_eq!(reporter.infos.len(), 1);
        assert!(reporter.infos[0].contains("already passed"));
    }

    #[test]
    fn test_lot_expiring_soon_warns_but_continues() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let lot = today() + Duration::days(29);
        let token = format!("<date+90|{}>", format_date(lot, DEFAULT_DATE_PATTERN));
        let resolved =
            resolve_one(&token, &primary, &options(), &mut input, &mut reporter).unwrap();

        // Lot is earlier than the bottle expiration, so it wins.
        assert_eq!(resolved, Answer::Value(format_date(lot, DEFAULT_DATE_PATTERN)));
        assert_eq!(reporter.infos.len(), 1);
        assert!(reporter.infos[0].contains("less than one month"));
    }

    #[test]
    fn test_earlier_of_bottle_and_lot_wins() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        // Bottle expiration (today+5) is earlier than the lot (today+60).
        let lot = format_date(today() + Duration::days(60), DEFAULT_DATE_PATTERN);
        let token = format!("<date+5|{}>", lot);
        let resolved =
            resolve_one(&token, &primary, &options(), &mut input, &mut reporter).unwrap();
        let expected = format_date(today() + Duration::days(5), DEFAULT_DATE_PATTERN);
        assert_eq!(resolved, Answer::Value(expected));
        assert!(reporter.infos.is_empty());
    }

    #[test]
    fn test_lot_zero_means_far_future() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<date+5|0>", &primary, &options(), &mut input, &mut reporter).unwrap();
        let expected = format_date(today() + Duration::days(5), DEFAULT_DATE_PATTERN);
        assert_eq!(resolved, Answer::Value(expected));
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_lot_from_primary_data() {
        let lot = today() + Duration::days(200);
        let content = format!("expirace: {}\n", format_date(lot, DEFAULT_DATE_PATTERN));
        let primary = PrimaryData::parse(&content);
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved = resolve_one(
            "<date+5|expirace>",
            &primary,
            &options(),
            &mut input,
            &mut reporter,
        )
        .unwrap();
        let expected = format_date(today() + Duration::days(5), DEFAULT_DATE_PATTERN);
        assert_eq!(resolved, Answer::Value(expected));
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_lot_prompted_when_unresolvable() {
        let primary = PrimaryData::new();
        let lot = format_date(today() + Duration::days(45), DEFAULT_DATE_PATTERN);
        let mut input = ScriptedInput::new(&[lot.as_str()]);
        let mut reporter = Recorder::default();

        let resolved = resolve_one(
            "<date+90|unknownkey>",
            &primary,
            &options(),
            &mut input,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(resolved, Answer::Value(lot));
        assert_eq!(input.prompts.len(), 1);
    }

    #[test]
    fn test_quantity_clamped_to_max() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&["500"]);
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<pocet>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("50".to_string()));
    }

    #[test]
    fn test_quantity_literal_becomes_prompt_default() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<pocet|4>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("4".to_string()));
        assert_eq!(input.prompts.len(), 1);
        assert_eq!(input.defaults, vec!["4"]);
    }

    #[test]
    fn test_number_literal_with_padding() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let resolved = resolve_one(
            "<number|42|format:0000>",
            &primary,
            &options(),
            &mut input,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(resolved, Answer::Value("0042".to_string()));
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_number_prompts_for_non_literal() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&["17"]);
        let mut reporter = Recorder::default();

        let resolved = resolve_one(
            "<number|serial|format:000>",
            &primary,
            &options(),
            &mut input,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(resolved, Answer::Value("017".to_string()));
        assert!(input.prompts[0].contains("serial"));
    }

    #[test]
    fn test_number_missing_prompt_part_is_error() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let err =
            resolve_one("<number>", &primary, &options(), &mut input, &mut reporter).unwrap_err();
        assert!(err.is_token_format());
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_freeform_returns_raw_answer() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&["L-2406/17"]);
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<sarze>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Value("L-2406/17".to_string()));
        assert_eq!(input.prompts, vec!["Enter sarze"]);
    }

    #[test]
    fn test_empty_answer_halts() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&[""]);
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<sarze>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Halted);
    }

    #[test]
    fn test_zero_answer_halts() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&["0"]);
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<pocet>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert_eq!(resolved, Answer::Halted);
    }

    #[test]
    fn test_time_with_literal_drift() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::echo();
        let mut reporter = Recorder::default();

        let before = (Local::now() + Duration::minutes(90)).format("%-H:%M").to_string();
        let resolved =
            resolve_one("<time+90>", &primary, &options(), &mut input, &mut reporter).unwrap();
        let after = (Local::now() + Duration::minutes(90)).format("%-H:%M").to_string();

        match resolved {
            Answer::Value(v) => assert!(v == before || v == after),
            Answer::Halted => panic!("time token must not halt"),
        }
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_time_prompts_on_non_numeric_drift() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&["15"]);
        let mut reporter = Recorder::default();

        let resolved =
            resolve_one("<time+ask>", &primary, &options(), &mut input, &mut reporter).unwrap();
        assert!(matches!(resolved, Answer::Value(_)));
        assert_eq!(input.defaults, vec!["30"]);
    }

    #[test]
    fn test_replace_all_halts_remaining_tokens() {
        let primary = PrimaryData::new();
        let mut input = ScriptedInput::new(&[""]);
        let mut reporter = Recorder::default();
        let opts = options();
        let mut resolver = Resolver::new(&primary, &opts, &mut input, &mut reporter);

        let tokens = vec!["<first>".to_string(), "<second>".to_string()];
        let (text, halted) = resolver
            .replace_all("a <first> b <second> c".to_string(), &tokens)
            .unwrap();

        assert!(halted);
        assert_eq!(text, "a  b  c");
        // The second token must not have prompted.
        assert_eq!(input.prompts.len(), 1);
    }
}
