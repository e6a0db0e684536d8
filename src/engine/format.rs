//! Formatting helpers for directive patterns
//!
//! Templates carry the pattern language of the original label files:
//! `dd.MM.yyyy`-style date patterns and `0000`-style zero-padding for
//! numbers. These are translated here into chrono format strings and
//! padded decimal output.

use chrono::NaiveDate;

/// Default date pattern used when a token carries no `format:` suffix
pub const DEFAULT_DATE_PATTERN: &str = "dd.MM.yyyy";

/// Translate a template date pattern into a chrono format string
///
/// Supported fields: `yyyy`/`yy`, `MM`/`M`, `dd`/`d`, `HH`/`H`, `mm`/`m`,
/// `ss`/`s` (single letters mean no leading zero). Everything else passes
/// through as a literal.
pub fn date_pattern_to_chrono(pattern: &str) -> String {
    let mut out = String::new();
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        match c {
            'y' => out.push_str(if run >= 4 { "%Y" } else { "%y" }),
            'M' => out.push_str(if run >= 2 { "%m" } else { "%-m" }),
            'd' => out.push_str(if run >= 2 { "%d" } else { "%-d" }),
            'H' => out.push_str(if run >= 2 { "%H" } else { "%-H" }),
            'm' => out.push_str(if run >= 2 { "%M" } else { "%-M" }),
            's' => out.push_str(if run >= 2 { "%S" } else { "%-S" }),
            '%' => {
                for _ in 0..run {
                    out.push_str("%%");
                }
            }
            other => {
                for _ in 0..run {
                    out.push(other);
                }
            }
        }
        i += run;
    }

    out
}

/// Format a date with a template date pattern
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(&date_pattern_to_chrono(pattern)).to_string()
}

/// Parse a date from user or template input
///
/// Accepts the formats the original application's users write:
/// `31.12.2026`, `2026-12-31`, `31.12.26` and `31/12/2026`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    const FORMATS: [&str; 4] = ["%d.%m.%Y", "%Y-%m-%d", "%d.%m.%y", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// The far-future sentinel standing in for "no lot expiration"
pub fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).expect("valid constant date")
}

/// Format an integer with a zero-padding pattern
///
/// An empty pattern gives plain decimal output; a pattern of `0`s pads to
/// that width. Other patterns fall back to plain output.
pub fn format_int(value: i64, pattern: &str) -> String {
    if !pattern.is_empty() && pattern.chars().all(|c| c == '0') {
        format!("{:0width$}", value, width = pattern.len())
    } else {
        value.to_string()
    }
}
