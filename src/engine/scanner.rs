//! Token scanner
//!
//! Extracts `<...>` tokens from a template in first-appearance order,
//! deduplicated. A `>` appearing before the next `<` is a format error; a
//! trailing `<` with no closing bracket ends the scan silently.

use crate::error::{LabelError, LabelResult};

/// Scan a template for placeholder tokens
///
/// Each token is the minimal `<...>` span found scanning left to right.
/// Tokens are compared by their literal text, so `<date>` and `<date|exp>`
/// are distinct while two occurrences of `<date>` are one token.
pub fn scan_tokens(template: &str) -> LabelResult<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut cursor = 0;

    loop {
        let open = match template[cursor..].find('<') {
            Some(i) => cursor + i,
            None => break,
        };
        let close = match template[cursor..].find('>') {
            // No closing bracket left to pair with; stop scanning.
            Some(i) => cursor + i,
            None => break,
        };
        if close < open {
            return Err(LabelError::TokenFormat(
                "invalid template: '>' found before '<'".into(),
            ));
        }

        let token = &template[open..=close];
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        cursor = close + 1;
    }

    Ok(tokens)
}
