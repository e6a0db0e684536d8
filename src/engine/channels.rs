//! Channels between the fill engine and its host
//!
//! The engine never talks to a terminal directly. Interactive prompts go
//! through [`InputSource`], and errors and warnings go through [`Reporter`],
//! so the resolution logic can be driven by a scripted fake in tests.

/// The interactive input channel
///
/// `request_input` presents a prompt together with a pre-filled default and
/// returns whatever the user confirmed. Returning an empty string or the
/// literal `"0"` is interpreted by the engine as a cancellation of the whole
/// fill. The channel may be called any number of times within one fill.
pub trait InputSource {
    fn request_input(&mut self, prompt: &str, default_value: &str) -> String;
}

/// The error and info/warning channels
///
/// Errors cover malformed tokens and unreadable primary data; info messages
/// cover non-fatal domain warnings such as a lot expiration approaching.
pub trait Reporter {
    fn report_error(&mut self, message: &str);
    fn report_info(&mut self, message: &str);
}
