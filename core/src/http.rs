//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `FeatureClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; a `Transport` moves bytes in
//! between. The response body stays raw bytes until `text()` decodes it with
//! the charset the server declared, so the parser never sees transport
//! concerns.

use encoding_rs::{DecoderResult, Encoding, UTF_8};

/// A read-only HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Constructed by a `Transport` after executing an `HttpRequest`, then passed
/// to `FeatureClient::parse_envelope`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `charset` parameter of the `content-type` header, if any.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.header("content-type")?;
        content_type.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"'))
        })
    }

    /// Decode the body with the declared charset, falling back to UTF-8.
    ///
    /// Byte sequences the encoding cannot decode are dropped; a U+FFFD that
    /// the body itself encodes is kept.
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let mut decoder = encoding.new_decoder_without_bom_handling();
        let mut text = String::with_capacity(
            decoder
                .max_utf8_buffer_length_without_replacement(self.body.len())
                .unwrap_or(self.body.len()),
        );
        let mut input = &self.body[..];
        loop {
            let (result, read) = decoder.decode_to_string_without_replacement(input, &mut text, true);
            input = &input[read..];
            match result {
                DecoderResult::InputEmpty => return text,
                // `read` already covers the malformed sequence.
                DecoderResult::Malformed(_, _) => {}
                DecoderResult::OutputFull => {
                    let needed = decoder
                        .max_utf8_buffer_length_without_replacement(input.len())
                        .unwrap_or(input.len());
                    text.reserve(needed.max(4));
                }
            }
        }
    }
}
