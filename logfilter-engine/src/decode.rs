//! Converts a record's raw bytes into text for the filter chain and the
//! writer, honoring the configured `encoding_errors` policy. Storage/output
//! always keeps the original bytes; only this boundary decides how invalid
//! UTF-8 is rendered.

use std::borrow::Cow;

use logfilter_core::config::EncodingErrors;

/// `Err` only under `EncodingErrors::Strict` when `bytes` is not valid
/// UTF-8; the caller treats that as a per-record error.
pub fn decode<'a>(bytes: &'a [u8], policy: EncodingErrors) -> Result<Cow<'a, str>, std::str::Utf8Error> {
    match policy {
        EncodingErrors::Replace => Ok(String::from_utf8_lossy(bytes)),
        EncodingErrors::Strict => std::str::from_utf8(bytes).map(Cow::Borrowed),
        EncodingErrors::Ignore => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(Cow::Borrowed(s)),
            Err(_) => Ok(Cow::Owned(decode_dropping_invalid(bytes))),
        },
    }
}

/// Decodes `bytes` as UTF-8, keeping every valid run intact and dropping
/// only the byte(s) that actually break decoding, rather than discarding
/// all non-ASCII content the moment any byte is invalid.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut remaining = bytes;
    loop {
        match std::str::from_utf8(remaining) {
            Ok(s) => {
                out.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                out.push_str(std::str::from_utf8(&remaining[..valid_up_to]).unwrap());
                let invalid_len = e.error_len().unwrap_or(remaining.len() - valid_up_to);
                remaining = &remaining[valid_up_to + invalid_len.max(1)..];
                if remaining.is_empty() {
                    break;
                }
            }
        }
    }
    out
}
