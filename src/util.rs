//! Byte decoding and small string helpers.

use std::borrow::Cow;

use memchr::memmem;

/// How far into the document to look for a `<meta charset>` declaration.
const SNIFF_LIMIT: usize = 1024;

/// Decode markup bytes to a string.
///
/// 1. A byte-order mark wins (UTF-8, UTF-16LE/BE)
/// 2. Valid UTF-8 is taken as-is
/// 3. Otherwise the `<meta charset>` label from the document head, if any
/// 4. Windows-1252 as the last resort (superset of ISO-8859-1)
///
/// Returns `Cow::Borrowed` when the input is valid UTF-8 without a BOM.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return result;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    if let Some(label) = sniff_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        tracing::debug!(encoding = encoding.name(), "decoding with declared charset");
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find the charset label of a `<meta charset=...>` or
/// `<meta http-equiv content="...; charset=...">` declaration.
fn sniff_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let head = head.to_ascii_lowercase();

    let mut offset = 0;
    while let Some(pos) = memmem::find(&head[offset..], b"charset") {
        let start = offset + pos + b"charset".len();
        offset = start;

        let rest = &head[start..];
        let rest = trim_ascii_start(rest);
        let Some(rest) = rest.strip_prefix(b"=") else {
            continue;
        };
        let rest = trim_ascii_start(rest);
        let rest = rest
            .strip_prefix(b"\"")
            .or_else(|| rest.strip_prefix(b"'"))
            .unwrap_or(rest);

        let end = rest
            .iter()
            .position(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')))
            .unwrap_or(rest.len());
        if end > 0 {
            return Some(String::from_utf8_lossy(&rest[..end]).into_owned());
        }
    }
    None
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
///
/// Whitespace runs are collapsed so multi-line markup stays on one line in
/// error messages.
pub fn excerpt(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        let needed = if pending_space { 2 } else { 1 };
        if count + needed > max {
            out.push('…');
            return out;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
        count += needed;
    }
    out
}
