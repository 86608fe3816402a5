/// Characters that copy/paste from chat apps and web pages inject into
/// armored blocks: ZWSP, ZWNJ, ZWJ and BOM/ZWNBSP.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Normalize pasted key text before it reaches the provider.
///
/// Trims surrounding whitespace, turns CRLF into LF and strips zero-width
/// characters. Line endings are normalized in the same pass as the strip,
/// scanning backwards so that a `\r` counts as part of a line break whenever
/// the next surviving character is `\n` (`\r\u{200B}\n` and `\r\r\n` both
/// collapse to `\n`). The result is trimmed once more because stripping can
/// uncover whitespace at the edges; together this makes the function
/// idempotent.
///
/// Only for key material. Message bodies are passed through untouched.
pub fn sanitize(raw: &str) -> String {
    let mut kept: Vec<char> = Vec::with_capacity(raw.len());
    let mut next_is_newline = false;

    for c in raw.trim().chars().rev() {
        if ZERO_WIDTH.contains(&c) || (c == '\r' && next_is_newline) {
            continue;
        }
        next_is_newline = c == '\n';
        kept.push(c);
    }

    kept.iter().rev().collect::<String>().trim().to_string()
}
