/// Emit a JavaScript/TypeScript string literal delimited by double quotes,
/// escaping characters that would otherwise terminate or change the meaning of
/// the literal. Non-ASCII characters are preserved as UTF-8 except for the
/// Unicode line separators U+2028/U+2029, which are always escaped.
pub fn emit_string_literal_double_quoted(out: &mut Vec<u8>, value: &str) {
  out.push(b'"');

  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.extend_from_slice(b"\\\\"),
      '"' => out.extend_from_slice(b"\\\""),
      '\n' => out.extend_from_slice(b"\\n"),
      '\r' => out.extend_from_slice(b"\\r"),
      '\t' => out.extend_from_slice(b"\\t"),
      '\0' => {
        // `\0` followed by a digit would read as a legacy octal escape.
        let next_is_digit = chars.peek().is_some_and(|c| c.is_ascii_digit());
        if next_is_digit {
          out.extend_from_slice(b"\\x00");
        } else {
          out.extend_from_slice(b"\\0");
        }
      }
      '\u{2028}' => out.extend_from_slice(b"\\u2028"),
      '\u{2029}' => out.extend_from_slice(b"\\u2029"),
      ch if ch < '\u{20}' => {
        out.extend_from_slice(format!("\\x{:02X}", ch as u32).as_bytes());
      }
      ch => {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
      }
    }
  }

  out.push(b'"');
}
