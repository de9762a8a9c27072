//! Boundary-aware byte buffer writer.
//!
//! When callers emit token-like fragments (keywords, identifiers, numbers,
//! punctuation), the [`Emitter`] inserts the minimal whitespace required to
//! prevent the concatenation from being lexed as a different token (e.g.
//! `returnx`, `a++b`, `a--b`, `a//b`). Use the typed helpers so the emitter can
//! classify each fragment.
//!
//! The emitter also keeps `<!--` and `-->` from forming across fragments, since
//! either would start an HTML-like comment and hide the rest of the line.

use super::escape::emit_string_literal_double_quoted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
  None,
  Word,
  Plus,
  Minus,
  Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leading {
  Word,
  Plus,
  Minus,
  Slash,
  Star,
  Other,
}

/// How far the buffer's tail has progressed into `<!--` or `-->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HtmlComment {
  #[default]
  Other,
  Lt,
  LtBang,
  LtBangDash,
  Dash,
  DashDash,
}

#[derive(Debug, Clone, Default)]
pub struct Emitter {
  out: Vec<u8>,
  trailing: Option<Boundary>,
  html_comment: HtmlComment,
}

/// Advances the comment-opener state by one byte, flagging the byte that would
/// complete `<!--` or `-->`.
fn next_html_comment(state: HtmlComment, byte: u8) -> (HtmlComment, bool) {
  match (state, byte) {
    (HtmlComment::LtBangDash, b'-') => (HtmlComment::DashDash, true),
    (HtmlComment::DashDash, b'>') => (HtmlComment::Other, true),
    (HtmlComment::Lt, b'!') => (HtmlComment::LtBang, false),
    (HtmlComment::LtBang, b'-') => (HtmlComment::LtBangDash, false),
    (HtmlComment::Dash | HtmlComment::DashDash, b'-') => (HtmlComment::DashDash, false),
    (_, b'-') => (HtmlComment::Dash, false),
    (_, b'<') => (HtmlComment::Lt, false),
    _ => (HtmlComment::Other, false),
  }
}

fn advance_html_comment(mut state: HtmlComment, bytes: &[u8]) -> HtmlComment {
  for &byte in bytes {
    state = next_html_comment(state, byte).0;
  }
  state
}

fn would_open_html_comment(mut state: HtmlComment, bytes: &[u8]) -> bool {
  for &byte in bytes {
    let (next, hazard) = next_html_comment(state, byte);
    if hazard {
      return true;
    }
    state = next;
  }
  false
}

fn is_word_byte(byte: u8) -> bool {
  byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte >= 0x80
}

fn classify_leading(byte: u8) -> Leading {
  match byte {
    b'+' => Leading::Plus,
    b'-' => Leading::Minus,
    b'/' => Leading::Slash,
    b'*' => Leading::Star,
    b if is_word_byte(b) => Leading::Word,
    _ => Leading::Other,
  }
}

fn classify_trailing(byte: u8) -> Boundary {
  match byte {
    b'+' => Boundary::Plus,
    b'-' => Boundary::Minus,
    b'/' => Boundary::Slash,
    b if is_word_byte(b) => Boundary::Word,
    _ => Boundary::None,
  }
}

fn needs_space(trailing: Boundary, leading: Leading) -> bool {
  matches!(
    (trailing, leading),
    (Boundary::Word, Leading::Word)
      | (Boundary::Plus, Leading::Plus)
      | (Boundary::Minus, Leading::Minus)
      | (Boundary::Slash, Leading::Slash)
      | (Boundary::Slash, Leading::Star)
  )
}

impl Emitter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a read-only view of the buffer.
  pub fn as_bytes(&self) -> &[u8] {
    &self.out
  }

  /// Consumes the emitter, returning the underlying buffer.
  pub fn into_bytes(self) -> Vec<u8> {
    self.out
  }

  fn write_token(&mut self, text: &str) {
    let (Some(&first), Some(&last)) = (text.as_bytes().first(), text.as_bytes().last()) else {
      return;
    };
    let merges = self
      .trailing
      .is_some_and(|trailing| needs_space(trailing, classify_leading(first)));
    if merges || would_open_html_comment(self.html_comment, text.as_bytes()) {
      self.out.push(b' ');
      self.html_comment = HtmlComment::Other;
    }
    self.out.extend_from_slice(text.as_bytes());
    self.html_comment = advance_html_comment(self.html_comment, text.as_bytes());
    self.trailing = Some(classify_trailing(last));
  }

  pub fn write_keyword(&mut self, keyword: &str) {
    self.write_token(keyword);
  }

  pub fn write_identifier(&mut self, identifier: &str) {
    self.write_token(identifier);
  }

  pub fn write_number(&mut self, number: &str) {
    self.write_token(number);
  }

  /// Emits punctuation or operators.
  pub fn write_punct(&mut self, punct: &str) {
    self.write_token(punct);
  }

  /// Emits a double-quoted string literal.
  pub fn write_string_literal(&mut self, value: &str) {
    emit_string_literal_double_quoted(&mut self.out, value);
    self.html_comment = HtmlComment::Other;
    self.trailing = Some(Boundary::None);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn emitted(f: impl FnOnce(&mut Emitter)) -> String {
    let mut out = Emitter::new();
    f(&mut out);
    String::from_utf8(out.into_bytes()).unwrap()
  }

  #[test]
  fn separates_words() {
    assert_eq!(
      emitted(|out| {
        out.write_keyword("return");
        out.write_identifier("x");
        out.write_punct(";");
      }),
      "return x;"
    );
    assert_eq!(
      emitted(|out| {
        out.write_keyword("new");
        out.write_identifier("Error");
        out.write_punct("(");
        out.write_number("1");
        out.write_punct(")");
      }),
      "new Error(1)"
    );
  }

  #[test]
  fn separates_operators_that_would_merge() {
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("-");
        out.write_punct("-");
        out.write_identifier("b");
      }),
      "a- -b"
    );
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("+");
        out.write_punct("++");
        out.write_identifier("b");
      }),
      "a+ ++b"
    );
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("/");
        out.write_punct("/");
      }),
      "a/ /"
    );
  }

  #[test]
  fn breaks_html_comment_openers() {
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("<");
        out.write_punct("!");
        out.write_punct("--");
        out.write_identifier("b");
      }),
      "a<! --b"
    );
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("--");
        out.write_punct(">");
        out.write_identifier("b");
      }),
      "a-- >b"
    );
    assert_eq!(
      emitted(|out| {
        out.write_identifier("a");
        out.write_punct("<");
        out.write_punct("!");
        out.write_identifier("b");
        out.write_punct("-");
        out.write_punct(">");
      }),
      "a<!b->"
    );
  }

  #[test]
  fn punctuation_needs_no_space() {
    assert_eq!(
      emitted(|out| {
        out.write_keyword("throw");
        out.write_punct("[");
        out.write_punct("]");
        out.write_keyword("return");
        out.write_string_literal("s");
        out.write_keyword("in");
      }),
      "throw[]return\"s\"in"
    );
  }
}
