//! The type checker's side of the contract: semantic diagnostics for a file.
//!
//! Diagnostics arrive in the shape the host emits them (byte `start`, byte
//! `length`, and a message that is either a string or a chain of nested
//! messages), and can be deserialized directly from the host's JSON.

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::loc::TextRange;

/// A stable identifier for a file in a program.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// A type-checked file handed to the rewriter.
#[derive(Debug)]
pub struct SourceFile {
  pub id: FileId,
  pub name: String,
  pub top_level: Node<TopLevel>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
  Warning,
  #[default]
  Error,
  Suggestion,
  Message,
}

/// One link of a chained message. The head carries the summary; `next` holds
/// the elaborations the checker nested under it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessageChain {
  pub message_text: String,
  #[serde(default)]
  pub code: Option<u32>,
  #[serde(default)]
  pub category: DiagnosticCategory,
  #[serde(default)]
  pub next: Vec<DiagnosticMessageChain>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticMessage {
  Text(String),
  Chain(DiagnosticMessageChain),
}

impl DiagnosticMessage {
  /// The flat message, or the head of a chain.
  pub fn head_text(&self) -> &str {
    match self {
      DiagnosticMessage::Text(text) => text,
      DiagnosticMessage::Chain(chain) => &chain.message_text,
    }
  }
}

impl From<&str> for DiagnosticMessage {
  fn from(value: &str) -> Self {
    DiagnosticMessage::Text(value.to_string())
  }
}

impl From<DiagnosticMessageChain> for DiagnosticMessage {
  fn from(value: DiagnosticMessageChain) -> Self {
    DiagnosticMessage::Chain(value)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  // Global diagnostics (e.g. about compiler options) have no position.
  #[serde(default)]
  pub start: Option<u32>,
  #[serde(default)]
  pub length: Option<u32>,
  #[serde(rename = "messageText")]
  pub message: DiagnosticMessage,
  #[serde(default)]
  pub code: Option<u32>,
  #[serde(default)]
  pub category: DiagnosticCategory,
}

impl Diagnostic {
  pub fn new(start: u32, length: u32, message: impl Into<DiagnosticMessage>) -> Self {
    Self {
      start: Some(start),
      length: Some(length),
      message: message.into(),
      code: None,
      category: DiagnosticCategory::Error,
    }
  }

  /// A diagnostic without a position, as the checker reports for global issues.
  pub fn unpositioned(message: impl Into<DiagnosticMessage>) -> Self {
    Self {
      start: None,
      length: None,
      message: message.into(),
      code: None,
      category: DiagnosticCategory::Error,
    }
  }

  pub fn with_code(mut self, code: u32) -> Self {
    self.code = Some(code);
    self
  }

  /// The span `[start, start + length)`, if both ends are known and the end
  /// fits into a `u32`.
  pub fn range(&self) -> Option<TextRange> {
    TextRange::from_start_len(self.start?, self.length?)
  }
}

/// Supplies the semantic diagnostics the type checker produced for a file.
///
/// The rewriter asks once per marked body and does not cache the answer, so
/// implementations that are expensive to query should cache on their side.
pub trait DiagnosticSource {
  fn semantic_diagnostics(&self, file: FileId) -> Vec<Diagnostic>;
}

impl<F> DiagnosticSource for F
where
  F: Fn(FileId) -> Vec<Diagnostic>,
{
  fn semantic_diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
    self(file)
  }
}

/// Diagnostics that were computed ahead of time, e.g. by a separate checker
/// process that wrote them out as JSON.
#[derive(Clone, Debug, Default)]
pub struct MemoryDiagnostics {
  files: HashMap<FileId, Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, file: FileId, diagnostics: Vec<Diagnostic>) {
    self.files.insert(file, diagnostics);
  }

  /// Replaces the diagnostics of `file` with those in `json`, a JSON array of
  /// diagnostic objects.
  pub fn load_json(&mut self, file: FileId, json: &str) -> Result<(), serde_json::Error> {
    let diagnostics: Vec<Diagnostic> = serde_json::from_str(json)?;
    self.insert(file, diagnostics);
    Ok(())
  }

  pub fn from_json(file: FileId, json: &str) -> Result<Self, serde_json::Error> {
    let mut diagnostics = Self::new();
    diagnostics.load_json(file, json)?;
    Ok(diagnostics)
  }
}

impl DiagnosticSource for MemoryDiagnostics {
  fn semantic_diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
    self.files.get(&file).cloned().unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_flat_and_chained_messages() {
    let json = r#"[
      {"start": 10, "length": 3, "messageText": "Cannot find name 'foo'.", "code": 2304},
      {"start": 20, "length": 5, "messageText": {
        "messageText": "Type 'string' is not assignable to type 'number'.",
        "category": "error",
        "code": 2322,
        "next": [{"messageText": "nested detail"}]
      }},
      {"messageText": "Option 'x' is deprecated.", "category": "warning"}
    ]"#;
    let source = MemoryDiagnostics::from_json(FileId(3), json).unwrap();
    let diagnostics = source.semantic_diagnostics(FileId(3));
    assert_eq!(diagnostics.len(), 3);

    assert_eq!(diagnostics[0].range(), Some(TextRange::new(10, 13)));
    assert_eq!(diagnostics[0].code, Some(2304));
    assert_eq!(diagnostics[0].message.head_text(), "Cannot find name 'foo'.");

    assert_eq!(
      diagnostics[1].message.head_text(),
      "Type 'string' is not assignable to type 'number'."
    );
    let DiagnosticMessage::Chain(chain) = &diagnostics[1].message else {
      panic!("expected chained message");
    };
    assert_eq!(chain.next[0].message_text, "nested detail");

    assert_eq!(diagnostics[2].range(), None);
    assert_eq!(diagnostics[2].category, DiagnosticCategory::Warning);
  }

  #[test]
  fn unknown_file_has_no_diagnostics() {
    let source = MemoryDiagnostics::new();
    assert!(source.semantic_diagnostics(FileId(0)).is_empty());
  }

  #[test]
  fn closures_are_sources() {
    let source = |file: FileId| vec![Diagnostic::new(file.0, 1, "x")];
    assert_eq!(source.semantic_diagnostics(FileId(7))[0].start, Some(7));
  }

  #[test]
  fn range_requires_both_position_fields() {
    let mut diagnostic = Diagnostic::new(4, 2, "x");
    assert_eq!(diagnostic.range(), Some(TextRange::new(4, 6)));
    diagnostic.length = None;
    assert_eq!(diagnostic.range(), None);
  }
}
