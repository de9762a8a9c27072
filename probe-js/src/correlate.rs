use tracing::trace;

use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::diagnostic::Diagnostic;
use crate::loc::TextRange;

/// The byte span of a probe's body. Diagnostics are attributed to a probe only
/// if they lie wholly inside it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SourceRegion {
  start: u32,
  end: u32,
}

impl SourceRegion {
  /// An `end` before `start` is clamped to an empty region at `start`.
  pub fn new(start: u32, end: u32) -> Self {
    Self {
      start,
      end: end.max(start),
    }
  }

  /// The region of a function body. This is the body alone; the marker call's
  /// parentheses and the function's parameter list are outside it.
  pub fn of_body(body: &Node<FuncBody>) -> Self {
    let range = body.loc.as_range();
    Self::new(range.start, range.end)
  }

  pub fn start(&self) -> u32 {
    self.start
  }

  pub fn end(&self) -> u32 {
    self.end
  }

  pub fn as_range(&self) -> TextRange {
    TextRange::new(self.start, self.end)
  }

  pub fn contains(&self, range: TextRange) -> bool {
    self.as_range().contains_range(range)
  }
}

/// Selects the diagnostics that fall entirely within `region`, keeping the
/// order the checker reported them in.
///
/// Diagnostics straddling either boundary are not the probe's. Diagnostics
/// without a position are skipped.
pub fn diagnostics_in(region: SourceRegion, all: &[Diagnostic]) -> Vec<&Diagnostic> {
  all
    .iter()
    .filter(|diagnostic| match diagnostic.range() {
      Some(range) => region.contains(range),
      None => {
        trace!(
          start = ?diagnostic.start,
          length = ?diagnostic.length,
          "skipping diagnostic without a usable position"
        );
        false
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn messages<'a>(diagnostics: &[&'a Diagnostic]) -> Vec<&'a str> {
    diagnostics.iter().map(|d| d.message.head_text()).collect()
  }

  #[test]
  fn keeps_contained_diagnostics_in_source_order() {
    let region = SourceRegion::new(10, 50);
    let all = vec![
      Diagnostic::new(40, 2, "late"),
      Diagnostic::new(0, 5, "before"),
      Diagnostic::new(12, 3, "early"),
      Diagnostic::new(60, 1, "after"),
    ];
    assert_eq!(messages(&diagnostics_in(region, &all)), vec!["late", "early"]);
  }

  #[test]
  fn excludes_diagnostics_crossing_either_boundary() {
    let region = SourceRegion::new(10, 50);
    let all = vec![
      Diagnostic::new(49, 5, "crosses end"),
      Diagnostic::new(8, 4, "crosses start"),
      Diagnostic::new(10, 40, "exact"),
    ];
    assert_eq!(messages(&diagnostics_in(region, &all)), vec!["exact"]);
  }

  #[test]
  fn skips_diagnostics_without_position() {
    let region = SourceRegion::new(0, 100);
    let mut no_length = Diagnostic::new(5, 1, "no length");
    no_length.length = None;
    let all = vec![Diagnostic::unpositioned("global"), no_length, Diagnostic::new(5, 1, "ok")];
    assert_eq!(messages(&diagnostics_in(region, &all)), vec!["ok"]);
  }

  #[test]
  fn skips_diagnostics_whose_end_overflows() {
    let region = SourceRegion::new(0, u32::MAX);
    let all = vec![Diagnostic::new(u32::MAX - 1, 5, "overflow")];
    assert!(diagnostics_in(region, &all).is_empty());
  }

  #[test]
  fn inverted_region_is_empty() {
    let region = SourceRegion::new(30, 10);
    assert_eq!(region.as_range(), TextRange::new(30, 30));
    let all = vec![Diagnostic::new(15, 1, "inside the inverted span")];
    assert!(diagnostics_in(region, &all).is_empty());
  }
}
