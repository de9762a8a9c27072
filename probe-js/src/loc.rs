use std::cmp::{max, min};
use std::ops::{Add, AddAssign};

/// A half-open byte range within a single file.
///
/// Offsets are **UTF-8 byte offsets**, the same unit the host type checker
/// uses for diagnostic `start`/`length` pairs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  /// Builds a range from a diagnostic-style `start`/`length` pair. Returns
  /// `None` if the end would not fit into a `u32`.
  pub fn from_start_len(start: u32, length: u32) -> Option<Self> {
    let end = start.checked_add(length)?;
    Some(Self { start, end })
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  /// Whether `other` lies entirely within this range. Ranges sharing an
  /// endpoint still count as contained.
  pub fn contains_range(&self, other: TextRange) -> bool {
    other.start >= self.start && other.end <= self.end
  }
}

impl From<Loc> for TextRange {
  /// Converts a `Loc` into a `TextRange`, clamping to `u32::MAX` on overflow.
  fn from(value: Loc) -> Self {
    TextRange {
      start: clamp_to_u32(value.0),
      end: clamp_to_u32(value.1),
    }
  }
}

impl From<TextRange> for Loc {
  fn from(range: TextRange) -> Self {
    Loc(range.start as usize, range.end as usize)
  }
}

/// A location within the current source file expressed as UTF-8 byte offsets.
///
/// Synthesized nodes reuse the location of whatever they replace, so a `Loc`
/// is not a guarantee that the node's text exists at that span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn start_u32(&self) -> u32 {
    clamp_to_u32(self.0)
  }

  pub fn end_u32(&self) -> u32 {
    clamp_to_u32(self.1)
  }

  pub fn as_range(&self) -> TextRange {
    (*self).into()
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

fn clamp_to_u32(value: usize) -> u32 {
  u32::try_from(value).unwrap_or(u32::MAX)
}
