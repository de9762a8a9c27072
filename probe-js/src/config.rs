use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MARKER: &str = "tsst";

/// Decides, by file name, whether a file takes part in rewriting.
pub type FileFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct ProbeOptions {
  /// Callee name that marks a probe, compared exactly and case-sensitively.
  pub marker: String,
  /// When absent, every file is rewritten.
  pub file_filter: Option<FileFilter>,
}

impl Default for ProbeOptions {
  fn default() -> Self {
    Self {
      marker: DEFAULT_MARKER.to_string(),
      file_filter: None,
    }
  }
}

impl ProbeOptions {
  pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
    self.marker = marker.into();
    self
  }

  pub fn with_file_filter(mut self, filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
    self.file_filter = Some(Arc::new(filter));
    self
  }

  pub fn accepts_file(&self, file_name: &str) -> bool {
    self
      .file_filter
      .as_ref()
      .map_or(true, |filter| filter(file_name))
  }
}

impl fmt::Debug for ProbeOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProbeOptions")
      .field("marker", &self.marker)
      .field("file_filter", &self.file_filter.as_ref().map(|_| ".."))
      .finish()
  }
}
