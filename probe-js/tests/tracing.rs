mod common;

use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use common::probe_stmt;
use probe_js::ast::build::top_level;
use probe_js::loc::Loc;
use probe_js::{rewrite_file, Diagnostic, FileId, MemoryDiagnostics, ProbeOptions, SourceFile};

#[derive(Clone, Default)]
struct SharedWriter {
  buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedWriter {
  fn into_inner(self) -> Vec<u8> {
    match Arc::try_unwrap(self.buffer) {
      Ok(buffer) => buffer.into_inner().unwrap(),
      Err(arc) => arc.lock().unwrap().clone(),
    }
  }
}

struct SharedWriterGuard<'a> {
  buffer: &'a Arc<Mutex<Vec<u8>>>,
}

impl<'a> io::Write for SharedWriterGuard<'a> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.buffer.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for SharedWriter {
  type Writer = SharedWriterGuard<'a>;

  fn make_writer(&'a self) -> Self::Writer {
    SharedWriterGuard {
      buffer: &self.buffer,
    }
  }
}

fn capture(level: tracing::Level, f: impl FnOnce()) -> String {
  let writer = SharedWriter::default();
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(level)
    .with_ansi(false)
    .with_writer(writer.clone())
    .finish();
  let guard = tracing::subscriber::set_default(subscriber);
  f();
  drop(guard);
  String::from_utf8(writer.into_inner()).unwrap()
}

fn file(name: &str) -> SourceFile {
  SourceFile {
    id: FileId(7),
    name: name.to_string(),
    top_level: top_level(vec![
      probe_stmt("tsst", Loc(0, 20), Loc(10, 19)),
      probe_stmt("tsst", Loc(20, 40), Loc(30, 39)),
    ]),
  }
}

fn diagnostics() -> MemoryDiagnostics {
  let mut source = MemoryDiagnostics::new();
  source.insert(FileId(7), vec![
    Diagnostic::new(12, 2, "fails"),
    Diagnostic::unpositioned("no position"),
  ]);
  source
}

#[test]
fn rewrite_logs_each_probe_within_a_file_span() {
  let output = capture(tracing::Level::DEBUG, || {
    rewrite_file(file("probes.test.ts"), &diagnostics(), &ProbeOptions::default());
  });
  assert!(
    output.contains("probe_rewrite"),
    "expected probe_rewrite span in output, got: {output}"
  );
  assert!(output.contains("probes.test.ts"), "expected file name, got: {output}");
  assert_eq!(output.matches("rewrote probe").count(), 2, "got: {output}");
  assert!(output.contains("probes=2"), "got: {output}");
  assert!(output.contains("failing=1"), "got: {output}");
  assert!(!output.contains("without a usable position"));
}

#[test]
fn skipped_diagnostics_are_traced() {
  let output = capture(tracing::Level::TRACE, || {
    rewrite_file(file("probes.test.ts"), &diagnostics(), &ProbeOptions::default());
  });
  assert_eq!(
    output.matches("skipping diagnostic without a usable position").count(),
    2,
    "got: {output}"
  );
}

#[test]
fn filtered_files_are_logged() {
  let options = ProbeOptions::default().with_file_filter(|name| name.ends_with(".test.ts"));
  let output = capture(tracing::Level::DEBUG, || {
    rewrite_file(file("src/main.ts"), &diagnostics(), &options);
  });
  assert!(output.contains("skipped by file filter"), "got: {output}");
  assert!(!output.contains("rewrote probe"));
}
