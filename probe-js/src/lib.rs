//! Rewrites type-checking probes into code that reports their diagnostics at
//! run time.
//!
//! A probe is a call `tsst(() => { ... })` whose function body exercises some
//! types. After the checker has run, [`rewrite_file`] replaces each probe's body
//! with code that either returns an empty list (the body checked cleanly) or
//! throws the first of the diagnostics reported inside it. [`runtime`] then runs
//! rewritten probes and asserts on what they report.
//!
//! # Examples
//!
//! ```
//! use probe_js::ast::build::*;
//! use probe_js::loc::Loc;
//! use probe_js::{emit_top_level, rewrite_top_level, Diagnostic, FileId, MemoryDiagnostics, ProbeOptions};
//!
//! // tsst(()=>{let x: number = "a";})
//! let body = block_body(Loc(9, 31), Vec::new());
//! let probe = call(Loc(0, 32), id(Loc(0, 4), "tsst"), vec![arg(arrow_func(Loc(5, 31), Vec::new(), body))]);
//! let top = top_level(vec![expr_stmt(probe)]);
//!
//! let mut diagnostics = MemoryDiagnostics::new();
//! diagnostics.insert(FileId(0), vec![Diagnostic::new(14, 1, "Type 'string' is not assignable to type 'number'.")]);
//!
//! let rewritten = rewrite_top_level(FileId(0), top, &diagnostics, &ProbeOptions::default());
//! assert_eq!(
//!   emit_top_level(&rewritten).unwrap(),
//!   r#"tsst(()=>{Error.stackTraceLimit=0;throw[new Error("Type 'string' is not assignable to type 'number'.")][0];});"#,
//! );
//! ```

pub mod ast;
pub mod config;
pub mod correlate;
pub mod detect;
pub mod diagnostic;
pub mod emit;
pub mod loc;
pub mod operator;
pub mod rewrite;
pub mod runtime;
pub mod synthesize;

pub use config::ProbeOptions;
pub use detect::{find_probes, ProbeSite};
pub use diagnostic::{Diagnostic, DiagnosticSource, FileId, MemoryDiagnostics, SourceFile};
pub use emit::{emit_top_level, EmitError};
pub use rewrite::{rewrite_file, rewrite_top_level};
pub use runtime::{evaluate_probe, probe, ErrorReporting, ProbeOutcome, ProbeResult};
