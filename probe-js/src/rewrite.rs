//! The probe-rewriting pass.
//!
//! One bottom-up traversal per file: a node's children are rewritten before
//! the node itself is inspected, so each node is visited exactly once. Every
//! node kind is matched explicitly; nothing outside a marked function's body
//! changes.

use tracing::{debug, debug_span};

use crate::ast::expr::*;
use crate::ast::func::{Func, FuncBody};
use crate::ast::node::Node;
use crate::ast::pat::ParamDecl;
use crate::ast::stmt::*;
use crate::ast::stx::TopLevel;
use crate::config::ProbeOptions;
use crate::correlate::{diagnostics_in, SourceRegion};
use crate::detect::probe_func_mut;
use crate::diagnostic::{DiagnosticSource, FileId, SourceFile};
use crate::synthesize::synthesize;

struct ProbeRewriter<'a> {
  file: FileId,
  options: &'a ProbeOptions,
  source: &'a dyn DiagnosticSource,
  probes: usize,
  failing: usize,
}

impl ProbeRewriter<'_> {
  fn stmts(&mut self, stmts: Vec<Node<Stmt>>) -> Vec<Node<Stmt>> {
    stmts.into_iter().map(|stmt| self.stmt(stmt)).collect()
  }

  fn stmt(&mut self, stmt: Node<Stmt>) -> Node<Stmt> {
    stmt.map_stx(|stx| match stx {
      Stmt::Block(block) => Stmt::Block(self.block(block)),
      leaf @ (Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_)) => leaf,
      Stmt::DoWhile(n) => Stmt::DoWhile(n.map_stx(|s| DoWhileStmt {
        body: self.stmt(s.body),
        condition: self.expr(s.condition),
      })),
      Stmt::Expr(n) => Stmt::Expr(n.map_stx(|s| ExprStmt {
        expr: self.expr(s.expr),
      })),
      Stmt::If(n) => Stmt::If(n.map_stx(|s| IfStmt {
        test: self.expr(s.test),
        consequent: self.stmt(s.consequent),
        alternate: s.alternate.map(|alt| self.stmt(alt)),
      })),
      Stmt::Return(n) => Stmt::Return(n.map_stx(|s| ReturnStmt {
        value: s.value.map(|value| self.expr(value)),
      })),
      Stmt::Throw(n) => Stmt::Throw(n.map_stx(|s| ThrowStmt {
        value: self.expr(s.value),
      })),
      Stmt::Try(n) => Stmt::Try(n.map_stx(|s| TryStmt {
        wrapped: self.block(s.wrapped),
        catch: s.catch.map(|catch| {
          catch.map_stx(|c| CatchBlock {
            parameter: c.parameter,
            body: self.stmts(c.body),
          })
        }),
        finally: s.finally.map(|finally| self.block(finally)),
      })),
      Stmt::While(n) => Stmt::While(n.map_stx(|s| WhileStmt {
        condition: self.expr(s.condition),
        body: self.stmt(s.body),
      })),
      Stmt::FunctionDecl(n) => Stmt::FunctionDecl(n.map_stx(|s| FuncDecl {
        export: s.export,
        name: s.name,
        func: self.func(s.func),
      })),
      Stmt::VarDecl(n) => Stmt::VarDecl(n.map_stx(|s| VarDecl {
        export: s.export,
        mode: s.mode,
        declarators: s
          .declarators
          .into_iter()
          .map(|d| VarDeclarator {
            pattern: d.pattern,
            type_annotation: d.type_annotation,
            initializer: d.initializer.map(|init| self.expr(init)),
          })
          .collect(),
      })),
    })
  }

  fn block(&mut self, block: Node<BlockStmt>) -> Node<BlockStmt> {
    block.map_stx(|b| BlockStmt {
      body: self.stmts(b.body),
    })
  }

  fn func(&mut self, func: Node<Func>) -> Node<Func> {
    func.map_stx(|f| Func {
      arrow: f.arrow,
      async_: f.async_,
      generator: f.generator,
      parameters: f.parameters.into_iter().map(|p| self.param(p)).collect(),
      return_type: f.return_type,
      body: f.body.map_stx(|body| match body {
        FuncBody::Block(stmts) => FuncBody::Block(self.stmts(stmts)),
        FuncBody::Expression(expr) => FuncBody::Expression(self.expr(expr)),
      }),
    })
  }

  fn param(&mut self, param: Node<ParamDecl>) -> Node<ParamDecl> {
    param.map_stx(|p| ParamDecl {
      rest: p.rest,
      pattern: p.pattern,
      type_annotation: p.type_annotation,
      default_value: p.default_value.map(|value| self.expr(value)),
    })
  }

  fn expr(&mut self, expr: Node<Expr>) -> Node<Expr> {
    expr.map_stx(|stx| match stx {
      Expr::ArrowFunc(n) => Expr::ArrowFunc(n.map_stx(|e| ArrowFuncExpr {
        func: self.func(e.func),
      })),
      Expr::Binary(n) => Expr::Binary(n.map_stx(|e| BinaryExpr {
        operator: e.operator,
        left: self.expr(e.left),
        right: self.expr(e.right),
      })),
      Expr::Call(n) => Expr::Call(self.call(n)),
      Expr::ComputedMember(n) => Expr::ComputedMember(n.map_stx(|e| ComputedMemberExpr {
        optional_chaining: e.optional_chaining,
        object: self.expr(e.object),
        member: self.expr(e.member),
      })),
      Expr::Cond(n) => Expr::Cond(n.map_stx(|e| CondExpr {
        test: self.expr(e.test),
        consequent: self.expr(e.consequent),
        alternate: self.expr(e.alternate),
      })),
      Expr::Func(n) => Expr::Func(n.map_stx(|e| FuncExpr {
        name: e.name,
        func: self.func(e.func),
      })),
      Expr::Member(n) => Expr::Member(n.map_stx(|e| MemberExpr {
        optional_chaining: e.optional_chaining,
        left: self.expr(e.left),
        right: e.right,
      })),
      Expr::Unary(n) => Expr::Unary(n.map_stx(|e| UnaryExpr {
        operator: e.operator,
        argument: self.expr(e.argument),
      })),
      Expr::UnaryPostfix(n) => Expr::UnaryPostfix(n.map_stx(|e| UnaryPostfixExpr {
        operator: e.operator,
        argument: self.expr(e.argument),
      })),
      Expr::LitArr(n) => Expr::LitArr(n.map_stx(|e| LitArrExpr {
        elements: e
          .elements
          .into_iter()
          .map(|elem| match elem {
            LitArrElem::Single(value) => LitArrElem::Single(self.expr(value)),
            LitArrElem::Rest(value) => LitArrElem::Rest(self.expr(value)),
            LitArrElem::Empty => LitArrElem::Empty,
          })
          .collect(),
      })),
      leaf @ (Expr::Id(_)
      | Expr::This(_)
      | Expr::LitBool(_)
      | Expr::LitNull(_)
      | Expr::LitNum(_)
      | Expr::LitStr(_)) => leaf,
    })
  }

  fn call(&mut self, call: Node<CallExpr>) -> Node<CallExpr> {
    let mut call = call.map_stx(|c| CallExpr {
      optional_chaining: c.optional_chaining,
      callee: self.expr(c.callee),
      arguments: c
        .arguments
        .into_iter()
        .map(|arg| {
          arg.map_stx(|a| CallArg {
            spread: a.spread,
            value: self.expr(a.value),
          })
        })
        .collect(),
    });
    if let Some(func) = probe_func_mut(&mut call.stx, &self.options.marker) {
      self.rewrite_probe(func);
    }
    call
  }

  fn rewrite_probe(&mut self, func: &mut Node<Func>) {
    let region = SourceRegion::of_body(&func.stx.body);
    let all = self.source.semantic_diagnostics(self.file);
    let contained = diagnostics_in(region, &all);
    let body = synthesize(&contained);
    debug!(
      start = region.start(),
      end = region.end(),
      diagnostics = body.errors().len(),
      "rewrote probe"
    );
    self.probes += 1;
    if body.is_failing() {
      self.failing += 1;
    }
    let loc = func.stx.body.loc;
    func.stx.body = body.into_func_body(loc);
  }
}

/// Rewrites every probe in `top`, a tree from `file`.
pub fn rewrite_top_level(
  file: FileId,
  top: Node<TopLevel>,
  source: &dyn DiagnosticSource,
  options: &ProbeOptions,
) -> Node<TopLevel> {
  let mut rewriter = ProbeRewriter {
    file,
    options,
    source,
    probes: 0,
    failing: 0,
  };
  let top = top.map_stx(|t| TopLevel {
    body: rewriter.stmts(t.body),
  });
  debug!(
    probes = rewriter.probes,
    failing = rewriter.failing,
    "rewrote file"
  );
  top
}

/// Rewrites every probe in `file`, unless the options' file filter rejects it,
/// in which case the file comes back untouched and no diagnostics are fetched.
pub fn rewrite_file(file: SourceFile, source: &dyn DiagnosticSource, options: &ProbeOptions) -> SourceFile {
  let span = debug_span!("probe_rewrite", file = %file.name, id = file.id.0);
  let _guard = span.enter();
  if !options.accepts_file(&file.name) {
    debug!("skipped by file filter");
    return file;
  }
  let SourceFile { id, name, top_level } = file;
  let top_level = rewrite_top_level(id, top_level, source, options);
  SourceFile { id, name, top_level }
}
