//! Tag scanner: turns a `<% %>` template into a script.
//!
//! The scanner is a single-pass, character-driven state machine. Literal text is
//! wrapped in "emit" statements built from the [`DelimiterConfig`], `<% code %>`
//! bodies are copied verbatim, and `<%= expr %>` bodies are wrapped in "emit
//! expression" statements.
//!
//! ## Output shape
//!
//! For `Hello <%= name %>!\n` with wrappers `os`/`oe`/`es`/`ee`:
//!
//! ```text
//! os Hello  oe es  name  ee os !\n oe os oe
//! ```
//!
//! Inside literal text `"` is written as `\"`, and a newline is written as `\n`
//! followed by a statement split (`oe` then `os`). Carriage returns are dropped
//! everywhere. Nothing inside a directive body is escaped.
//!
//! A character that turns out not to complete a pending `<` or `%` is handled
//! by the rule of the state it falls back to, so `<<%` opens a directive, `%%>`
//! closes one (leaving a single `%` in the body) and `<%%>` is an empty code block.
//!
//! ## End of input
//!
//! An open literal statement is closed. A trailing `<` that never became a
//! directive is kept as literal text. Input that ends inside a directive fails
//! with [`ScriptletError::MalformedTemplate`]; no partial script is returned.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use crate::delimiters::DelimiterConfig;
use crate::error::{Malformation, Result, ScriptletError};
use crate::source::CharSource;

/// Scanner state. Exactly one is active at any point during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing written yet; the first character of the document is pending.
    Start,
    /// Inside literal text; an emit statement is open.
    Literal,
    /// Inside a `<% ... %>` body.
    Code,
    /// Inside a `<%= ... %>` body.
    Expr,
    /// Saw `<` inside literal text.
    TagOpenPending,
    /// Saw `<` as the first character of the document (no emit statement open).
    InitialTagOpenPending,
    /// Saw `%` inside a code body.
    CodeClosePending,
    /// Saw `<%`; the next character decides code vs expression.
    CodeOrExprOpenPending,
    /// Saw `%` inside an expression body.
    ExprClosePending,
    /// No transition applies. Absorbing.
    Invalid,
}

/// Template-to-script transpiler with a fixed delimiter configuration.
///
/// Cheap to clone and safe to share between threads; every call to
/// [`transpile`](Self::transpile) is an independent scan with its own buffer.
#[derive(Debug, Clone)]
pub struct Scanner {
    delimiters: Arc<DelimiterConfig>,
}

impl Scanner {
    pub fn new(delimiters: DelimiterConfig) -> Self {
        Self {
            delimiters: Arc::new(delimiters),
        }
    }

    pub fn delimiters(&self) -> &DelimiterConfig {
        &self.delimiters
    }

    /// Transpile a template read from `reader`.
    ///
    /// Read failures (including invalid UTF-8) abort the scan with
    /// [`ScriptletError::InputRead`]; they are never treated as end of input.
    pub fn transpile<R: Read>(&self, reader: R) -> Result<String> {
        self.drive(ScanState::Start, CharSource::new(reader))
    }

    /// Transpile an in-memory template.
    pub fn transpile_str(&self, input: &str) -> Result<String> {
        self.drive(ScanState::Start, input.chars().map(Ok))
    }

    /// Transpile on the blocking thread pool, giving up after `limit`.
    ///
    /// On timeout the scan keeps running to completion in the background and its
    /// result is discarded.
    pub async fn transpile_with_timeout(&self, input: Vec<u8>, limit: Duration) -> Result<String> {
        let scanner = self.clone();
        let task = tokio::task::spawn_blocking(move || scanner.transpile(input.as_slice()));

        match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined.map_err(anyhow::Error::from)?,
            Err(_) => Err(ScriptletError::ScanTimeout(limit)),
        }
    }

    /// Apply one transition: append whatever `c` produces in `state` to `out`
    /// and return the next state.
    pub fn step(&self, state: ScanState, c: char, out: &mut String) -> ScanState {
        let d = &*self.delimiters;

        match state {
            ScanState::Start => match c {
                '<' => ScanState::InitialTagOpenPending,
                _ => {
                    out.push_str(&d.output_start);
                    self.step(ScanState::Literal, c, out)
                }
            },
            ScanState::Literal => match c {
                '<' => ScanState::TagOpenPending,
                '\n' => {
                    out.push_str("\\n");
                    out.push_str(&d.output_end);
                    out.push_str(&d.output_start);
                    ScanState::Literal
                }
                '"' => {
                    out.push_str("\\\"");
                    ScanState::Literal
                }
                _ => {
                    out.push(c);
                    ScanState::Literal
                }
            },
            ScanState::TagOpenPending | ScanState::InitialTagOpenPending => match c {
                '%' => {
                    if state == ScanState::TagOpenPending {
                        out.push_str(&d.output_end);
                    }
                    ScanState::CodeOrExprOpenPending
                }
                _ => {
                    if state == ScanState::InitialTagOpenPending {
                        out.push_str(&d.output_start);
                    }
                    out.push('<');
                    // Not a directive: `c` is ordinary literal text and gets the
                    // same escaping (and may itself start a tag).
                    self.step(ScanState::Literal, c, out)
                }
            },
            ScanState::CodeOrExprOpenPending => match c {
                '=' => {
                    out.push_str(&d.expr_start);
                    ScanState::Expr
                }
                // First body character; a `%` here may already close `<%%>`.
                _ => self.step(ScanState::Code, c, out),
            },
            ScanState::Code => match c {
                '%' => ScanState::CodeClosePending,
                _ => {
                    out.push(c);
                    ScanState::Code
                }
            },
            ScanState::CodeClosePending => match c {
                '>' => {
                    out.push_str(&d.output_start);
                    ScanState::Literal
                }
                _ => {
                    out.push('%');
                    self.step(ScanState::Code, c, out)
                }
            },
            ScanState::Expr => match c {
                '%' => ScanState::ExprClosePending,
                _ => {
                    out.push(c);
                    ScanState::Expr
                }
            },
            ScanState::ExprClosePending => match c {
                '>' => {
                    out.push_str(&d.expr_end);
                    out.push_str(&d.output_start);
                    ScanState::Literal
                }
                _ => {
                    out.push('%');
                    self.step(ScanState::Expr, c, out)
                }
            },
            ScanState::Invalid => ScanState::Invalid,
        }
    }

    fn drive<I>(&self, mut state: ScanState, chars: I) -> Result<String>
    where
        I: IntoIterator<Item = io::Result<char>>,
    {
        let mut out = String::new();
        let mut pos = Position::default();
        // Position of the most recent `<` seen in literal context.
        let mut tag_at = pos;
        let mut consumed = 0usize;

        for c in chars {
            let c = c.map_err(ScriptletError::InputRead)?;
            if c == '\r' {
                continue;
            }

            if state == ScanState::Invalid {
                return Err(pos.malformed(Malformation::NoTransition));
            }

            let next = self.step(state, c, &mut out);
            match next {
                ScanState::TagOpenPending | ScanState::InitialTagOpenPending => tag_at = pos,
                ScanState::CodeOrExprOpenPending => {
                    tracing::trace!(line = pos.line, column = pos.column, "directive opened");
                }
                _ => {}
            }

            state = next;
            pos.advance(c);
            consumed += 1;
        }

        let d = &*self.delimiters;
        match state {
            ScanState::Start => {
                out.push_str(&d.output_start);
                out.push_str(&d.output_end);
            }
            ScanState::Literal => out.push_str(&d.output_end),
            ScanState::TagOpenPending => {
                out.push('<');
                out.push_str(&d.output_end);
            }
            ScanState::InitialTagOpenPending => {
                out.push_str(&d.output_start);
                out.push('<');
                out.push_str(&d.output_end);
            }
            ScanState::CodeOrExprOpenPending | ScanState::Code | ScanState::CodeClosePending => {
                return Err(tag_at.malformed(Malformation::UnterminatedCode));
            }
            ScanState::Expr | ScanState::ExprClosePending => {
                return Err(tag_at.malformed(Malformation::UnterminatedExpression));
            }
            ScanState::Invalid => return Err(pos.malformed(Malformation::NoTransition)),
        }

        tracing::debug!(chars = consumed, script_len = out.len(), "transpiled template");
        Ok(out)
    }
}

/// 1-based line/column of a character, counted after carriage returns are dropped.
#[derive(Debug, Clone, Copy)]
struct Position {
    line: usize,
    column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Position {
    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn malformed(self, reason: Malformation) -> ScriptletError {
        ScriptletError::MalformedTemplate {
            reason,
            line: self.line,
            column: self.column,
        }
    }
}
