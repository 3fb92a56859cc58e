// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Composable builder for generated code units.
//!
//! A [`CodeUnit`] is an ordered list of statements, each either literal text
//! or a named injection slot. Emitters stay pure: they append statements,
//! and rendering resolves slots against a set of fills. An unfilled slot
//! renders as its fixed marker comment, which keeps the textual
//! [`inject`](crate::inject::inject) fallback applicable to rendered output.

use std::collections::HashMap;

use crate::inject::InjectionKind;

/// One statement of a generated unit.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Literal source text (one line, without trailing newline).
    Literal(String),
    /// A named injection slot, with the indentation to apply to its snippet.
    Slot(InjectionKind, String),
}

/// Snippets to splice into slots at render time.
pub type SlotFills = HashMap<InjectionKind, String>;

/// An ordered, slot-aware unit of generated source code.
#[derive(Debug, Clone, Default)]
pub struct CodeUnit {
    stmts: Vec<Stmt>,
}

impl CodeUnit {
    /// An empty unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of literal text.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.stmts.push(Stmt::Literal(text.into()));
        self
    }

    /// Append a blank line.
    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Append a multi-line block of literal text, splitting on newlines.
    pub fn block(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.line(line);
        }
        self
    }

    /// Append an injection slot indented by `indent`.
    pub fn slot(&mut self, kind: InjectionKind, indent: &str) -> &mut Self {
        self.stmts.push(Stmt::Slot(kind, indent.to_string()));
        self
    }

    /// Whether the unit contains a slot of the given kind.
    pub fn has_slot(&self, kind: InjectionKind) -> bool {
        self.stmts
            .iter()
            .any(|s| matches!(s, Stmt::Slot(k, _) if *k == kind))
    }

    /// Render the unit, splicing `fills` into their slots.
    ///
    /// Slots without a fill render as their marker comment. Multi-line
    /// snippets are re-indented to the slot's indentation.
    pub fn render(&self, fills: &SlotFills) -> String {
        let mut out = String::new();
        for stmt in &self.stmts {
            match stmt {
                Stmt::Literal(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                Stmt::Slot(kind, indent) => match fills.get(kind) {
                    Some(snippet) => {
                        for line in snippet.lines() {
                            out.push_str(indent);
                            out.push_str(line.trim_start());
                            out.push('\n');
                        }
                    }
                    None => {
                        out.push_str(indent);
                        out.push_str(kind.marker());
                        out.push('\n');
                    }
                },
            }
        }
        out
    }
}

/// Escape a string for embedding inside single quotes in generated code.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
