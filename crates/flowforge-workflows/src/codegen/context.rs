// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Emission context for code generation.

use crate::compile::CompilerOptions;

/// Context shared by all emitters during one compilation.
pub struct EmitContext<'a> {
    /// Compilation options in effect.
    pub options: &'a CompilerOptions,
}

impl<'a> EmitContext<'a> {
    /// Create a context for the given options.
    pub fn new(options: &'a CompilerOptions) -> Self {
        Self { options }
    }

    /// Sanitize a string to a valid identifier in generated code.
    /// Invalid characters become underscores; a leading digit is prefixed.
    pub fn sanitize_ident(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            if c.is_ascii_alphanumeric() || c == '_' {
                if i == 0 && c.is_ascii_digit() {
                    result.push('_');
                }
                result.push(c);
            } else {
                result.push('_');
            }
        }
        if result.is_empty() {
            result.push_str("_empty");
        }
        result
    }

    /// The generated function name for a node (`execute_<id>`).
    pub fn node_fn(node_id: &str) -> String {
        format!("execute_{}", Self::sanitize_ident(node_id))
    }

    /// The generated trigger handler name for a node (`run_<id>`).
    pub fn trigger_handler(node_id: &str) -> String {
        format!("run_{}", Self::sanitize_ident(node_id))
    }

    /// The display name of the project being compiled.
    pub fn project_name(&self) -> &str {
        self.options.project_name.as_deref().unwrap_or("Workflow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ident_passthrough() {
        assert_eq!(EmitContext::sanitize_ident("node_1"), "node_1");
    }

    #[test]
    fn test_sanitize_ident_replaces_invalid() {
        assert_eq!(EmitContext::sanitize_ident("fetch-orders"), "fetch_orders");
        assert_eq!(EmitContext::sanitize_ident("a.b c"), "a_b_c");
    }

    #[test]
    fn test_sanitize_ident_leading_digit() {
        assert_eq!(EmitContext::sanitize_ident("1st"), "_1st");
    }

    #[test]
    fn test_sanitize_ident_empty() {
        assert_eq!(EmitContext::sanitize_ident(""), "_empty");
    }

    #[test]
    fn test_node_fn_name() {
        assert_eq!(EmitContext::node_fn("t-1"), "execute_t_1");
    }

    #[test]
    fn test_trigger_handler_name() {
        assert_eq!(EmitContext::trigger_handler("t1"), "run_t1");
    }
}
