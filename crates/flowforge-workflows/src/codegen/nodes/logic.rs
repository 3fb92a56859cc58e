// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Condition and transform node emitters.

use flowforge_dsl::Node;

use super::super::builder::{CodeUnit, js_string};
use super::super::context::EmitContext;
use super::{close_function, open_function, template_expr_raw};

/// Emit `condition.filter`: compare a resolved left value against a resolved
/// right value. The operator is fixed at compile time; an unrecognized
/// operator falls back to equality.
pub fn emit_filter(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    let left = node.data_str("left").unwrap_or("");
    let right = node.data_str("right").unwrap_or("");
    unit.line(format!("  var left = {};", template_expr_raw(node, left)));
    unit.line(format!("  var right = {};", template_expr_raw(node, right)));
    let comparison = match node.data_str("operator").unwrap_or("equals") {
        "notEquals" => "String(left) !== String(right)",
        "contains" => "String(left).indexOf(String(right)) !== -1",
        "greaterThan" => "Number(left) > Number(right)",
        "lessThan" => "Number(left) < Number(right)",
        _ => "String(left) === String(right)",
    };
    unit.line(format!("  var passed = {};", comparison));
    unit.line("  return { type: 'condition.filter', status: 'evaluated', passed: passed };");
    close_function(&mut unit);
    unit
}

/// Emit `transform.map`: build an object from a mapping of output keys to
/// template strings. Non-string mapping values are embedded as JSON.
pub fn emit_map(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.line("  var mapped = {};");
    if let Some(mapping) = node.data.get("mapping").and_then(|v| v.as_object()) {
        for (key, value) in mapping {
            match value.as_str() {
                Some(template) => unit.line(format!(
                    "  mapped[{}] = {};",
                    js_string(key),
                    template_expr_raw(node, template)
                )),
                None => {
                    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
                    unit.line(format!("  mapped[{}] = {};", js_string(key), json))
                }
            };
        }
    }
    unit.line("  return { type: 'transform.map', status: 'transformed', data: mapped };");
    close_function(&mut unit);
    unit
}

/// Emit `transform.template`: render a single text template.
pub fn emit_template(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    let template = node.data_str("template").unwrap_or("");
    unit.line(format!("  var text = {};", template_expr_raw(node, template)));
    unit.line("  return { type: 'transform.template', status: 'transformed', text: text };");
    close_function(&mut unit);
    unit
}
