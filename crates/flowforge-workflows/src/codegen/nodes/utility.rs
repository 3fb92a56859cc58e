// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Utility node emitters.

use flowforge_dsl::Node;
use serde_json::Value;

use super::super::builder::CodeUnit;
use super::super::context::EmitContext;
use super::{close_function, open_function, template_expr};

/// Longest pause a single node may insert, in seconds. The hosted runtime
/// kills runs after a few minutes, so longer delays are clamped.
const MAX_DELAY_SECONDS: u64 = 300;

/// Emit `utility.delay`: a clamped `Utilities.sleep`.
pub fn emit_delay(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    let seconds = node
        .data
        .get("seconds")
        .and_then(Value::as_u64)
        .unwrap_or(1)
        .min(MAX_DELAY_SECONDS);
    unit.line(format!("  Utilities.sleep({} * 1000);", seconds));
    unit.line(format!(
        "  return {{ type: 'utility.delay', status: 'completed', seconds: {} }};",
        seconds
    ));
    close_function(&mut unit);
    unit
}

/// Emit `utility.log`: a structured log line tagged with the correlation id.
pub fn emit_log(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.line(format!(
        "  var message = {};",
        template_expr(node, "message", "")
    ));
    unit.line("  Logger.log('[' + context.correlationId + '] ' + message);");
    unit.line("  return { type: 'utility.log', status: 'completed', message: message };");
    close_function(&mut unit);
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::nodes::synthesize;
    use crate::compile::CompilerOptions;

    fn render(json: serde_json::Value) -> String {
        let node: Node = serde_json::from_value(json).unwrap();
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        synthesize(&node, &ctx)
    }

    #[test]
    fn test_delay_clamps_to_five_minutes() {
        let code = render(serde_json::json!({
            "id": "d1",
            "type": "utility.delay",
            "data": {"seconds": 900}
        }));
        assert!(code.contains("Utilities.sleep(300 * 1000);"));
    }

    #[test]
    fn test_delay_defaults_to_one_second() {
        let code = render(serde_json::json!({
            "id": "d1",
            "type": "utility.delay"
        }));
        assert!(code.contains("Utilities.sleep(1 * 1000);"));
    }

    #[test]
    fn test_log_prefixes_correlation_id() {
        let code = render(serde_json::json!({
            "id": "l1",
            "type": "utility.log",
            "data": {"message": "reached step {{results.f1.passed}}"}
        }));
        assert!(code.contains("context.correlationId"));
        assert!(code.contains("reached step {{results.f1.passed}}"));
    }
}
