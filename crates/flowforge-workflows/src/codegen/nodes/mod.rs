// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node emitters.
//!
//! Dispatch is closed over [`NodeKind`]: every supported capability has one
//! emitter, and anything else falls through to the stub emitter. Synthesis
//! never fails; an unimplemented capability produces a unit that reports
//! itself skipped at run time.

pub mod actions;
pub mod logic;
pub mod triggers;
pub mod utility;

use flowforge_dsl::{Node, NodeKind, RunStatus};
use serde_json::Value;

use super::builder::{CodeUnit, SlotFills, js_string};
use super::context::EmitContext;
use crate::inject::{self, InjectionKind, InjectionParams};
use crate::placeholder;

/// Synthesize the complete `execute_<id>` source unit for a node.
pub fn synthesize(node: &Node, ctx: &EmitContext) -> String {
    let unit = emit_unit(node, ctx);
    let fills = slot_fills(node, ctx);
    unit.render(&fills)
}

/// Build the (unrendered) code unit for a node.
pub fn emit_unit(node: &Node, ctx: &EmitContext) -> CodeUnit {
    match node.kind() {
        NodeKind::TriggerTimeCron | NodeKind::TriggerTimeInterval | NodeKind::TriggerWebhookInbound => {
            triggers::emit(node, ctx)
        }
        NodeKind::ActionHttpRequest => actions::emit_http_request(node, ctx),
        NodeKind::ActionMailSend => actions::emit_mail_send(node, ctx),
        NodeKind::ActionSheetAppend => actions::emit_sheet_append(node, ctx),
        NodeKind::ActionCalendarCreate => actions::emit_calendar_create(node, ctx),
        NodeKind::ActionChatPost => actions::emit_chat_post(node, ctx),
        NodeKind::ConditionFilter => logic::emit_filter(node, ctx),
        NodeKind::TransformMap => logic::emit_map(node, ctx),
        NodeKind::TransformTemplate => logic::emit_template(node, ctx),
        NodeKind::UtilityDelay => utility::emit_delay(node, ctx),
        NodeKind::UtilityLog => utility::emit_log(node, ctx),
        NodeKind::Unknown(tag) => emit_stub(node, &tag),
    }
}

/// Compute the slot fills for a node under the current options.
///
/// Slots without a fill render as their marker comment, so the textual
/// injector can still operate on the rendered unit later.
pub fn slot_fills(node: &Node, ctx: &EmitContext) -> SlotFills {
    let mut params = InjectionParams::for_node(&node.id, node.kind().tag());
    params.connector = node.connector();
    if let Some(ttl) = node.data.get("dedupTtlSeconds").and_then(Value::as_u64) {
        params.dedup_ttl_seconds = ttl;
    }

    let mut fills = SlotFills::new();
    if params.connector.is_some() {
        fills.insert(InjectionKind::Auth, inject::snippet(InjectionKind::Auth, &params));
    }
    if ctx.options.include_rate_limiting {
        fills.insert(
            InjectionKind::RateLimit,
            inject::snippet(InjectionKind::RateLimit, &params),
        );
    }
    if node.data_str("dedupKey").is_some() {
        fills.insert(InjectionKind::Dedup, inject::snippet(InjectionKind::Dedup, &params));
    }
    fills
}

/// Open the node function and emit the shared prologue.
///
/// Nodes configured with a `dedupKey` get a dedup slot before any work.
pub(crate) fn open_function(unit: &mut CodeUnit, node: &Node) {
    unit.line(format!("function {}(context) {{", EmitContext::node_fn(&node.id)));
    if let Some(key) = node.data_str("dedupKey") {
        unit.line(format!("  var dedupKey = {};", template_expr_raw(node, key)));
        unit.slot(InjectionKind::Dedup, "  ");
    }
}

/// Close the node function.
pub(crate) fn close_function(unit: &mut CodeUnit) {
    unit.line("}");
}

/// Resolve compile-time placeholders in a config string against the node's
/// own config map. Unresolved tokens survive for run-time resolution.
pub(crate) fn compile_resolve(node: &Node, raw: &str) -> String {
    placeholder::resolve(raw, &Value::Object(node.data.clone()))
}

/// A `resolveTemplate(...)` expression for a config key, with a default.
pub(crate) fn template_expr(node: &Node, key: &str, default: &str) -> String {
    let raw = node.data_str(key).unwrap_or(default);
    template_expr_raw(node, raw)
}

/// A `resolveTemplate(...)` expression over a raw template string.
pub(crate) fn template_expr_raw(node: &Node, raw: &str) -> String {
    let resolved = compile_resolve(node, raw);
    format!("resolveTemplate({}, context)", js_string(&resolved))
}

/// A parsed-JSON expression for a structured config value, if present.
pub(crate) fn json_expr(node: &Node, key: &str) -> Option<String> {
    node.data.get(key).map(|value| {
        let text = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        let resolved = compile_resolve(node, &text);
        format!("safeJsonParse(resolveTemplate({}, context))", js_string(&resolved))
    })
}

/// Stub for capability tags outside the catalog: logs and reports `skipped`.
fn emit_stub(node: &Node, tag: &str) -> CodeUnit {
    let mut unit = CodeUnit::new();
    unit.line(format!("function {}(context) {{", EmitContext::node_fn(&node.id)));
    unit.line(format!(
        "  Logger.log({});",
        js_string(&format!(
            "Unrecognized node type {} (node {}); skipping",
            tag, node.id
        ))
    ));
    unit.line(format!(
        "  return {{ type: {}, status: '{}' }};",
        js_string(tag),
        RunStatus::Skipped
    ));
    unit.line("}");
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::CompilerOptions;

    fn node(json: serde_json::Value) -> Node {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_unknown_type_produces_stub() {
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        let n = node(serde_json::json!({"id": "x1", "type": "action.fax.send"}));
        let code = synthesize(&n, &ctx);
        assert!(code.contains("function execute_x1(context)"));
        assert!(code.contains("status: 'skipped'"));
        assert!(code.contains("Unrecognized node type action.fax.send"));
    }

    #[test]
    fn test_stub_escapes_quoted_tag_and_id() {
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        let n = node(serde_json::json!({"id": "bob's", "type": "action.o'neill"}));
        let code = synthesize(&n, &ctx);
        assert!(code.contains(r"action.o\'neill"));
        assert!(code.contains(r"bob\'s"));
        assert!(!code.contains("'action.o'neill'"));
    }

    #[test]
    fn test_every_catalog_kind_synthesizes_a_function() {
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        for tag in [
            "trigger.time.cron",
            "trigger.time.interval",
            "trigger.webhook.inbound",
            "action.http.request",
            "action.mail.send",
            "action.sheet.append",
            "action.calendar.create",
            "action.chat.post",
            "condition.filter",
            "transform.map",
            "transform.template",
            "utility.delay",
            "utility.log",
        ] {
            let n = node(serde_json::json!({"id": "n1", "type": tag}));
            let code = synthesize(&n, &ctx);
            assert!(
                code.contains("function execute_n1(context)"),
                "no function for {}",
                tag
            );
            assert!(code.contains(&format!("'{}'", tag)), "no type tag for {}", tag);
        }
    }

    #[test]
    fn test_dedup_key_adds_guard() {
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        let n = node(serde_json::json!({
            "id": "a1",
            "type": "action.mail.send",
            "data": {"dedupKey": "mail-{{triggerData.id}}", "dedupTtlSeconds": 600}
        }));
        let code = synthesize(&n, &ctx);
        assert!(code.contains("var dedupKey = resolveTemplate"));
        assert!(code.contains("isProcessed(dedupKey)"));
        assert!(code.contains("markProcessed(dedupKey, 600)"));
    }

    #[test]
    fn test_rate_limit_fill_follows_options() {
        let mut options = CompilerOptions::default();
        options.include_rate_limiting = true;
        let ctx = EmitContext::new(&options);
        let n = node(serde_json::json!({"id": "h1", "type": "action.http.request", "data": {"url": "https://x"}}));
        let code = synthesize(&n, &ctx);
        assert!(code.contains("RateLimiter.acquire('h1');"));

        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        let code = synthesize(&n, &ctx);
        assert!(code.contains("// @inject:rateLimit"));
    }

    #[test]
    fn test_compile_time_placeholder_resolution_against_config() {
        let n = node(serde_json::json!({
            "id": "h1",
            "type": "action.http.request",
            "data": {"host": "api.example.com", "url": "https://{{host}}/v1"}
        }));
        let expr = template_expr(&n, "url", "");
        assert!(expr.contains("https://api.example.com/v1"));
    }

    #[test]
    fn test_runtime_placeholders_survive_compile_resolution() {
        let n = node(serde_json::json!({
            "id": "h1",
            "type": "action.http.request",
            "data": {"url": "https://api.example.com/{{results.t1.id}}"}
        }));
        let expr = template_expr(&n, "url", "");
        assert!(expr.contains("{{results.t1.id}}"));
    }
}
