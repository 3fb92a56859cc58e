// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Trigger installation file.
//!
//! Bundles with trigger nodes get a `Triggers.gs` carrying one `run_<id>`
//! handler per trigger, an idempotent `installTriggers()` that replaces any
//! previously installed handlers, and web app entry points when the graph
//! listens for inbound webhooks.

use flowforge_dsl::{Graph, Node, NodeKind};
use serde_json::Value;

use crate::codegen::EmitContext;
use crate::codegen::builder::js_string;

/// Emit the trigger file, or `None` for graphs with no trigger nodes.
pub fn emit_triggers_file(graph: &Graph, ctx: &EmitContext) -> Option<String> {
    let triggers = graph.trigger_nodes();
    if triggers.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "/**\n * {} — trigger installation.\n *\n * Run installTriggers() once after uploading the bundle.\n */\n\n",
        ctx.project_name()
    ));

    out.push_str("var WORKFLOW_TRIGGER_HANDLERS = [\n");
    for (i, node) in triggers.iter().enumerate() {
        let comma = if i + 1 < triggers.len() { "," } else { "" };
        out.push_str(&format!(
            "  '{}'{}\n",
            EmitContext::trigger_handler(&node.id),
            comma
        ));
    }
    out.push_str("];\n\n");

    for &node in &triggers {
        out.push_str(&handler(node));
        out.push('\n');
    }

    out.push_str("/** Remove previously installed handlers, then install the current set. */\n");
    out.push_str("function installTriggers() {\n");
    out.push_str("  var existing = ScriptApp.getProjectTriggers();\n");
    out.push_str("  for (var i = 0; i < existing.length; i++) {\n");
    out.push_str(
        "    if (WORKFLOW_TRIGGER_HANDLERS.indexOf(existing[i].getHandlerFunction()) !== -1) {\n",
    );
    out.push_str("      ScriptApp.deleteTrigger(existing[i]);\n");
    out.push_str("    }\n");
    out.push_str("  }\n");
    for &node in &triggers {
        out.push_str(&installation(node));
    }
    out.push_str("}\n");

    if graph.has_webhook_trigger() {
        out.push('\n');
        out.push_str(&webhook_endpoints(&triggers));
    }

    Some(out)
}

/// A named handler the scheduler can address; delegates to the orchestrator
/// with the triggering node identified.
fn handler(node: &Node) -> String {
    let tag = node.kind().tag().to_string();
    format!(
        "function {}() {{\n  return executeWorkflow({{ source: {}, nodeId: {} }});\n}}\n",
        EmitContext::trigger_handler(&node.id),
        js_string(&tag),
        js_string(&node.id)
    )
}

fn installation(node: &Node) -> String {
    let handler = EmitContext::trigger_handler(&node.id);
    match node.kind() {
        NodeKind::TriggerTimeCron => {
            // The runtime's clock builder cannot express full cron; install
            // a daily trigger at the configured hour and note the schedule.
            let schedule = node.data_str("schedule").unwrap_or("").to_string();
            let hour = node.data.get("hour").and_then(Value::as_u64).unwrap_or(9);
            format!(
                "  // schedule: {}\n  ScriptApp.newTrigger('{}').timeBased().atHour({}).everyDays(1).create();\n",
                schedule, handler, hour
            )
        }
        NodeKind::TriggerTimeInterval => {
            let minutes = node
                .data
                .get("everyMinutes")
                .and_then(Value::as_u64)
                .unwrap_or(15);
            format!(
                "  ScriptApp.newTrigger('{}').timeBased().everyMinutes({}).create();\n",
                handler,
                normalize_interval(minutes)
            )
        }
        // Webhooks are served by doGet/doPost; nothing to install.
        _ => String::new(),
    }
}

/// Snap an interval to the nearest value the scheduler accepts.
fn normalize_interval(minutes: u64) -> u64 {
    const ALLOWED: [u64; 5] = [1, 5, 10, 15, 30];
    ALLOWED
        .into_iter()
        .min_by_key(|a| a.abs_diff(minutes))
        .unwrap_or(15)
}

fn webhook_endpoints(triggers: &[&Node]) -> String {
    let webhook_id = triggers
        .iter()
        .find(|n| n.kind() == NodeKind::TriggerWebhookInbound)
        .map(|n| n.id.clone())
        .unwrap_or_default();
    let mut out = String::new();
    out.push_str("function doGet(e) {\n  return runForWebhook_(e, 'get');\n}\n\n");
    out.push_str("function doPost(e) {\n  return runForWebhook_(e, 'post');\n}\n\n");
    out.push_str("function runForWebhook_(e, method) {\n");
    out.push_str("  var body = null;\n");
    out.push_str("  if (e && e.postData && e.postData.contents) {\n");
    out.push_str("    body = safeJsonParse(e.postData.contents);\n");
    out.push_str("  }\n");
    out.push_str("  var outcome = executeWorkflow({\n");
    out.push_str("    source: 'trigger.webhook.inbound',\n");
    out.push_str(&format!("    nodeId: {},\n", js_string(&webhook_id)));
    out.push_str("    method: method,\n");
    out.push_str("    params: (e && e.parameter) || {},\n");
    out.push_str("    body: body\n");
    out.push_str("  });\n");
    out.push_str("  if (outcome.success) {\n");
    out.push_str("    return respondJson_({ success: true, results: outcome.results });\n");
    out.push_str("  }\n");
    out.push_str("  return respondJson_({\n");
    out.push_str("    success: false,\n");
    out.push_str("    error: outcome.errors.map(function (err) { return err.message; }).join('; ')\n");
    out.push_str("  });\n");
    out.push_str("}\n\n");
    out.push_str("function respondJson_(payload) {\n");
    out.push_str("  return ContentService.createTextOutput(JSON.stringify(payload))\n");
    out.push_str("    .setMimeType(ContentService.MimeType.JSON);\n");
    out.push_str("}\n");
    out
}
