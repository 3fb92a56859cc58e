// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Trigger node emitters.
//!
//! Trigger functions do no work of their own at run time; the platform
//! trigger (or inbound webhook handler) has already fired. They normalize
//! the trigger payload into the run's result map so downstream nodes can
//! reference it.

use flowforge_dsl::{Node, NodeKind};

use super::super::builder::{CodeUnit, js_string};
use super::super::context::EmitContext;
use super::{close_function, open_function};

/// Emit the unit for any trigger kind.
pub fn emit(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    match node.kind() {
        NodeKind::TriggerTimeCron => emit_cron_body(&mut unit, node),
        NodeKind::TriggerTimeInterval => emit_interval_body(&mut unit, node),
        NodeKind::TriggerWebhookInbound => emit_webhook_body(&mut unit),
        // emit() is only dispatched for trigger kinds
        other => unreachable!("not a trigger kind: {}", other),
    }
    close_function(&mut unit);
    unit
}

fn emit_cron_body(unit: &mut CodeUnit, node: &Node) {
    let schedule = node.data_str("schedule").unwrap_or("0 * * * *");
    unit.line("  return {");
    unit.line("    type: 'trigger.time.cron',");
    unit.line("    status: 'triggered',");
    unit.line(format!("    schedule: {},", js_string(schedule)));
    unit.line("    data: context.triggerData || {}");
    unit.line("  };");
}

fn emit_interval_body(unit: &mut CodeUnit, node: &Node) {
    let minutes = node
        .data
        .get("everyMinutes")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(15);
    unit.line("  return {");
    unit.line("    type: 'trigger.time.interval',");
    unit.line("    status: 'triggered',");
    unit.line(format!("    everyMinutes: {},", minutes));
    unit.line("    data: context.triggerData || {}");
    unit.line("  };");
}

fn emit_webhook_body(unit: &mut CodeUnit) {
    unit.line("  var incoming = context.triggerData || {};");
    unit.line("  return {");
    unit.line("    type: 'trigger.webhook.inbound',");
    unit.line("    status: 'triggered',");
    unit.line("    method: incoming.method || null,");
    unit.line("    params: incoming.params || {},");
    unit.line("    body: incoming.body !== undefined ? incoming.body : null");
    unit.line("  };");
}
