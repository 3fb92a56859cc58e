// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Whole-program assembly for the entry file.
//!
//! `Main.gs` carries the `executeWorkflow` orchestrator followed by one
//! `execute_<id>` function per node, in execution order. Every run is tagged
//! with a fresh correlation id, and node results accumulate under
//! `context.results` keyed by node id.

use flowforge_dsl::Graph;

use super::builder::js_string;
use super::context::EmitContext;
use super::nodes;
use crate::inject::{self, InjectionKind, InjectionParams};

/// Assemble the complete entry file for a graph whose nodes have already
/// been ordered topologically.
pub fn emit_main_file(
    graph: &Graph,
    order: &[String],
    ctx: &EmitContext,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&header(graph, ctx, generated_at));
    out.push('\n');
    out.push_str(&orchestrator(graph, order, ctx));
    for node_id in order {
        if let Some(node) = graph.node(node_id) {
            out.push('\n');
            out.push_str(&nodes::synthesize(node, ctx));
        }
    }
    out
}

fn header(graph: &Graph, ctx: &EmitContext, generated_at: &str) -> String {
    let version = ctx
        .options
        .version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    format!(
        "/**\n * {project} — generated workflow\n *\n * Workflow: {name} ({id})\n * Compiler version: {version}\n * Generated at: {generated_at}\n *\n * Do not edit by hand; changes are overwritten on the next compile.\n */\n",
        project = ctx.project_name(),
        name = graph.name,
        id = graph.id,
    )
}

fn orchestrator(graph: &Graph, order: &[String], ctx: &EmitContext) -> String {
    let options = ctx.options;
    let mut out = String::new();
    out.push_str("function executeWorkflow(triggerData) {\n");
    out.push_str("  var context = {\n");
    out.push_str("    correlationId: newCorrelationId(),\n");
    out.push_str("    startTime: new Date().toISOString(),\n");
    out.push_str("    triggerData: triggerData || {},\n");
    out.push_str("    results: {},\n");
    out.push_str("    errors: []\n");
    out.push_str("  };\n");
    if options.include_logging {
        out.push_str(&format!(
            "  Logger.log('[' + context.correlationId + '] ' + {});\n",
            js_string(&format!("Workflow {} starting", graph.id))
        ));
    }

    if options.include_error_handling {
        out.push_str("  try {\n");
        for node_id in order {
            out.push_str(&node_call(graph, node_id, options, "    "));
        }
        out.push_str("  } catch (err) {\n");
        out.push_str(
            "    context.errors.push({ nodeId: null, message: err && err.message ? err.message : String(err) });\n",
        );
        if let Some(email) = &options.notification_email {
            out.push_str("    try {\n");
            out.push_str(&format!(
                "      MailApp.sendEmail({}, 'Workflow run failed', JSON.stringify(context.errors, null, 2));\n",
                js_string(email)
            ));
            out.push_str("    } catch (mailErr) {\n");
            out.push_str("      Logger.log('Failure notification could not be sent: ' + mailErr);\n");
            out.push_str("    }\n");
        }
        out.push_str("    throw err;\n");
        out.push_str("  }\n");
    } else {
        for node_id in order {
            out.push_str(&node_call(graph, node_id, options, "  "));
        }
    }

    if options.include_logging {
        out.push_str(
            "  Logger.log('[' + context.correlationId + '] Workflow finished with ' + context.errors.length + ' error(s)');\n",
        );
    }
    out.push_str("  return {\n");
    out.push_str("    success: context.errors.length === 0,\n");
    out.push_str("    results: context.results,\n");
    out.push_str("    errors: context.errors\n");
    out.push_str("  };\n");
    out.push_str("}\n");
    out
}

/// One orchestrator step: call the node function and record its result.
///
/// With error handling enabled each step gets its own try/catch; a node that
/// opted out of continue-on-error rethrows so the run stops there.
fn node_call(
    graph: &Graph,
    node_id: &str,
    options: &crate::compile::CompilerOptions,
    indent: &str,
) -> String {
    let fn_name = EmitContext::node_fn(node_id);
    let key = js_string(node_id);
    let mut out = String::new();
    if options.include_error_handling {
        let continue_on_error = graph
            .node(node_id)
            .map(|n| n.continue_on_error())
            .unwrap_or(true);
        out.push_str(&format!("{indent}try {{\n"));
        out.push_str(&format!(
            "{indent}  context.results[{key}] = {fn_name}(context);\n"
        ));
        out.push_str(&format!("{indent}}} catch (err) {{\n"));
        let params = InjectionParams::for_node(node_id, "");
        out.push_str(&format!(
            "{indent}  {}\n",
            inject::snippet(InjectionKind::ErrorHandler, &params)
        ));
        if options.include_logging {
            out.push_str(&format!(
                "{indent}  Logger.log('[' + context.correlationId + '] Node ' + {key} + ' failed: ' + err);\n"
            ));
        }
        if !continue_on_error {
            out.push_str(&format!("{indent}  throw err;\n"));
        }
        out.push_str(&format!("{indent}}}\n"));
    } else {
        out.push_str(&format!(
            "{indent}context.results[{key}] = {fn_name}(context);\n"
        ));
    }
    out
}
