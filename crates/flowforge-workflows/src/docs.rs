// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Human-facing deployment guide generated alongside the bundle.

use std::collections::BTreeSet;
use std::fmt::Write;

use flowforge_dsl::Graph;

use crate::codegen::EmitContext;

/// Config keys whose string value names a script property holding a secret.
const SECRET_PROPERTY_KEYS: [&str; 4] = [
    "apiKeyProperty",
    "tokenProperty",
    "secretProperty",
    "passwordProperty",
];

/// Render `DEPLOYMENT.md` for a compiled bundle.
pub fn emit_deployment_doc(
    graph: &Graph,
    ctx: &EmitContext,
    has_triggers: bool,
    has_webhook: bool,
) -> String {
    let secrets = collect_secret_properties(graph);
    let mut out = String::new();
    let _ = writeln!(out, "# Deploying {}", ctx.project_name());
    let _ = writeln!(out);
    let _ = writeln!(out, "Workflow: **{}** (`{}`)", graph.name, graph.id);
    let _ = writeln!(out);

    let mut step = 1;
    let _ = writeln!(
        out,
        "{step}. Create a new script project and upload every file in this bundle, keeping the file names as-is. `appsscript.json` replaces the project manifest."
    );
    step += 1;

    if secrets.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No additional configuration is required.");
        let _ = writeln!(out);
    } else {
        let _ = writeln!(
            out,
            "{step}. Open Project Settings and add the following script properties:"
        );
        for secret in &secrets {
            let _ = writeln!(out, "   - `{secret}`");
        }
        step += 1;
    }

    if has_triggers {
        let _ = writeln!(
            out,
            "{step}. From the editor, run `installTriggers` once and grant the requested permissions. Re-running it later is safe; old handlers are replaced."
        );
        step += 1;
    }

    let _ = writeln!(
        out,
        "{step}. Run `executeWorkflow` manually with empty trigger data and check the execution log for a run with zero errors."
    );
    step += 1;

    if has_webhook {
        let _ = writeln!(
            out,
            "{step}. Deploy the project as a web app (execute as yourself, accessible to anyone) and use the deployment URL as the inbound webhook endpoint."
        );
    }

    out
}

/// Collect every script property name the generated code reads.
fn collect_secret_properties(graph: &Graph) -> BTreeSet<String> {
    let mut secrets = BTreeSet::new();
    for node in &graph.nodes {
        if let Some(connector) = node.connector() {
            secrets.insert(connector.secret_property());
        }
        for key in SECRET_PROPERTY_KEYS {
            if let Some(name) = node.data_str(key) {
                secrets.insert(name.to_string());
            }
        }
    }
    secrets
}
