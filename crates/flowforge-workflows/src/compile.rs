// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compilation entry point: graph in, script bundle out.
//!
//! The caller pre-loads everything (graph, options, validation verdict);
//! this module performs no I/O. [`compile`] never returns an error: failures
//! come back as a [`CompilerResult`] with `success: false` so callers have
//! one shape to handle.

use std::fmt;

use chrono::Utc;
use flowforge_dsl::{Graph, ValidationReport};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::codegen::EmitContext;
use crate::codegen::program;
use crate::docs;
use crate::helpers;
use crate::installer;
use crate::manifest::{self, Manifest};
use crate::topo::{self, CycleError};

/// Options controlling one compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Display name used in generated headers and docs.
    pub project_name: Option<String>,
    /// IANA time zone for the manifest. Defaults to `Etc/UTC`.
    pub timezone: Option<String>,
    /// Compiler version stamped into the entry file header. Defaults to the
    /// crate version.
    pub version: Option<String>,
    /// Emit run narration through the runtime logger.
    pub include_logging: bool,
    /// Wrap every node call in try/catch and collect failures.
    pub include_error_handling: bool,
    /// Ship the rate limiter and fill rate-limit slots in outbound nodes.
    pub include_rate_limiting: bool,
    /// Address notified by mail when a run fails outright.
    pub notification_email: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            project_name: None,
            timezone: None,
            version: None,
            include_logging: true,
            include_error_handling: true,
            include_rate_limiting: false,
            notification_email: None,
        }
    }
}

/// Everything the compiler needs, pre-loaded by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationInput {
    /// The workflow graph to compile.
    pub graph: Graph,
    /// Compilation options.
    #[serde(default)]
    pub options: CompilerOptions,
    /// The validator's verdict on this graph.
    pub validation: ValidationReport,
}

/// Classification of a bundle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Executable script source.
    Code,
    /// Structured data such as the manifest.
    Data,
    /// Human-facing text.
    Markup,
}

/// One file in the generated bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledFile {
    /// File name, unique within the bundle.
    pub name: String,
    /// Full file content.
    pub content: String,
    /// File classification.
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Short description for bundle listings.
    pub description: String,
}

/// The outcome of one compilation, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerResult {
    /// Whether a deployable bundle was produced.
    pub success: bool,
    /// Bundle files, empty on failure.
    pub files: Vec<CompiledFile>,
    /// Manifest, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
    /// Name of the entry file, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Total size of all file contents in bytes.
    pub estimated_size: usize,
    /// Hex digest over the bundle, stable across recompiles of the same
    /// input. Present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_checksum: Option<String>,
    /// OAuth scopes the bundle requires.
    pub required_scopes: Vec<String>,
    /// Rendered deployment guide, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_instructions: Option<String>,
    /// Failure message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompilerResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            manifest: None,
            entry: None,
            estimated_size: 0,
            bundle_checksum: None,
            required_scopes: Vec::new(),
            deployment_instructions: None,
            error: Some(message),
        }
    }
}

/// Internal compilation failure.
#[derive(Debug)]
pub enum CompileError {
    /// The graph contains a cycle.
    Cycle(CycleError),
    /// A support template failed to render.
    Render(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Cycle(e) => write!(f, "{}", e),
            CompileError::Render(msg) => write!(f, "Template rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<CycleError> for CompileError {
    fn from(e: CycleError) -> Self {
        CompileError::Cycle(e)
    }
}

impl From<minijinja::Error> for CompileError {
    fn from(e: minijinja::Error) -> Self {
        CompileError::Render(e.to_string())
    }
}

/// Compile a validated graph into a deployable script bundle.
pub fn compile(input: &CompilationInput) -> CompilerResult {
    let graph = &input.graph;
    info!(
        workflow_id = %graph.id,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Compiling workflow"
    );

    if !input.validation.valid {
        let message = input.validation.error_summary();
        warn!(workflow_id = %graph.id, error = %message, "Rejecting unvalidated graph");
        return CompilerResult::failure(message);
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| compile_inner(input)));
    match outcome {
        Ok(Ok(result)) => {
            info!(
                workflow_id = %graph.id,
                files = result.files.len(),
                estimated_size = result.estimated_size,
                "Compilation succeeded"
            );
            result
        }
        Ok(Err(err)) => {
            error!(workflow_id = %graph.id, error = %err, "Compilation failed");
            CompilerResult::failure(err.to_string())
        }
        Err(panic_info) => {
            let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic during code generation".to_string()
            };
            error!(workflow_id = %graph.id, error = %message, "Code generation panicked");
            CompilerResult::failure(format!("Code generation failed: {}", message))
        }
    }
}

fn compile_inner(input: &CompilationInput) -> Result<CompilerResult, CompileError> {
    let graph = &input.graph;
    let options = &input.options;
    let ctx = EmitContext::new(options);

    let order = topo::execution_order(&graph.node_ids(), &graph.edges)?;
    let generated_at = Utc::now().to_rfc3339();
    let has_webhook = graph.has_webhook_trigger();
    let has_triggers = !graph.trigger_nodes().is_empty();

    let mut files = Vec::new();
    files.push(CompiledFile {
        name: "Main.gs".to_string(),
        content: program::emit_main_file(graph, &order, &ctx, &generated_at),
        kind: FileKind::Code,
        description: "Workflow orchestrator and node functions".to_string(),
    });
    for support in helpers::render_support_files(ctx.project_name(), options.include_rate_limiting)?
    {
        files.push(CompiledFile {
            name: support.name.to_string(),
            content: support.content,
            kind: FileKind::Code,
            description: support.description.to_string(),
        });
    }
    if let Some(triggers) = installer::emit_triggers_file(graph, &ctx) {
        files.push(CompiledFile {
            name: "Triggers.gs".to_string(),
            content: triggers,
            kind: FileKind::Code,
            description: "Trigger handlers, installer, and webhook endpoints".to_string(),
        });
    }

    let manifest = manifest::build_manifest(&input.validation, options);
    files.push(CompiledFile {
        name: "appsscript.json".to_string(),
        content: serde_json::to_string_pretty(&manifest)
            .map_err(|e| CompileError::Render(e.to_string()))?,
        kind: FileKind::Data,
        description: "Project manifest".to_string(),
    });

    let instructions = docs::emit_deployment_doc(graph, &ctx, has_triggers, has_webhook);
    files.push(CompiledFile {
        name: "DEPLOYMENT.md".to_string(),
        content: instructions.clone(),
        kind: FileKind::Markup,
        description: "Deployment guide".to_string(),
    });

    let estimated_size = files.iter().map(|f| f.content.len()).sum();
    let checksum = bundle_checksum(&files);

    Ok(CompilerResult {
        success: true,
        files,
        required_scopes: manifest.oauth_scopes.clone(),
        manifest: Some(manifest),
        entry: Some("Main.gs".to_string()),
        estimated_size,
        bundle_checksum: Some(checksum),
        deployment_instructions: Some(instructions),
        error: None,
    })
}

/// Digest over file names and contents, skipping the one generated-at line
/// so recompiling the same input yields the same checksum.
fn bundle_checksum(files: &[CompiledFile]) -> String {
    let mut hasher = Sha256::new();
    for file in files {
        hasher.update(file.name.as_bytes());
        hasher.update([0]);
        for line in file.content.lines() {
            if line.contains("Generated at:") {
                continue;
            }
            hasher.update(line.as_bytes());
            hasher.update([b'\n']);
        }
        hasher.update([0]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
