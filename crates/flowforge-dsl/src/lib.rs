// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow Graph Data Model - Single Source of Truth
//!
//! This crate defines the workflow graph types used throughout the codebase:
//! - API deserialization of user-authored workflow JSON
//! - Compiler type-safe access to graph structure
//! - JSON Schema generation via schemars for the editor
//!
//! A workflow is a directed graph of trigger/action/logic nodes. Nodes carry a
//! dotted capability tag (e.g. `action.mail.send`) and an opaque configuration
//! map; edges declare "target runs after source".

#![deny(missing_docs)]

/// Graph, node and edge wire types.
pub mod graph;

/// Closed node capability catalog and run status tags.
pub mod node_kind;

/// Connector authentication configuration.
pub mod connector;

/// Output shape of the external graph validator.
pub mod validation;

pub use connector::{AuthScheme, ConnectorConfig};
pub use graph::{Edge, Graph, Node};
pub use node_kind::{NodeKind, RunStatus};
pub use validation::ValidationReport;

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a workflow graph from a JSON value.
pub fn parse_graph(json: &serde_json::Value) -> Result<Graph, String> {
    serde_json::from_value(json.clone()).map_err(|e| format!("Failed to parse graph: {}", e))
}
