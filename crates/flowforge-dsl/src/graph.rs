// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wire types for user-authored workflow graphs.
//!
//! These types mirror the JSON the visual editor produces. The `type` field
//! of a node stays a plain string on the wire; [`Node::kind`] parses it into
//! the closed [`NodeKind`](crate::node_kind::NodeKind) catalog on demand.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connector::ConnectorConfig;
use crate::node_kind::NodeKind;

/// A complete user-authored workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    /// Unique workflow identifier.
    pub id: String,

    /// Human-readable workflow name.
    pub name: String,

    /// Optional description of what the workflow does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// All nodes in the workflow.
    pub nodes: Vec<Node>,

    /// Directed dependency edges ("target runs after source").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// The ids of all nodes, in authoring order.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes whose capability tag is a trigger.
    pub fn trigger_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind().is_trigger()).collect()
    }

    /// Whether any node is an inbound webhook trigger.
    pub fn has_webhook_trigger(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| matches!(n.kind(), NodeKind::TriggerWebhookInbound))
    }
}

/// One step in a workflow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node id within the graph.
    pub id: String,

    /// Dotted capability tag, e.g. `action.mail.send`.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Opaque node configuration as authored in the editor.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Node {
    /// Parse the capability tag into the closed catalog.
    pub fn kind(&self) -> NodeKind {
        NodeKind::parse(&self.node_type)
    }

    /// A string config value, if present and a string.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Whether a downstream failure of this node aborts the whole run.
    ///
    /// Defaults to tolerating errors; only an explicit `false` opts out.
    pub fn continue_on_error(&self) -> bool {
        self.data
            .get("continueOnError")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    /// Connector configuration embedded in the node config, if any.
    pub fn connector(&self) -> Option<ConnectorConfig> {
        self.data
            .get("connector")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// A directed dependency edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge id.
    pub id: String,

    /// Source node id (runs first).
    pub source: String,

    /// Target node id (depends on source).
    pub target: String,
}
