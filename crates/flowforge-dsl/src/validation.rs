// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Output shape of the external graph validator.
//!
//! Semantic validation runs before compilation in a separate service. The
//! compiler only consumes its report: a pass/fail flag, human-readable error
//! strings, and the capability scopes the workflow needs at runtime.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of external semantic validation of a workflow graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Whether the graph passed validation.
    pub valid: bool,

    /// Human-readable validation errors (empty when valid).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// Capability scopes the compiled workflow requires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_scopes: Vec<String>,
}

impl ValidationReport {
    /// A passing report with the given scopes.
    pub fn passed(required_scopes: Vec<String>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            required_scopes,
        }
    }

    /// One-line summary of the validation errors.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            "graph failed validation".to_string()
        } else {
            self.errors.join("; ")
        }
    }
}
