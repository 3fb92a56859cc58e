// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bundle manifest for the hosted script runtime.

use flowforge_dsl::ValidationReport;
use serde::{Deserialize, Serialize};

use crate::compile::CompilerOptions;

/// The `appsscript.json` manifest included in every bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// IANA time zone the runtime evaluates schedules in.
    pub time_zone: String,
    /// OAuth scopes the bundle requires, sorted and deduplicated.
    pub oauth_scopes: Vec<String>,
    /// Runtime engine version.
    pub runtime_version: String,
    /// Web app exposure policy. Always emitted; the runtime ignores it for
    /// bundles that are never deployed as a web app.
    pub webapp: WebAppConfig,
    /// Execution API exposure.
    pub execution_api: ExecutionApiConfig,
}

/// Web app deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppConfig {
    /// Who may invoke the web app endpoints.
    pub access: String,
    /// Which identity the handlers run under.
    pub execute_as: String,
}

/// Execution API deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionApiConfig {
    /// Who may invoke functions through the execution API.
    pub access: String,
}

/// Build the manifest from the validator's scope requirements and the
/// compilation options.
pub fn build_manifest(report: &ValidationReport, options: &CompilerOptions) -> Manifest {
    let mut scopes = report.required_scopes.clone();
    scopes.sort();
    scopes.dedup();
    Manifest {
        time_zone: options
            .timezone
            .clone()
            .unwrap_or_else(|| "Etc/UTC".to_string()),
        oauth_scopes: scopes,
        runtime_version: "V8".to_string(),
        webapp: WebAppConfig {
            access: "ANYONE_ANONYMOUS".to_string(),
            execute_as: "USER_DEPLOYING".to_string(),
        },
        execution_api: ExecutionApiConfig {
            access: "ANYONE".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scopes: &[&str]) -> ValidationReport {
        ValidationReport {
            valid: true,
            errors: Vec::new(),
            required_scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_scopes_sorted_and_deduped() {
        let r = report(&[
            "https://www.googleapis.com/auth/spreadsheets",
            "https://www.googleapis.com/auth/script.external_request",
            "https://www.googleapis.com/auth/spreadsheets",
        ]);
        let manifest = build_manifest(&r, &CompilerOptions::default());
        assert_eq!(manifest.oauth_scopes.len(), 2);
        assert!(manifest.oauth_scopes[0] < manifest.oauth_scopes[1]);
    }

    #[test]
    fn test_timezone_defaults_to_utc() {
        let manifest = build_manifest(&report(&[]), &CompilerOptions::default());
        assert_eq!(manifest.time_zone, "Etc/UTC");
        assert_eq!(manifest.runtime_version, "V8");
    }

    #[test]
    fn test_webapp_always_present() {
        let manifest = build_manifest(&report(&[]), &CompilerOptions::default());
        assert_eq!(manifest.webapp.access, "ANYONE_ANONYMOUS");
        assert_eq!(manifest.webapp.execute_as, "USER_DEPLOYING");
    }

    #[test]
    fn test_serializes_camel_case() {
        let manifest = build_manifest(&report(&[]), &CompilerOptions::default());
        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json.get("timeZone").is_some());
        assert!(json.get("oauthScopes").is_some());
        assert!(json.get("runtimeVersion").is_some());
        assert!(json["webapp"].get("executeAs").is_some());
        assert!(json["executionApi"].get("access").is_some());
    }
}
