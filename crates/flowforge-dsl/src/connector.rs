// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connector authentication configuration.
//!
//! Connector-backed nodes (e.g. `action.chat.post`) embed a connector block
//! in their config. The compiler never sees secret values; it only derives
//! the *name* of the script property the deployer must set, prefixed with
//! the connector's uppercased slug.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

/// How a connector authenticates its outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AuthScheme {
    /// Shared secret sent in a custom header.
    SharedSecret,
    /// Bearer token in the Authorization header.
    Bearer,
    /// Basic credentials (`user:password`, base64-encoded at runtime).
    Basic,
    /// OAuth2 access token used as a bearer credential.
    #[serde(rename = "oauth2")]
    #[strum(serialize = "oauth2")]
    OAuth2,
}

impl AuthScheme {
    /// The suffix of the script property holding this scheme's secret.
    pub fn property_suffix(&self) -> &'static str {
        match self {
            AuthScheme::SharedSecret => "SHARED_SECRET",
            AuthScheme::Bearer => "BEARER_TOKEN",
            AuthScheme::Basic => "BASIC_CREDENTIALS",
            AuthScheme::OAuth2 => "OAUTH_TOKEN",
        }
    }
}

/// Connector block embedded in a node's configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// Connector slug, e.g. `slack` or `hubspot-crm`.
    pub slug: String,

    /// Authentication scheme the connector declared.
    pub auth: AuthScheme,

    /// Optional base URL override for the connector's API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ConnectorConfig {
    /// The script property name the deployer must set for this connector.
    ///
    /// The slug is uppercased and non-alphanumeric characters collapse to
    /// underscores: `hubspot-crm` + bearer -> `HUBSPOT_CRM_BEARER_TOKEN`.
    pub fn secret_property(&self) -> String {
        let mut prefix = String::with_capacity(self.slug.len());
        for c in self.slug.chars() {
            if c.is_ascii_alphanumeric() {
                prefix.push(c.to_ascii_uppercase());
            } else if !prefix.ends_with('_') {
                prefix.push('_');
            }
        }
        let prefix = prefix.trim_matches('_');
        format!("{}_{}", prefix, self.auth.property_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_property_simple_slug() {
        let c = ConnectorConfig {
            slug: "slack".to_string(),
            auth: AuthScheme::Bearer,
            base_url: None,
        };
        assert_eq!(c.secret_property(), "SLACK_BEARER_TOKEN");
    }

    #[test]
    fn test_secret_property_hyphenated_slug() {
        let c = ConnectorConfig {
            slug: "hubspot-crm".to_string(),
            auth: AuthScheme::SharedSecret,
            base_url: None,
        };
        assert_eq!(c.secret_property(), "HUBSPOT_CRM_SHARED_SECRET");
    }

    #[test]
    fn test_auth_scheme_wire_names() {
        assert_eq!(
            serde_json::to_value(AuthScheme::SharedSecret).unwrap(),
            serde_json::json!("sharedSecret")
        );
        assert_eq!(
            serde_json::to_value(AuthScheme::OAuth2).unwrap(),
            serde_json::json!("oauth2")
        );
    }

    #[test]
    fn test_property_suffixes() {
        assert_eq!(AuthScheme::Basic.property_suffix(), "BASIC_CREDENTIALS");
        assert_eq!(AuthScheme::OAuth2.property_suffix(), "OAUTH_TOKEN");
    }
}
