// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cross-cutting code injection.
//!
//! Generated units carry named slots (rendered as fixed marker comments when
//! unfilled) where authentication, error-handling, rate-limiting and
//! deduplication snippets are spliced in. The snippet for the `auth` kind
//! dispatches on the connector's declared scheme; secrets are read from a
//! per-connector, uppercased-slug-prefixed script property, never embedded.
//!
//! [`inject`] is the textual fallback over already-rendered code: it replaces
//! the marker comment when present and is a no-op otherwise, so it is
//! idempotent and safe to apply unconditionally.

use flowforge_dsl::{AuthScheme, ConnectorConfig};

use crate::codegen::builder::js_string;

/// The cross-cutting concerns that can be injected into a generated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    /// Connector authentication header setup.
    Auth,
    /// Error capture appended to the run's error list.
    ErrorHandler,
    /// Rate-limiter acquisition before an outbound call.
    RateLimit,
    /// Duplicate-delivery guard with TTL.
    Dedup,
}

impl InjectionKind {
    /// The fixed marker comment this kind replaces.
    pub fn marker(&self) -> &'static str {
        match self {
            InjectionKind::Auth => "// @inject:auth",
            InjectionKind::ErrorHandler => "// @inject:error",
            InjectionKind::RateLimit => "// @inject:rateLimit",
            InjectionKind::Dedup => "// @inject:dedup",
        }
    }
}

/// Per-node parameters for snippet selection.
#[derive(Debug, Clone, Default)]
pub struct InjectionParams {
    /// Id of the node the snippet is generated for.
    pub node_id: String,
    /// Capability tag of the node (used by the dedup skip result).
    pub node_type: String,
    /// Connector configuration, when the node is connector-backed.
    pub connector: Option<ConnectorConfig>,
    /// TTL for the dedup guard, seconds.
    pub dedup_ttl_seconds: u64,
}

impl InjectionParams {
    /// Parameters for a plain node without connector or dedup config.
    pub fn for_node(node_id: &str, node_type: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            node_type: node_type.to_string(),
            connector: None,
            dedup_ttl_seconds: 86_400,
        }
    }
}

/// Produce the snippet for one kind and parameter set.
pub fn snippet(kind: InjectionKind, params: &InjectionParams) -> String {
    match kind {
        InjectionKind::Auth => auth_snippet(params),
        InjectionKind::ErrorHandler => error_snippet(params),
        InjectionKind::RateLimit => rate_limit_snippet(params),
        InjectionKind::Dedup => dedup_snippet(params),
    }
}

/// Replace the marker comment for `kind` in `code`, if present.
///
/// Absent marker means no-op, which makes repeated application idempotent.
pub fn inject(code: &str, kind: InjectionKind, params: &InjectionParams) -> String {
    let marker = kind.marker();
    if !code.contains(marker) {
        return code.to_string();
    }
    code.replace(marker, &snippet(kind, params))
}

fn auth_snippet(params: &InjectionParams) -> String {
    let Some(connector) = &params.connector else {
        return "// no connector auth configured".to_string();
    };
    let property = connector.secret_property();
    match connector.auth {
        AuthScheme::SharedSecret => format!(
            "headers['X-Shared-Secret'] = PropertiesService.getScriptProperties().getProperty('{}');",
            property
        ),
        AuthScheme::Bearer | AuthScheme::OAuth2 => format!(
            "headers['Authorization'] = 'Bearer ' + PropertiesService.getScriptProperties().getProperty('{}');",
            property
        ),
        AuthScheme::Basic => format!(
            "headers['Authorization'] = 'Basic ' + Utilities.base64Encode(PropertiesService.getScriptProperties().getProperty('{}'));",
            property
        ),
    }
}

fn error_snippet(params: &InjectionParams) -> String {
    format!(
        "context.errors.push({{ nodeId: {}, message: err && err.message ? err.message : String(err) }});",
        js_string(&params.node_id)
    )
}

fn rate_limit_snippet(params: &InjectionParams) -> String {
    format!("RateLimiter.acquire({});", js_string(&params.node_id))
}

fn dedup_snippet(params: &InjectionParams) -> String {
    format!(
        "if (isProcessed(dedupKey)) {{ return {{ type: {}, status: 'skipped', deduped: true }}; }}\n  markProcessed(dedupKey, {});",
        js_string(&params.node_type),
        params.dedup_ttl_seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer_params() -> InjectionParams {
        InjectionParams {
            node_id: "a1".to_string(),
            node_type: "action.chat.post".to_string(),
            connector: Some(ConnectorConfig {
                slug: "slack".to_string(),
                auth: AuthScheme::Bearer,
                base_url: None,
            }),
            dedup_ttl_seconds: 3600,
        }
    }

    #[test]
    fn test_inject_replaces_auth_marker() {
        let code = "var headers = {};\n// @inject:auth\nfetch(url);";
        let out = inject(code, InjectionKind::Auth, &bearer_params());
        assert!(out.contains("SLACK_BEARER_TOKEN"));
        assert!(!out.contains("// @inject:auth"));
    }

    #[test]
    fn test_inject_noop_without_marker() {
        let code = "var headers = {};\nfetch(url);";
        let out = inject(code, InjectionKind::Auth, &bearer_params());
        assert_eq!(out, code);
    }

    #[test]
    fn test_inject_is_idempotent() {
        let code = "before\n// @inject:rateLimit\nafter";
        let params = InjectionParams::for_node("n1", "action.http.request");
        let once = inject(code, InjectionKind::RateLimit, &params);
        let twice = inject(&once, InjectionKind::RateLimit, &params);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_auth_dispatch_by_scheme() {
        let mut params = bearer_params();
        let bearer = snippet(InjectionKind::Auth, &params);
        assert!(bearer.contains("'Bearer ' +"));

        params.connector.as_mut().unwrap().auth = AuthScheme::SharedSecret;
        let shared = snippet(InjectionKind::Auth, &params);
        assert!(shared.contains("X-Shared-Secret"));
        assert!(shared.contains("SLACK_SHARED_SECRET"));

        params.connector.as_mut().unwrap().auth = AuthScheme::Basic;
        let basic = snippet(InjectionKind::Auth, &params);
        assert!(basic.contains("base64Encode"));
        assert!(basic.contains("SLACK_BASIC_CREDENTIALS"));

        params.connector.as_mut().unwrap().auth = AuthScheme::OAuth2;
        let oauth = snippet(InjectionKind::Auth, &params);
        assert!(oauth.contains("SLACK_OAUTH_TOKEN"));
    }

    #[test]
    fn test_auth_without_connector_degrades_to_comment() {
        let params = InjectionParams::for_node("n1", "action.http.request");
        let out = snippet(InjectionKind::Auth, &params);
        assert!(out.starts_with("//"));
    }

    #[test]
    fn test_snippets_escape_quoted_node_ids() {
        let params = InjectionParams::for_node("o'brien", "action.http.request");
        let error = snippet(InjectionKind::ErrorHandler, &params);
        assert!(error.contains(r"nodeId: 'o\'brien'"));
        assert!(!error.contains("nodeId: 'o'brien'"));
        let rate = snippet(InjectionKind::RateLimit, &params);
        assert_eq!(rate, r"RateLimiter.acquire('o\'brien');");
    }

    #[test]
    fn test_error_snippet_names_node() {
        let params = InjectionParams::for_node("fetch-orders", "action.http.request");
        let out = snippet(InjectionKind::ErrorHandler, &params);
        assert!(out.contains("'fetch-orders'"));
        assert!(out.contains("context.errors.push"));
    }

    #[test]
    fn test_dedup_snippet_uses_ttl_and_type() {
        let params = bearer_params();
        let out = snippet(InjectionKind::Dedup, &params);
        assert!(out.contains("3600"));
        assert!(out.contains("action.chat.post"));
        assert!(out.contains("status: 'skipped'"));
    }
}
