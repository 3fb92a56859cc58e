// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Placeholder resolution over dotted-path lookups.
//!
//! Generated code mixes two placeholder syntaxes: `{{path.to.value}}` and
//! `${path.to.value}`. Both resolve via a dotted-path walk into a JSON value
//! bag. A placeholder whose path cannot be fully resolved is left untouched,
//! so partially-configured nodes still produce inspectable output; the same
//! token can then resolve at run time against the live execution context.

use serde_json::Value;

/// Resolve both placeholder syntaxes in `template` against `values`.
pub fn resolve(template: &str, values: &Value) -> String {
    let pass = substitute(template, "{{", "}}", values);
    substitute(&pass, "${", "}", values)
}

/// Walk a dotted path into a JSON value.
pub fn lookup<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = values;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn substitute(template: &str, open: &str, close: &str, values: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let after = &rest[start + open.len()..];

        let Some(end) = after.find(close) else {
            // Unterminated token: keep the opener literally and stop scanning.
            out.push_str(open);
            rest = after;
            break;
        };

        let path = after[..end].trim();
        match lookup(values, path) {
            Some(value) => out.push_str(&render(value)),
            None => {
                // Missing path: keep the original token byte-for-byte.
                out.push_str(&rest[start..start + open.len() + end + close.len()]);
            }
        }
        rest = &after[end + close.len()..];
    }

    out.push_str(rest);
    out
}

/// Render a resolved value for embedding in text.
///
/// Strings embed raw; everything else uses its compact JSON form.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
