// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Static support files shipped with every bundle.
//!
//! These are templates rather than verbatim strings so the project name and
//! optional sections (the rate limiter) can vary per compilation. The
//! generated functions are the run-time counterpart of the compiler: node
//! units call into them for template resolution, HTTP plumbing, and the
//! durable key/value store.

use minijinja::{Environment, context};

/// A rendered support file, ready for the bundle.
pub struct SupportFile {
    /// File name inside the bundle.
    pub name: &'static str,
    /// Rendered source.
    pub content: String,
    /// Short description for the bundle listing.
    pub description: &'static str,
}

const HELPERS_TEMPLATE: &str = r#"/**
 * {{ project_name }} — shared helpers.
 */

/**
 * Resolve placeholder tokens in a template against the run context.
 * Both moustache and dollar-brace syntaxes are honored; tokens whose
 * path is absent from the context are left untouched.
 */
function resolveTemplate(template, context) {
  if (typeof template !== 'string') {
    return template;
  }
  var substitute = function (match, path) {
    var value = lookupPath(context, path.trim());
    if (value === undefined) {
      return match;
    }
    return typeof value === 'string' ? value : JSON.stringify(value);
  };
  return template
    .replace(/\{\{([^{}]+)\}\}/g, substitute)
    .replace(/\$\{([^{}]+)\}/g, substitute);
}

function lookupPath(obj, path) {
  var parts = path.split('.');
  var current = obj;
  for (var i = 0; i < parts.length; i++) {
    if (current === null || current === undefined || typeof current !== 'object') {
      return undefined;
    }
    current = current[parts[i]];
  }
  return current;
}

/** Parse JSON, returning the raw text on failure instead of throwing. */
function safeJsonParse(text) {
  if (typeof text !== 'string') {
    return text;
  }
  try {
    return JSON.parse(text);
  } catch (e) {
    return text;
  }
}

/** A fresh correlation id for one workflow run. */
function newCorrelationId() {
  try {
    return Utilities.getUuid();
  } catch (e) {
    return 'run-' + new Date().getTime() + '-' + Math.floor(Math.random() * 100000);
  }
}

/**
 * Retry a fallible call with exponential backoff: 1s, 2s, 4s.
 * The last failure is rethrown.
 */
function retryWithBackoff(fn) {
  var attempts = 3;
  var lastErr = null;
  for (var i = 0; i < attempts; i++) {
    try {
      return fn();
    } catch (err) {
      lastErr = err;
      if (i < attempts - 1) {
        Utilities.sleep(1000 * Math.pow(2, i));
      }
    }
  }
  throw lastErr;
}
{% if include_rate_limiting %}
/**
 * Crude per-node rate limiter over the script cache. At most one call
 * per node per second; excess callers sleep until the window clears.
 */
var RateLimiter = {
  acquire: function (key) {
    var cache = CacheService.getScriptCache();
    var cacheKey = 'rl_' + key;
    for (var i = 0; i < 10; i++) {
      if (!cache.get(cacheKey)) {
        cache.put(cacheKey, '1', 1);
        return;
      }
      Utilities.sleep(1000);
    }
  }
};
{% endif %}"#;

const HTTP_CLIENT_TEMPLATE: &str = r#"/**
 * {{ project_name }} — HTTP plumbing.
 */

/**
 * Fetch with exceptions muted so status handling stays with the caller.
 * Headers are merged into the options after any auth injection.
 */
function authenticatedFetch(url, options, headers) {
  var merged = options || {};
  merged.muteHttpExceptions = true;
  merged.headers = headers || {};
  return UrlFetchApp.fetch(url, merged);
}

/** POST a JSON body; returns { code, body } with the body parsed leniently. */
function httpPostJson(url, payload, headers) {
  var response = retryWithBackoff(function () {
    return authenticatedFetch(url, {
      method: 'post',
      contentType: 'application/json',
      payload: JSON.stringify(payload)
    }, headers);
  });
  return {
    code: response.getResponseCode(),
    body: safeJsonParse(response.getContentText())
  };
}

/** GET a JSON resource; returns { code, body }. */
function httpGetJson(url, headers) {
  var response = retryWithBackoff(function () {
    return authenticatedFetch(url, { method: 'get' }, headers);
  });
  return {
    code: response.getResponseCode(),
    body: safeJsonParse(response.getContentText())
  };
}
"#;

const STORAGE_TEMPLATE: &str = r#"/**
 * {{ project_name }} — durable key/value storage over script properties.
 */

var KV_PREFIX = 'kv_';
var DEDUP_PREFIX = 'dedup_';

function kvSet(key, value) {
  PropertiesService.getScriptProperties().setProperty(KV_PREFIX + key, JSON.stringify(value));
}

function kvGet(key) {
  var raw = PropertiesService.getScriptProperties().getProperty(KV_PREFIX + key);
  return raw === null ? null : safeJsonParse(raw);
}

function kvHas(key) {
  return PropertiesService.getScriptProperties().getProperty(KV_PREFIX + key) !== null;
}

function kvRemove(key) {
  PropertiesService.getScriptProperties().deleteProperty(KV_PREFIX + key);
}

/**
 * Record a dedup key with a TTL in seconds. Expiry is checked lazily on
 * the next lookup; script properties have no native expiration.
 */
function markProcessed(key, ttlSeconds) {
  var record = { at: new Date().getTime(), ttl: ttlSeconds * 1000 };
  PropertiesService.getScriptProperties().setProperty(DEDUP_PREFIX + key, JSON.stringify(record));
}

function isProcessed(key) {
  var props = PropertiesService.getScriptProperties();
  var raw = props.getProperty(DEDUP_PREFIX + key);
  if (raw === null) {
    return false;
  }
  var record = safeJsonParse(raw);
  if (!record || typeof record.at !== 'number') {
    return false;
  }
  if (new Date().getTime() - record.at > record.ttl) {
    props.deleteProperty(DEDUP_PREFIX + key);
    return false;
  }
  return true;
}
"#;

/// Render the three support files for a compilation.
pub fn render_support_files(
    project_name: &str,
    include_rate_limiting: bool,
) -> Result<Vec<SupportFile>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("helpers", HELPERS_TEMPLATE)?;
    env.add_template("http_client", HTTP_CLIENT_TEMPLATE)?;
    env.add_template("storage", STORAGE_TEMPLATE)?;
    let vars = context! {
        project_name => project_name,
        include_rate_limiting => include_rate_limiting,
    };
    Ok(vec![
        SupportFile {
            name: "Helpers.gs",
            content: env.get_template("helpers")?.render(&vars)?,
            description: "Template resolution, retry, and correlation helpers",
        },
        SupportFile {
            name: "HttpClient.gs",
            content: env.get_template("http_client")?.render(&vars)?,
            description: "HTTP fetch wrappers with retry and lenient JSON parsing",
        },
        SupportFile {
            name: "Storage.gs",
            content: env.get_template("storage")?.render(&vars)?,
            description: "Key/value store and dedup bookkeeping over script properties",
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_files_render() {
        let files = render_support_files("Order sync", false).unwrap();
        assert_eq!(files.len(), 3);
        let names: Vec<&str> = files.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Helpers.gs", "HttpClient.gs", "Storage.gs"]);
        for file in &files {
            assert!(file.content.contains("Order sync"));
        }
    }

    #[test]
    fn test_rate_limiter_is_conditional() {
        let without = render_support_files("P", false).unwrap();
        assert!(!without[0].content.contains("RateLimiter"));
        let with = render_support_files("P", true).unwrap();
        assert!(with[0].content.contains("RateLimiter"));
        assert!(with[0].content.contains("CacheService.getScriptCache()"));
    }

    #[test]
    fn test_helpers_keep_both_placeholder_syntaxes() {
        let files = render_support_files("P", false).unwrap();
        let helpers = &files[0].content;
        assert!(helpers.contains(r"\{\{([^{}]+)\}\}"));
        assert!(helpers.contains(r"\$\{([^{}]+)\}"));
    }

    #[test]
    fn test_storage_prefixes_keys() {
        let files = render_support_files("P", false).unwrap();
        let storage = &files[2].content;
        assert!(storage.contains("var KV_PREFIX = 'kv_';"));
        assert!(storage.contains("markProcessed"));
        assert!(storage.contains("isProcessed"));
    }
}
