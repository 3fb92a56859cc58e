// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action node emitters.
//!
//! Actions perform the outward-facing work of a run: HTTP calls, mail,
//! spreadsheet rows, calendar events, chat messages. Outbound calls carry a
//! rate-limit slot; connector-backed calls carry an auth slot.

use flowforge_dsl::Node;

use super::super::builder::{CodeUnit, js_string};
use super::super::context::EmitContext;
use super::{close_function, json_expr, open_function, template_expr};
use crate::inject::InjectionKind;

/// Emit `action.http.request`: outbound call through the retry helper.
pub fn emit_http_request(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.slot(InjectionKind::RateLimit, "  ");

    unit.line(format!("  var url = {};", template_expr(node, "url", "")));
    let method = node
        .data_str("method")
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "get".to_string());
    unit.line(format!("  var method = {};", js_string(&method)));

    match json_expr(node, "headers") {
        Some(expr) => unit.line(format!("  var headers = {} || {{}};", expr)),
        None => unit.line("  var headers = {};"),
    };
    unit.slot(InjectionKind::Auth, "  ");

    match json_expr(node, "body") {
        Some(expr) => unit.line(format!("  var payload = {};", expr)),
        None => unit.line("  var payload = null;"),
    };

    unit.line("  var response = retryWithBackoff(function () {");
    unit.line("    return authenticatedFetch(url, {");
    unit.line("      method: method,");
    unit.line("      payload: payload === null ? null : JSON.stringify(payload),");
    unit.line("      contentType: 'application/json'");
    unit.line("    }, headers);");
    unit.line("  });");
    unit.line("  var code = response.getResponseCode();");
    unit.line("  if (code >= 400) {");
    unit.line("    throw new Error('HTTP ' + code + ' from ' + url);");
    unit.line("  }");
    unit.line("  return {");
    unit.line("    type: 'action.http.request',");
    unit.line("    status: 'completed',");
    unit.line("    code: code,");
    unit.line("    body: safeJsonParse(response.getContentText())");
    unit.line("  };");
    close_function(&mut unit);
    unit
}

/// Emit `action.mail.send`.
pub fn emit_mail_send(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.line(format!("  var to = {};", template_expr(node, "to", "")));
    unit.line(format!(
        "  var subject = {};",
        template_expr(node, "subject", "Workflow notification")
    ));
    unit.line(format!("  var body = {};", template_expr(node, "body", "")));
    unit.line("  MailApp.sendEmail({ to: to, subject: subject, body: body });");
    unit.line("  return { type: 'action.mail.send', status: 'sent', to: to };");
    close_function(&mut unit);
    unit
}

/// Emit `action.sheet.append`: one row appended per run.
pub fn emit_sheet_append(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    let spreadsheet_id = node.data_str("spreadsheetId").unwrap_or("");
    let sheet_name = node.data_str("sheetName").unwrap_or("Sheet1");
    unit.line(format!("  var spreadsheetId = {};", js_string(spreadsheet_id)));
    unit.line(format!("  var sheetName = {};", js_string(sheet_name)));

    let columns: Vec<String> = node
        .data
        .get("columns")
        .and_then(|v| v.as_array())
        .map(|cols| {
            cols.iter()
                .filter_map(|c| c.as_str())
                .map(|tpl| super::template_expr_raw(node, tpl))
                .collect()
        })
        .unwrap_or_default();
    if columns.is_empty() {
        unit.line("  var row = [new Date().toISOString()];");
    } else {
        unit.line("  var row = [");
        for (i, expr) in columns.iter().enumerate() {
            let comma = if i + 1 < columns.len() { "," } else { "" };
            unit.line(format!("    {}{}", expr, comma));
        }
        unit.line("  ];");
    }
    unit.line("  var sheet = SpreadsheetApp.openById(spreadsheetId).getSheetByName(sheetName);");
    unit.line("  if (!sheet) {");
    unit.line("    throw new Error('Sheet not found: ' + sheetName);");
    unit.line("  }");
    unit.line("  sheet.appendRow(row);");
    unit.line("  return { type: 'action.sheet.append', status: 'created', columns: row.length };");
    close_function(&mut unit);
    unit
}

/// Emit `action.calendar.create`: event on the default calendar.
pub fn emit_calendar_create(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.line(format!(
        "  var title = {};",
        template_expr(node, "title", "Workflow event")
    ));
    unit.line(format!(
        "  var start = new Date({});",
        template_expr(node, "start", "{{triggerData.start}}")
    ));
    if node.data_str("end").is_some() {
        unit.line(format!(
            "  var end = new Date({});",
            template_expr(node, "end", "")
        ));
    } else {
        // No configured end: default to one hour.
        unit.line("  var end = new Date(start.getTime() + 3600000);");
    }
    unit.line("  var event = CalendarApp.getDefaultCalendar().createEvent(title, start, end);");
    unit.line("  return {");
    unit.line("    type: 'action.calendar.create',");
    unit.line("    status: 'created',");
    unit.line("    eventId: event.getId(),");
    unit.line("    title: title");
    unit.line("  };");
    close_function(&mut unit);
    unit
}

/// Emit `action.chat.post`: connector-authenticated JSON post.
pub fn emit_chat_post(node: &Node, _ctx: &EmitContext) -> CodeUnit {
    let mut unit = CodeUnit::new();
    open_function(&mut unit, node);
    unit.slot(InjectionKind::RateLimit, "  ");

    let default_url = node
        .connector()
        .and_then(|c| c.base_url)
        .unwrap_or_default();
    let url_template = node.data_str("webhookUrl").unwrap_or(&default_url);
    unit.line(format!(
        "  var url = {};",
        super::template_expr_raw(node, url_template)
    ));
    unit.line(format!("  var message = {};", template_expr(node, "text", "")));
    unit.line("  var headers = {};");
    unit.slot(InjectionKind::Auth, "  ");
    unit.line("  var response = httpPostJson(url, { text: message }, headers);");
    unit.line("  if (response.code >= 400) {");
    unit.line("    throw new Error('Chat post failed with HTTP ' + response.code);");
    unit.line("  }");
    unit.line("  return { type: 'action.chat.post', status: 'sent', code: response.code };");
    close_function(&mut unit);
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::nodes::synthesize;
    use crate::compile::CompilerOptions;

    fn render(json: serde_json::Value) -> String {
        let node: Node = serde_json::from_value(json).unwrap();
        let options = CompilerOptions::default();
        let ctx = EmitContext::new(&options);
        synthesize(&node, &ctx)
    }

    #[test]
    fn test_http_request_embeds_config() {
        let code = render(serde_json::json!({
            "id": "a1",
            "type": "action.http.request",
            "data": {"url": "https://api.example.com/orders", "method": "POST", "body": {"limit": 10}}
        }));
        assert!(code.contains("resolveTemplate('https://api.example.com/orders', context)"));
        assert!(code.contains("var method = 'post';"));
        assert!(code.contains("retryWithBackoff"));
        assert!(code.contains(r#"safeJsonParse(resolveTemplate('{"limit":10}', context))"#));
        assert!(code.contains("status: 'completed',"));
    }

    #[test]
    fn test_http_request_throws_on_4xx() {
        let code = render(serde_json::json!({
            "id": "a1",
            "type": "action.http.request",
            "data": {"url": "https://x"}
        }));
        assert!(code.contains("if (code >= 400)"));
        assert!(code.contains("throw new Error('HTTP '"));
    }

    #[test]
    fn test_mail_send() {
        let code = render(serde_json::json!({
            "id": "m1",
            "type": "action.mail.send",
            "data": {"to": "ops@example.com", "subject": "Hi {{triggerData.name}}"}
        }));
        assert!(code.contains("MailApp.sendEmail"));
        assert!(code.contains("Hi {{triggerData.name}}"));
        assert!(code.contains("status: 'sent'"));
    }

    #[test]
    fn test_sheet_append_with_columns() {
        let code = render(serde_json::json!({
            "id": "s1",
            "type": "action.sheet.append",
            "data": {
                "spreadsheetId": "abc123",
                "sheetName": "Orders",
                "columns": ["{{results.t1.data.id}}", "{{results.t1.data.total}}"]
            }
        }));
        assert!(code.contains("var spreadsheetId = 'abc123';"));
        assert!(code.contains("getSheetByName(sheetName)"));
        assert!(code.contains("{{results.t1.data.id}}"));
        assert!(code.contains("appendRow(row)"));
    }

    #[test]
    fn test_sheet_append_default_row() {
        let code = render(serde_json::json!({
            "id": "s1",
            "type": "action.sheet.append",
            "data": {"spreadsheetId": "abc123"}
        }));
        assert!(code.contains("var row = [new Date().toISOString()];"));
    }

    #[test]
    fn test_calendar_create_defaults_end() {
        let code = render(serde_json::json!({
            "id": "c1",
            "type": "action.calendar.create",
            "data": {"title": "Standup", "start": "2026-09-01T09:00:00Z"}
        }));
        assert!(code.contains("createEvent(title, start, end)"));
        assert!(code.contains("start.getTime() + 3600000"));
    }

    #[test]
    fn test_chat_post_with_connector_auth() {
        let code = render(serde_json::json!({
            "id": "p1",
            "type": "action.chat.post",
            "data": {
                "text": "deploy done",
                "webhookUrl": "https://chat.example.com/hook",
                "connector": {"slug": "slack", "auth": "bearer"}
            }
        }));
        assert!(code.contains("httpPostJson"));
        assert!(code.contains("SLACK_BEARER_TOKEN"));
        assert!(!code.contains("// @inject:auth"));
    }
}
