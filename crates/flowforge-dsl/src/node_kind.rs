// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Closed node capability catalog.
//!
//! Every supported dotted capability tag maps to exactly one [`NodeKind`]
//! variant; the compiler dispatches code synthesis on this enum. Tags outside
//! the catalog land in [`NodeKind::Unknown`] carrying the raw string, so an
//! unimplemented capability degrades to a stub instead of failing compilation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The closed set of node capabilities the compiler can synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `trigger.time.cron` - fires on a cron-style schedule.
    TriggerTimeCron,
    /// `trigger.time.interval` - fires every N minutes.
    TriggerTimeInterval,
    /// `trigger.webhook.inbound` - fires on an inbound HTTP request.
    TriggerWebhookInbound,
    /// `action.http.request` - arbitrary outbound HTTP call.
    ActionHttpRequest,
    /// `action.mail.send` - send an email.
    ActionMailSend,
    /// `action.sheet.append` - append a row to a spreadsheet.
    ActionSheetAppend,
    /// `action.calendar.create` - create a calendar event.
    ActionCalendarCreate,
    /// `action.chat.post` - post a message through a chat connector.
    ActionChatPost,
    /// `condition.filter` - evaluate a filter expression over the context.
    ConditionFilter,
    /// `transform.map` - remap fields from upstream results.
    TransformMap,
    /// `transform.template` - render a text template.
    TransformTemplate,
    /// `utility.delay` - sleep for a configured number of seconds.
    UtilityDelay,
    /// `utility.log` - write a message to the execution log.
    UtilityLog,
    /// Any tag outside the catalog; carries the raw tag string.
    Unknown(String),
}

impl NodeKind {
    /// Parse a dotted capability tag into the catalog.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "trigger.time.cron" => NodeKind::TriggerTimeCron,
            "trigger.time.interval" => NodeKind::TriggerTimeInterval,
            "trigger.webhook.inbound" => NodeKind::TriggerWebhookInbound,
            "action.http.request" => NodeKind::ActionHttpRequest,
            "action.mail.send" => NodeKind::ActionMailSend,
            "action.sheet.append" => NodeKind::ActionSheetAppend,
            "action.calendar.create" => NodeKind::ActionCalendarCreate,
            "action.chat.post" => NodeKind::ActionChatPost,
            "condition.filter" => NodeKind::ConditionFilter,
            "transform.map" => NodeKind::TransformMap,
            "transform.template" => NodeKind::TransformTemplate,
            "utility.delay" => NodeKind::UtilityDelay,
            "utility.log" => NodeKind::UtilityLog,
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    /// The dotted capability tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::TriggerTimeCron => "trigger.time.cron",
            NodeKind::TriggerTimeInterval => "trigger.time.interval",
            NodeKind::TriggerWebhookInbound => "trigger.webhook.inbound",
            NodeKind::ActionHttpRequest => "action.http.request",
            NodeKind::ActionMailSend => "action.mail.send",
            NodeKind::ActionSheetAppend => "action.sheet.append",
            NodeKind::ActionCalendarCreate => "action.calendar.create",
            NodeKind::ActionChatPost => "action.chat.post",
            NodeKind::ConditionFilter => "condition.filter",
            NodeKind::TransformMap => "transform.map",
            NodeKind::TransformTemplate => "transform.template",
            NodeKind::UtilityDelay => "utility.delay",
            NodeKind::UtilityLog => "utility.log",
            NodeKind::Unknown(tag) => tag,
        }
    }

    /// Whether this kind is a trigger (entry point for a run).
    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            NodeKind::TriggerTimeCron
                | NodeKind::TriggerTimeInterval
                | NodeKind::TriggerWebhookInbound
        )
    }

    /// The run status a successful execution of this kind reports.
    pub fn success_status(&self) -> RunStatus {
        match self {
            NodeKind::TriggerTimeCron
            | NodeKind::TriggerTimeInterval
            | NodeKind::TriggerWebhookInbound => RunStatus::Triggered,
            NodeKind::ActionMailSend | NodeKind::ActionChatPost => RunStatus::Sent,
            NodeKind::ActionSheetAppend | NodeKind::ActionCalendarCreate => RunStatus::Created,
            NodeKind::ActionHttpRequest | NodeKind::UtilityDelay | NodeKind::UtilityLog => {
                RunStatus::Completed
            }
            NodeKind::ConditionFilter => RunStatus::Evaluated,
            NodeKind::TransformMap | NodeKind::TransformTemplate => RunStatus::Transformed,
            NodeKind::Unknown(_) => RunStatus::Skipped,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Uniform status tag every generated node function reports in its result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    /// A trigger node fired.
    Triggered,
    /// A generic action finished.
    Completed,
    /// A message or mail was sent.
    Sent,
    /// A record, row or event was created.
    Created,
    /// A condition was evaluated.
    Evaluated,
    /// Data was transformed.
    Transformed,
    /// The node was skipped (unknown capability).
    Skipped,
}
