// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Code generation for workflow compilation.
//!
//! Each node capability has its own emitter producing a [`builder::CodeUnit`]
//! for that node's `execute_<id>` function. Units are built from literal
//! statements and named injection slots, then rendered with the slot fills
//! appropriate to the node and compilation options.

pub mod builder;
pub mod context;
pub mod nodes;
pub mod program;

pub use builder::{CodeUnit, SlotFills};
pub use context::EmitContext;
