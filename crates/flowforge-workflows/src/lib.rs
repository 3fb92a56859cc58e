// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! FlowForge Workflows - Graph Compilation to Script Bundles
//!
//! This crate compiles validated workflow graphs (DSL) into bundles of
//! JavaScript source files for a hosted scripting runtime. A bundle is
//! self-contained: entry file, support libraries, trigger installer,
//! project manifest, and a deployment guide.
//!
//! # Architecture
//!
//! ```text
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │   Graph     │      │  Code units │      │   Script    │
//!     │   (JSON)    │─────▶│  (codegen)  │─────▶│   Bundle    │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!           │                     │                    │
//!           ▼                     ▼                    ▼
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │ Topological │      │  Injection  │      │  Manifest + │
//!     │    order    │      │    slots    │      │  deploy doc │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Gate**: Reject graphs whose validation verdict is negative
//! 2. **Order**: Topologically sort nodes, detecting cycles
//! 3. **Generate**: Emit one `execute_<id>` function per node, filling
//!    injection slots (auth, rate limiting, dedup) per node config
//! 4. **Assemble**: Entry file, support files, trigger installer
//! 5. **Describe**: Manifest with required OAuth scopes, deployment guide
//!
//! # Usage
//!
//! ```ignore
//! let input = CompilationInput { graph, options, validation };
//! let result = compile(&input);
//! assert!(result.success);
//! ```

pub mod codegen;
pub mod compile;
pub mod docs;
pub mod helpers;
pub mod inject;
pub mod installer;
pub mod manifest;
pub mod placeholder;
pub mod topo;

pub use compile::{
    CompilationInput, CompileError, CompiledFile, CompilerOptions, CompilerResult, FileKind,
    compile,
};
pub use flowforge_dsl::{Graph, ValidationReport};
pub use inject::{InjectionKind, InjectionParams, inject};
pub use manifest::Manifest;
pub use topo::{CycleError, execution_order};
