//! # Notezy Architecture
//!
//! Notezy is a **UI-agnostic personal notes library** with a thin CLI on top.
//! Each signed-in user sees a live list of their own notes: the store pushes
//! a full snapshot whenever a matching document changes, and a view-model
//! turns those pushes into a canonical list plus a filtered display list.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, parses note selectors         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  View-Model (viewmodel/)                                    │
//! │  - One live subscription per session                        │
//! │  - Canonical list, filter, display list, local edits        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage + Session (store/, session/)                       │
//! │  - DocumentStore and SessionProvider traits                 │
//! │  - File backends (production), in-memory (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types.
//! It never writes to stdout/stderr and never exits the process. Diagnostics
//! go through `tracing`; only the binary installs a subscriber (see
//! [`logging`]).
//!
//! ## Testing
//!
//! 1. **View-model** (`viewmodel/tests.rs`): driven by
//!    [`test_utils::ScriptedStore`], which delivers snapshots only when a
//!    test says so. This is where subscription lifecycle and filtering are
//!    pinned down.
//! 2. **Commands** (`commands/*.rs`): against the in-memory store and
//!    session provider.
//! 3. **Stores** (`store/*.rs`, `session/*.rs`): each backend on its own.
//! 4. **CLI** (`tests/`): the binary end to end against a temporary home.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per user-facing operation
//! - [`viewmodel`]: The note sync view-model
//! - [`store`]: Document store trait, subscriptions, backends
//! - [`session`]: Session provider trait, password hashing, backends
//! - [`model`]: Core data types (`Note`, `Identity`, `UserProfile`)
//! - [`index`]: Display indexes and note selectors
//! - [`config`]: Configuration management
//! - [`logging`]: Tracing setup for the binary
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod viewmodel;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
