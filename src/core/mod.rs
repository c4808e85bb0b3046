//! # Core Application Logic
//!
//! The console session's decision-making. It knows nothing about terminals
//! and performs no I/O of its own.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (selection)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • availability rules   │
//!                    └───────────┬─────────────┘
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              ▼                                   ▼
//!       ┌────────────┐                      ┌────────────┐
//!       │  Console   │                      │  Library   │
//!       │  Adapter   │ ── Effect → call ──▶ │ repos and  │
//!       │ (stdin/out)│ ◀─ result → Action ─ │  services  │
//!       └────────────┘                      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the `Screen` it is on
//! - [`action`]: The `Action` enum and the `update()` transition function
//! - [`options`]: Named commands a screen offers
//! - [`availability`]: Title matching and copy availability
//! - [`inventory`]: Collection reads with source fallback
//! - [`config`]: Layered settings

pub mod action;
pub mod availability;
pub mod config;
pub mod inventory;
pub mod options;
pub mod state;
