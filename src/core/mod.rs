//! # Core Navigation Logic
//!
//! Everything that decides what is on screen. It knows nothing about any
//! specific UI technology or about how bytes reach it.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • NavigationEngine     │
//!                    │  • Action (events)      │
//!                    │  • Effect (requests)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │  ◀── Action channel ──   │  Runtime   │
//!     │  Adapter   │  ── Effects ──────────▶  │  (tokio)   │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: `NavigationEngine`, the reducer that owns all navigation state
//! - [`action`]: `Action` in, `Effect` out
//! - [`stack`]: the screen stack and its transition protocol
//! - [`overlay`]: the debounced loading overlay
//! - [`dialog`]: error dialogs and their buttons
//! - [`screen`]: the `Screen` trait every template implements
//! - [`templates`]: template name → screen constructor
//! - [`document`]: wire types for Crex action documents
//! - [`fingerprint`]: content change detection
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod dialog;
pub mod document;
pub mod engine;
pub mod fingerprint;
pub mod overlay;
pub mod screen;
pub mod stack;
pub mod templates;
