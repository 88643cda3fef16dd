//! Showcase Core - Shared catalog types.
//!
//! This crate provides the data model shared by every Showcase component:
//! - `sync` - Remote document store client, local cache, and sync orchestration
//! - `cli` - Command-line surface for visitors and the admin editor
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no persistence. The JSON shape of [`AppData`] is the exact shape
//! stored in the remote document and in the local cache.
//!
//! # Modules
//!
//! - [`types`] - Products, case studies, the catalog document, and cloud settings
//! - [`defaults`] - The built-in catalog used before any data has been loaded
//! - [`import`] - Validation for bulk JSON imports from the admin editor

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod defaults;
pub mod import;
pub mod types;

pub use import::ImportError;
pub use types::*;
