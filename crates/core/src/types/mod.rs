//! Core types for Showcase.
//!
//! This module provides the catalog data model and the settings that point
//! a client at the remote document store.

pub mod case_study;
mod de;
pub mod document;
pub mod id;
pub mod product;
pub mod settings;

pub use case_study::CaseStudy;
pub use document::AppData;
pub use id::*;
pub use product::{Product, ProductCategory};
pub use settings::CloudSettings;
