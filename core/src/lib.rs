//! Core of the AML risk assessment tool.
//!
//! Two independent pieces live here:
//!   - the assessment: risk factors, the scoring engine, and the
//!     in-memory session that mutates them
//!   - the build-time CDN rewriter for public image references

pub mod asset_plugin;
pub mod assessment;
pub mod cdn_rewriter;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod factor;
pub mod image_index;
pub mod scoring;
pub mod types;
