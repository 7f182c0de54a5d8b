//! AI health assistant service.
//!
//! Exposes a small HTTP API that turns a described condition into a
//! plain-language explanation, care advice and a department recommendation
//! using three completions from an LLM provider.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod prompts;
pub mod services;
pub mod startup;
