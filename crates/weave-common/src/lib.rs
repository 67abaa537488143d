//! Common utilities for the weave markup engine.
//!
//! This crate provides shared infrastructure used by the parser and the CLI:
//! - **Warning System** - deduplicated warnings routed through `tracing`

pub mod warning;
