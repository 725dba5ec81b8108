#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory filter engine and aggregator over building records.
//!
//! Both halves are pure: they read a borrowed record slice (usually the
//! immutable base dataset) and return freshly built values. Nothing here
//! keeps state between calls.

pub mod filter;
pub mod summary;

pub use filter::{apply, matches, retrofit_candidates};
pub use summary::{headline, insights, summarize, top_property_types};
