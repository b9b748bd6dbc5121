//! Command implementations

pub mod collect;
pub mod completions;
pub mod config;
pub mod list;
pub mod normalize;
pub mod resolve;
