//! Shared utilities for the Rogue AI client workspace.

pub mod logger;
pub mod time;
