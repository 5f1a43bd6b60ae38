//! Alertgate - a rate-limited alert dispatcher for Feishu webhooks
//!
//! This library forwards business alerts and panic reports to a Feishu
//! group-chat webhook, suppressing repeats that share a throttle key
//! within a fixed cooldown window.

pub mod collector;
pub mod config;
pub mod core;
pub mod formatting;
pub mod notification;

// Re-export core types for convenience
pub use crate::core::*;
