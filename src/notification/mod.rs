//! Delivery of rendered alert messages to chat webhooks.
//!
//! The collectors in [`crate::collector`] talk to the webhook through the
//! client trait defined here, so delivery can be swapped out in tests.
pub mod feishu;
