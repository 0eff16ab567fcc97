//! Data models for the notification pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Recipient: the incoming request and per-recipient identity data
//! - Location: normalized city / country pairs
//! - Weather: current weather snapshots

pub mod location;
pub mod recipient;
pub mod weather;

// Re-export all public types for convenient access
pub use location::ResolvedLocation;
pub use recipient::{NotificationRequest, RecipientProfile};
pub use weather::WeatherSnapshot;
