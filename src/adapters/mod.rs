//! Adapter implementations for port traits.
//!
//! - `live/` — Real provider API implementations

pub mod live;
