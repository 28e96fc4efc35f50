//! Live adapters that call the real provider APIs.

pub mod fal;
pub mod openai;
