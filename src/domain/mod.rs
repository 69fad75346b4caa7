//! Core domain types and logic.

pub mod ohlcv;
pub mod response_repair;
pub mod indicator;
pub mod indicator_frame;
pub mod settings;
pub mod config_validation;
pub mod error;
