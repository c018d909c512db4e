// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod summary;
pub use crate::core::engine::{run, ConverterEngine};
pub use crate::error::ConvertError;
