//! Zaitun - Backend Library
//!
//! Content management backend for the Zaitun digital magazine: editions,
//! articles, cover images and announcements.

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
