//! HTTP request handlers.
//!
//! Reader-facing handlers serve published content only; the admin handlers
//! mounted under `/api/core` drive the editorial lifecycle.

pub mod admin_articles;
pub mod admin_editions;
pub mod announcements;
pub mod articles;
pub mod categories;
pub mod covers;
pub mod editions;
pub mod health;
pub mod images;
pub mod writers;
