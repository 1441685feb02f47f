//! Database models (SQLx).

pub mod announcement;
pub mod article;
pub mod category;
pub mod edition;
