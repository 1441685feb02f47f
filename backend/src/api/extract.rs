//! Request extractors that reject with [`AppError`] instead of axum's
//! plain-text rejections.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body whose rejections render through the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
