//! Extractors whose rejections speak the API's error format
//!
//! The stock axum extractors reject with plain-text bodies; these wrappers
//! route every rejection through [`ApiError`] so malformed JSON, bad query
//! strings, and unparseable path parameters all come back as
//! `{"error": ...}` with the right status code.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
