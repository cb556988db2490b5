//! HTTP route handlers, one module per resource.

pub mod health;
pub mod storage_token;
pub mod stories;
pub mod story;
pub mod wordbank;
