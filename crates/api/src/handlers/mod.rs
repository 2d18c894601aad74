//! HTTP request handlers.

pub mod locks;
pub mod presence;
