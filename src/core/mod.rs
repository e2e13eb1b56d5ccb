//! Services exposed to the request-handling layer.

pub mod services;
