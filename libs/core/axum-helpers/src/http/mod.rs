//! HTTP middleware shared by every route of the JSON surface.

mod access_log;
mod cors;

pub use access_log::{ACCESS_LOG_MESSAGE, access_log};
pub use cors::gateway_cors_layer;
