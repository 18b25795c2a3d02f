//! Server-side tower layers applied to every gRPC call.

mod logging;

pub use logging::{CodeToLevel, GrpcLogging, GrpcLoggingLayer, conventional_level, default_level};
