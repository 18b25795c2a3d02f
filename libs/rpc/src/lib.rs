//! Generated protobuf and gRPC code.
//!
//! Sources live in `proto/`. Messages carry `serde` and `utoipa` derives so
//! the HTTP gateway can speak JSON with the proto field names.

mod gen;

pub use gen::customer;
