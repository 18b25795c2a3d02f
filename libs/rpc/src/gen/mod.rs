// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod customer {
    include!("customer.v1.rs");
    // customer.v1.tonic.rs is auto-included by customer.v1.rs
}
