//! SeaORM entities for the customer book tables

pub mod contact;
pub mod customer;
pub mod staff;
