//! Data Transfer Objects for REST request/response serialization.
//!
//! Class, status, and filter fields travel as plain strings and are
//! parsed in the handlers, so a bad value surfaces as a 400 rather than
//! a deserialization error.

pub mod board_dto;
pub mod fault_dto;
pub mod vehicle_dto;

pub use board_dto::*;
pub use fault_dto::*;
pub use vehicle_dto::*;
