//! Core types for the Autumn billing API.
//!
//! This crate provides the wire-independent types shared by the client SDK
//! and the command-line tool:
//!
//! - **Identifiers**: `CustomerId`
//! - **Customers**: `Customer`, `CustomerProduct`, `CustomerFeature`
//! - **Requests**: `CustomerData`, `CreateCustomerParams`, `UpdateCustomerParams`,
//!   `ListCustomersParams`, `CustomerExpand`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod error;
pub mod ids;

pub use customer::{
    CreateCustomerParams, Customer, CustomerData, CustomerExpand, CustomerFeature, CustomerList,
    CustomerProduct, Environment, ListCustomersParams, ProductStatus, UpdateCustomerParams,
    MAX_LIST_LIMIT,
};
pub use error::{CoreError, Result};
pub use ids::{CustomerId, IdError, MAX_ID_LEN};
