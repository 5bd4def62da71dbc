//! Autumn Client SDK.
//!
//! This crate provides an async client for the Autumn billing API.
//!
//! # Example
//!
//! ```no_run
//! use autumn_client::{AutumnClient, CustomerData, CustomerId};
//!
//! # async fn example() -> Result<(), autumn_client::ClientError> {
//! // Reads AUTUMN_SECRET_KEY (and optional AUTUMN_BASE_URL) from the environment.
//! let client = AutumnClient::from_env()?;
//!
//! let id = CustomerId::new("user_123")?;
//! let outcome = client
//!     .customers()
//!     .get_or_create(&id, Some(CustomerData::default().with_email("ada@example.com")))
//!     .await?;
//!
//! println!("{} (created: {})", outcome.customer.display_name(), outcome.created);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod customers;
mod error;

pub use client::AutumnClient;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, ENV_API_VERSION, ENV_BASE_URL,
    ENV_SECRET_KEY, ENV_TIMEOUT_SECONDS,
};
pub use customers::{Customers, GetOrCreate};
pub use error::ClientError;

pub use autumn_core::{
    CreateCustomerParams, Customer, CustomerData, CustomerExpand, CustomerFeature, CustomerId,
    CustomerList, CustomerProduct, Environment, IdError, ListCustomersParams, ProductStatus,
    UpdateCustomerParams,
};
