//! A minimal client for the Stripe Checkout REST API.
//!
//! Only the two calls the parcel payment flow needs are supported: creating a hosted checkout session and retrieving
//! a session by id.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutSession, CustomerDetails, NewCheckoutSession, StripeErrorBody, StripeErrorResponse};
pub use error::StripeApiError;
