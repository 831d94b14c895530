//! # Zap Shift server
//! This module hosts the HTTP server for Zap Shift parcel payments. It is responsible for:
//! Booking and listing parcels.
//! Opening Stripe checkout sessions for parcels.
//! Reconciling completed checkout sessions into payment records and tracking ids, exactly once per transaction.
//! Serving payment history to verified users.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/users`, `/parcels`: Users and parcel bookings.
//! * `/payment-checkout-session`: Opens a hosted checkout session.
//! * `/payment-success`: Reconciles a checkout session. Idempotent.
//! * `/payments`: Payment history. Requires a bearer credential.

pub mod audit_worker;
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
