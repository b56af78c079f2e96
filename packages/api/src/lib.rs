//! # API crate: authentication core for the dashboard
//!
//! Everything the web front needs to decide who a request belongs to and where it
//! may go. Nothing in here knows about HTTP servers or cookies; the `web` crate
//! wires these pieces into axum.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Credential exchange with the REST backend, session token mint/verify, the route authorization gate, password recovery |
//! | [`crypto`] | AES-256-GCM sealing of session payloads under a key derived from the signing secret |
//! | [`models`] | [`Identity`], [`Role`] and [`Avatar`] |
//!
//! ## Flow
//!
//! - [`auth::CredentialExchange::authenticate`] turns a login form into an [`Identity`].
//! - [`auth::SessionCodec::mint`] seals it into the cookie value;
//!   [`auth::SessionCodec::verify`] reverses that on every request.
//! - [`auth::RouteGate::evaluate`] maps `(path, Option<Identity>)` to allow or redirect.

pub mod auth;
pub mod crypto;
pub mod models;

pub use models::{Avatar, Identity, Role};
