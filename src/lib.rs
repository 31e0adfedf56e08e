//! Request-time authorizer for Basic-auth gateway calls.
//!
//! The [`authz::Authorizer`] decodes the caller's credentials, loads the
//! caller's record from a hierarchical secret store, checks the password, and
//! compiles the caller's whitelist into a policy scoped to the API stage of the
//! current call. Every denial reaches the caller as the same opaque rejection.

pub mod authz;
pub mod cmd;
pub mod config;
pub mod logs;
pub mod server;
pub mod store;
pub mod types;
