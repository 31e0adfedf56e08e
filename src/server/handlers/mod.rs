pub mod authorize;
pub mod healthz;
