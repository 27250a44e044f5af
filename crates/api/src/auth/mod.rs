//! Bearer-token authentication.

pub mod jwt;
