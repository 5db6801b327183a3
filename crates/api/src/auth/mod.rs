//! Token-based authentication.
//!
//! Heart Link does not issue credentials; it validates HS256 access tokens
//! minted by the host application.

pub mod jwt;
