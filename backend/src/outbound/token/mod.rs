//! Token verification adapters.

mod hs256;

pub use hs256::Hs256TokenVerifier;
