//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local stores used for development and tests
//! - **token**: bearer token signature verification
//! - **aws**: S3, DynamoDB and SNS clients (feature `aws`)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

#[cfg(feature = "aws")]
pub mod aws;
pub mod memory;
pub mod token;
