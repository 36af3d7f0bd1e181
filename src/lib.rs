//! Script dependency resolution host
//!
//! Host-side plumbing for the script dependencies resolver protocol
//! defined in `script-deps`:
//!
//! - **Registry**: map script kinds to resolver implementations, with a
//!   no-op fallback for everything unregistered
//! - **Driving**: invoke a resolver and settle its synchronous or async
//!   outcome behind one blocking call
//! - **Report capture**: collect resolver diagnostics per call and
//!   forward them to `tracing`
//! - **Bridges**: adapt async/await resolvers in, and the legacy
//!   blocking-future surface out
//!
//! See [`harness`] for the one-call entry point and [`driver`] for the
//! underlying protocol mechanics.

#![allow(clippy::type_complexity)]

pub mod async_resolver;
pub mod driver;
pub mod env_utils;
pub mod harness;
pub mod legacy;
pub mod registry;
pub mod reports;
pub mod resolvers;
