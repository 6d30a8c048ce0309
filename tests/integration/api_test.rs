//! HTTP API integration tests
//!
//! Every test runs the full router in-process with mock providers, so
//! the exact same code paths execute as in production minus the
//! network hops to the managed services.

mod common;

mod accounts;
mod generations;
