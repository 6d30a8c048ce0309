//! HTTP handlers for the Accounts domain

pub mod accounts;
