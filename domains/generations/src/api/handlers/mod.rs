//! HTTP handlers for the Generations domain

pub mod generations;
pub mod history;
pub mod prompts;
