//! Domain layer for the Generations domain

pub mod entities;
pub mod notify;
pub mod workflow;
