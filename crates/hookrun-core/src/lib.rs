//! Trigger verification and script dispatch logic for hookrun.
//!
//! This crate defines the "ports" (the command runner and output sink
//! traits) that the infrastructure layer implements. It depends only on
//! `hookrun-types` -- never on `hookrun-infra` or any process/IO crate
//! beyond the tokio task spawner.

pub mod dispatch;
pub mod password;
pub mod runner;
pub mod signature;
