//! Request handlers, one file per operation
//!
//! Each handler translates its request into engine calls and serializes the
//! response; no scheduling logic lives here.

pub mod batch;
pub mod config;
pub mod health;
pub mod optimal_time;
pub mod retention;
pub mod schedule;
