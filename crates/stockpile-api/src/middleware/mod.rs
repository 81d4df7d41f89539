//! # Middleware
//!
//! Request metrics, trace spans, panic recovery and non-production fault
//! detail exposure.

pub mod fault_detail;
pub mod metrics;
pub mod panic;
pub mod tracing_layer;
