//! Career pathway guidance engine.
//!
//! Filters a career catalog against a learner's academic profile through a
//! fixed set of eligibility gates, then ranks university programs and
//! bursaries for the careers that survive.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
