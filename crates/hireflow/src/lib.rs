//! Core library for the recruitment workflow orchestrator.
//!
//! The interesting behavior lives under [`workflows::recruitment`]: a
//! single-session candidate application state machine, the screening test
//! engine, the role/question and analytics stores, and the gateway seams for
//! the external scoring, notification, and scheduling collaborators.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
