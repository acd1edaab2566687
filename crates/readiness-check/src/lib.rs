//! Self-service AI readiness assessment: scoring, PDF reporting, and result persistence.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod theme;
pub mod workflows;
