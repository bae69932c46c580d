//! Safety score and risk classification engine behind the EHS reporting portal.
//!
//! Monthly safety-activity reports come in through a [`analytics::MetricSource`];
//! everything under [`analytics`] is a pure projection of that snapshot.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod telemetry;
