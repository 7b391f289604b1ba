//! Sizing API service
//!
//! Exposes the collector sizing engine over HTTP together with its
//! reference data, health probes and Prometheus metrics.

pub mod api;
pub mod catalogue;
pub mod config;
