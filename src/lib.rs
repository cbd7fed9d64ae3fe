//! Draft preparation core: team-history ingestion, tiered caching, and a
//! pure pick/ban recommendation engine.

pub mod aggregator;
pub mod cache;
pub mod champions;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod jobs;
pub mod models;
pub mod provider;
pub mod service;
