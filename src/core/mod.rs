//! Configuration and the data types shared across the pipeline

pub mod config;
pub mod models;
