//! Synthetic data generation.

pub mod trade_generator;
