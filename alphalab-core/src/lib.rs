//! AlphaLab Core: price series, indicators, state-space filter, signal
//! scoring and regime classification.
//!
//! Everything here is a pure function of its inputs:
//! - Domain types (price/return series, instrument classes, weights)
//! - Indicator library (SMA, EMA, RSI, MACD, Bollinger, pivots)
//! - One-dimensional Kalman filter with incremental stepping
//! - Primary and filter-based signal scorers plus their reconciler
//! - Rolling, advanced and outlook regime classifiers, sector rotation
//! - Statistics primitives, seeded RNG hierarchy, series alignment

pub mod data;
pub mod domain;
pub mod indicators;
pub mod kalman;
pub mod regime;
pub mod rng;
pub mod signals;
pub mod stats;
