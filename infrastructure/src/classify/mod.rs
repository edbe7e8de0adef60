//! Classifier adapters.

pub mod keyword;
