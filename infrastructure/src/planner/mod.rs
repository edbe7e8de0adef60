//! Planner adapters.

pub mod oracle_planner;
