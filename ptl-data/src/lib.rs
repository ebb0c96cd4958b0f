//! Derived views over normalized plant telemetry.
//!
//! Transforms a flat record list into the structures the display layer
//! consumes: the Day → Hour drill-down tree, fixed-resolution chart series,
//! and global per-channel statistics.

pub mod grouping;
pub mod series;
pub mod statistics;
