//! Core types and parsing for plant field telemetry.
//!
//! Normalizes irregular delimited sensor exports (temperature, humidity,
//! light, soil moisture) into canonical [`record::PlantRecord`] values and
//! resolves their timestamps against one fixed IANA timezone.

pub mod error;
pub mod local_time;
pub mod parse;
pub mod record;
