//! Fixed-point arithmetic core for FM synthesis.
//!
//! [`tables`] holds the audio-rate table engine; [`params`] holds the
//! patch-load-time decode curves.

pub mod params;
pub mod tables;
