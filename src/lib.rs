//! Fixed-point table engine for FM synthesis.
//!
//! Every transcendental operation an FM synthesizer needs at audio rate
//! (logarithmic sine, exponential decompression, log-domain envelope
//! combination, logarithmic pitch scaling) is served from five immutable
//! integer tables built once from the sample rate. Magnitudes live in log
//! domain so gains combine by addition, and a 16384-entry antilog table plus
//! a binary-exponent shift reconstructs linear magnitude over an effectively
//! unbounded dynamic range.
//!
//! The [`Tables`] value is the engine; [`fm::params`] converts hardware-style
//! patch controls into engine units at load time, and [`import`] decodes
//! binary patch banks into canonical records.

#![warn(missing_docs)]

pub mod fm;
pub mod import;

pub use fm::tables::{Tables, EG_MAX, EG_MID, EG_MIN, MIDDLE_C, OCTAVE};
