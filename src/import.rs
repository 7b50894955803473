//! Binary patch import.
//!
//! Decoders turn hardware-native patch bytes into canonical [`Patch`]
//! records at load time. Each supported format is one [`PatchDecoder`]
//! implementation; the records carry envelope settings already converted to
//! engine-native units through the [`crate::fm::params`] curves, so nothing
//! downstream touches the 0-99 hardware domain again. This layer faces
//! untrusted file bytes and is the only part of the crate that validates
//! anything.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::fm::params::{duration_param, level_param, pitch_param};

/// Yamaha bulk-dump constants
const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
const YAMAHA_ID: u8 = 0x43;
const FORMAT_32_VOICES: u8 = 0x09;

/// Packed size of one voice inside a 32-voice bank
pub const PACKED_VOICE_SIZE: usize = 128;

/// Number of voices in a bank dump
pub const BANK_VOICES: usize = 32;

/// Total size of a 32-voice bulk dump: 6-byte header, 4096 data bytes,
/// checksum, EOX
pub const BANK_SYSEX_SIZE: usize = 4104;

const OPERATORS: usize = 6;
const PACKED_OPERATOR_SIZE: usize = 17;

/// One envelope segment in engine-native units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSegment {
    /// Counter increment driving the segment's progress rate.
    pub increment: i32,
    /// Target level for the segment.
    pub level: i32,
}

/// Keyboard level-scaling parameters, carried raw for the voice engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardScaling {
    /// Scaling break point (0-99, middle C at 39).
    pub break_point: u8,
    /// Depth left of the break point (0-99).
    pub left_depth: u8,
    /// Depth right of the break point (0-99).
    pub right_depth: u8,
    /// Curve left of the break point (0-3).
    pub left_curve: u8,
    /// Curve right of the break point (0-3).
    pub right_curve: u8,
}

/// Canonical per-operator parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPatch {
    /// Four envelope segments with engine-native increments and levels.
    pub envelope: [EnvSegment; 4],
    /// Operator output level in the engine's `(0, 0x100000]` domain.
    pub output_level: i32,
    /// Keyboard level scaling.
    pub scaling: KeyboardScaling,
    /// Envelope rate scaling (0-7).
    pub rate_scaling: u8,
    /// Amplitude modulation sensitivity (0-3).
    pub amp_mod_sens: u8,
    /// Key velocity sensitivity (0-7).
    pub velocity_sens: u8,
    /// Oscillator mode: 0 = ratio, 1 = fixed frequency.
    pub mode: u8,
    /// Coarse frequency (0-31).
    pub coarse: u8,
    /// Fine frequency (0-99).
    pub fine: u8,
    /// Detune (0-14, center 7).
    pub detune: u8,
}

/// Low-frequency oscillator settings, carried raw for the voice engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LfoPatch {
    /// Speed (0-99).
    pub speed: u8,
    /// Onset delay (0-99).
    pub delay: u8,
    /// Pitch modulation depth (0-99).
    pub pitch_mod_depth: u8,
    /// Amplitude modulation depth (0-99).
    pub amp_mod_depth: u8,
    /// Key sync flag.
    pub sync: bool,
    /// Waveform selector (0-5).
    pub waveform: u8,
}

/// Canonical patch record produced by a decoder.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Patch name (up to 10 characters).
    pub name: String,
    /// Operator routing algorithm (0-31).
    pub algorithm: u8,
    /// Feedback amount for the looped operator (0-7).
    pub feedback: u8,
    /// Oscillator key sync flag.
    pub osc_sync: bool,
    /// Transpose as a signed semitone offset from middle C, ready for
    /// [`crate::Tables::scale`].
    pub transpose: i32,
    /// Pitch envelope segments; levels are in pitch units.
    pub pitch_envelope: [EnvSegment; 4],
    /// Pitch modulation sensitivity used to scale the pitch envelope (0-7).
    pub pitch_mod_sens: u8,
    /// The six operators, in the dump's order (operator 6 first).
    pub operators: [OperatorPatch; OPERATORS],
    /// LFO settings.
    pub lfo: LfoPatch,
}

/// Decodes one binary patch format into canonical patch records.
///
/// Implemented per supported format; callers hold any decoder as
/// `&dyn PatchDecoder` and stay format-agnostic.
pub trait PatchDecoder {
    /// Short format name for diagnostics.
    fn format(&self) -> &'static str;

    /// Decodes `data` into patch records.
    fn decode(&self, data: &[u8]) -> Result<Vec<Patch>>;
}

/// Decoder for Yamaha 32-voice packed bulk dumps.
pub struct YamahaDecoder;

impl PatchDecoder for YamahaDecoder {
    fn format(&self) -> &'static str {
        "yamaha-32-voice"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Patch>> {
        if data.len() != BANK_SYSEX_SIZE {
            return Err(anyhow!(
                "bank dump must be {} bytes, got {}",
                BANK_SYSEX_SIZE,
                data.len()
            ));
        }
        if data[0] != SYSEX_START || data[data.len() - 1] != SYSEX_END {
            return Err(anyhow!("data is not a sysex message"));
        }
        if data[1] != YAMAHA_ID {
            return Err(anyhow!("manufacturer id {:#04x} is not Yamaha", data[1]));
        }
        if data[3] != FORMAT_32_VOICES {
            return Err(anyhow!("format {:#04x} is not a 32-voice bank", data[3]));
        }

        let voices = &data[6..6 + BANK_VOICES * PACKED_VOICE_SIZE];
        verify_checksum(voices, data[data.len() - 2])?;

        let patches = voices
            .chunks_exact(PACKED_VOICE_SIZE)
            .map(unpack_voice)
            .collect::<Vec<_>>();

        log::debug!(
            "decoded {} patches from a {} dump",
            patches.len(),
            self.format()
        );

        Ok(patches)
    }
}

/// The checksum byte is the 7-bit two's complement of the data sum.
fn verify_checksum(voices: &[u8], checksum: u8) -> Result<()> {
    let sum: u32 = voices.iter().map(|&b| u32::from(b)).sum();
    if (sum + u32::from(checksum)) & 0x7f != 0 {
        return Err(anyhow!("bank checksum mismatch"));
    }
    Ok(())
}

fn unpack_voice(packed: &[u8]) -> Patch {
    let mut operators = [OperatorPatch::default(); OPERATORS];
    for (op, operator) in operators.iter_mut().enumerate() {
        let bytes = &packed[op * PACKED_OPERATOR_SIZE..(op + 1) * PACKED_OPERATOR_SIZE];

        let mut envelope = [EnvSegment::default(); 4];
        for seg in 0..4 {
            envelope[seg] = EnvSegment {
                increment: duration_param(i32::from(bytes[seg])),
                level: level_param(i32::from(bytes[4 + seg])),
            };
        }

        *operator = OperatorPatch {
            envelope,
            output_level: level_param(i32::from(bytes[14])),
            scaling: KeyboardScaling {
                break_point: bytes[8],
                left_depth: bytes[9],
                right_depth: bytes[10],
                left_curve: bytes[11] & 0x03,
                right_curve: (bytes[11] >> 2) & 0x03,
            },
            rate_scaling: bytes[12] & 0x07,
            detune: (bytes[12] >> 3) & 0x0f,
            amp_mod_sens: bytes[13] & 0x03,
            velocity_sens: (bytes[13] >> 2) & 0x07,
            mode: bytes[15] & 0x01,
            coarse: (bytes[15] >> 1) & 0x1f,
            fine: bytes[16],
        };
    }

    let pitch_mod_sens = (packed[116] >> 4) & 0x07;
    let mut pitch_envelope = [EnvSegment::default(); 4];
    for seg in 0..4 {
        pitch_envelope[seg] = EnvSegment {
            increment: duration_param(i32::from(packed[102 + seg])),
            level: pitch_param(i32::from(packed[106 + seg]), i32::from(pitch_mod_sens)),
        };
    }

    let name = String::from_utf8_lossy(&packed[118..128])
        .trim_end_matches('\0')
        .trim()
        .to_string();

    Patch {
        name,
        algorithm: packed[110] & 0x1f,
        feedback: packed[111] & 0x07,
        osc_sync: (packed[111] >> 3) & 0x01 != 0,
        transpose: i32::from(packed[117]) - 24,
        pitch_envelope,
        pitch_mod_sens,
        operators,
        lfo: LfoPatch {
            speed: packed[112],
            delay: packed[113],
            pitch_mod_depth: packed[114],
            amp_mod_depth: packed[115],
            sync: packed[116] & 0x01 != 0,
            waveform: (packed[116] >> 1) & 0x07,
        },
    }
}
