//! Test-tone rendering and WAV output for the CLI.
//!
//! The renderer is a minimal consumer of the table engine: semitone offset
//! through `scale`, pitch units through `pitch` into a 32-bit phase
//! accumulator, and the log-sine/envelope path through `logsin` + `output`.

use std::path::Path;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};

use fmtables::fm::params::duration_param;
use fmtables::{Tables, EG_MAX, EG_MIN};

/// Full-scale linear output of the table engine (`16384 << 7`).
const FULL_SCALE: f32 = (1 << 21) as f32;

/// Renders a sine tone at `note` semitones from middle C: full level while
/// the gate is on, then a linear release ramp until full attenuation.
pub fn render_tone(
    tables: &Tables,
    note: i32,
    sample_rate: u32,
    duration: Duration,
    release: i32,
) -> Vec<f32> {
    let gate_samples = duration.as_millis() as usize * (sample_rate as usize / 1000);
    let increment = tables.pitch(tables.scale(note)) as u32;
    let fall = duration_param(release);

    let mut samples = Vec::with_capacity(gate_samples);
    let mut phase: u32 = 0;

    for _ in 0..gate_samples {
        samples.push(sample(tables, phase, EG_MAX));
        phase = phase.wrapping_add(increment);
    }

    let mut envelope = EG_MAX;
    while envelope > EG_MIN {
        envelope = (envelope - fall).max(EG_MIN);
        samples.push(sample(tables, phase, envelope));
        phase = phase.wrapping_add(increment);
    }

    samples
}

fn sample(tables: &Tables, phase: u32, envelope: i32) -> f32 {
    // Top 14 bits of the accumulator address the log-sine table; bit 13 of
    // the angle is the negative half-cycle
    let angle = (phase >> 18) as i32;
    let magnitude = tables.output(tables.logsin(angle), envelope);
    let value = if angle & 0x2000 != 0 {
        -magnitude
    } else {
        magnitude
    };
    value as f32 / FULL_SCALE
}

/// Writes mono f32 samples to `path`.
pub fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> hound::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()
}
