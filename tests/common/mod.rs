use fmtables::{Tables, EG_MAX};

/// Renders `n` samples of a full-level sine at `note` semitones from middle
/// C, the same phase-accumulator path the CLI tone renderer uses.
pub fn render_gate_on(tables: &Tables, note: i32, n: usize) -> Vec<f32> {
    let increment = tables.pitch(tables.scale(note)) as u32;
    let mut samples = Vec::with_capacity(n);
    let mut phase: u32 = 0;

    for _ in 0..n {
        let angle = (phase >> 18) as i32;
        let magnitude = tables.output(tables.logsin(angle), EG_MAX);
        let value = if angle & 0x2000 != 0 {
            -magnitude
        } else {
            magnitude
        };
        samples.push(value as f32 / (1 << 21) as f32);
        phase = phase.wrapping_add(increment);
    }

    samples
}
