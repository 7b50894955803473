//! Contract tests for the table engine: determinism, pitch-unit algebra,
//! decompression round trips, and the envelope clamp policy.

use fmtables::{Tables, EG_MAX, EG_MID, EG_MIN, MIDDLE_C, OCTAVE};

#[test]
fn init_is_deterministic() {
    let a = Tables::new(44100.0);
    let b = Tables::new(44100.0);

    for i in 0..0x4000 {
        assert_eq!(a.logsin(i), b.logsin(i), "logsin diverges at {}", i);
        assert_eq!(a.log(i), b.log(i), "log diverges at {}", i);
        assert_eq!(a.exp(i), b.exp(i), "exp diverges at {}", i);
    }
    for f in 0..0x1000 {
        assert_eq!(a.pitch(f), b.pitch(f), "notes diverge at {}", f);
    }
    for n in -128..=128 {
        assert_eq!(a.scale(n), b.scale(n), "scale diverges at {}", n);
    }
}

#[test]
fn distinct_rates_coexist_independently() {
    let a = Tables::new(44100.0);
    let b = Tables::new(48000.0);
    assert_ne!(a.pitch(0), b.pitch(0));
    // Rate only affects the note table
    assert_eq!(a.logsin(123), b.logsin(123));
    assert_eq!(a.scale(12), b.scale(12));
}

#[test]
fn scale_is_odd_and_octave_exact() {
    let tables = Tables::new(44100.0);

    assert_eq!(tables.scale(0), 0);
    assert_eq!(tables.scale(12), OCTAVE);
    assert_eq!(tables.scale(12) - tables.scale(0), OCTAVE);
    assert_eq!(tables.scale(24), 2 * OCTAVE);

    for n in 0..=120 {
        assert_eq!(tables.scale(-n), -tables.scale(n), "asymmetric at {}", n);
    }

    // Semitones are monotone within the octave
    for n in 1..=12 {
        assert!(tables.scale(n) > tables.scale(n - 1));
    }
    // A perfect fifth in equal temperament
    assert_eq!(tables.scale(7), 2389);
}

#[test]
fn octave_field_doubles_and_halves_pitch() {
    let tables = Tables::new(44100.0);

    for f in [0, 123, 2048, 4095] {
        let base = tables.pitch(f);
        assert_eq!(tables.pitch(f + OCTAVE), 2 * base, "octave up at {}", f);
        assert_eq!(tables.pitch(f + 2 * OCTAVE), 4 * base);
        assert_eq!(tables.pitch(f - OCTAVE), base >> 1, "octave down at {}", f);
    }
}

#[test]
fn pitch_zero_is_middle_c_increment() {
    let rate = 44100.0;
    let tables = Tables::new(rate);

    let expected = (MIDDLE_C * (1u64 << 32) as f64 / rate).round() as i64;
    assert!((tables.pitch(0) - expected).abs() <= 1);

    // scale() feeds pitch(): one octave up doubles the increment
    let up = tables.pitch(tables.scale(12));
    assert_eq!(up, 2 * tables.pitch(0));
}

#[test]
fn exp_recovers_log_within_quantization() {
    let tables = Tables::new(44100.0);

    for x in [1, 2, 3, 7, 100, 1000, 4096, 8191, 12345, 16383] {
        let round_trip = tables.exp(tables.log(x));
        assert!(
            (round_trip - x).abs() <= 1,
            "exp(log({})) was {}",
            x,
            round_trip
        );
    }

    // Linear zero is representable through the sentinel entry
    assert_eq!(tables.exp(tables.log(0)), 0);
}

#[test]
fn output_follows_envelope_clamp_policy() {
    let tables = Tables::new(44100.0);

    for input in [0, 100, 5000, 50000] {
        // Below the floor: silence
        assert_eq!(tables.output(input, EG_MIN - 1), 0);
        // At or above the ceiling: the unattenuated decompression
        let full = tables.exp(input) << 7;
        assert_eq!(tables.output(input, EG_MAX), full);
        assert_eq!(tables.output(input, EG_MAX + 1), full);

        // Level rises monotonically with the envelope value
        let mut prev = 0;
        let mut envelope = EG_MIN;
        while envelope < EG_MAX {
            let out = tables.output(input, envelope);
            assert!(
                out >= prev,
                "output fell from {} to {} at envelope {}",
                prev,
                out,
                envelope
            );
            prev = out;
            envelope += 0x8000;
        }
    }

    // Midpoint attenuation sits between the extremes
    let mid = tables.output(0, EG_MID);
    assert!(mid > 0 && mid < tables.output(0, EG_MAX));
}

#[test]
fn output_stays_in_signed_24_bit_positive_range() {
    let tables = Tables::new(44100.0);
    let mut envelope = EG_MIN - 1;
    while envelope <= EG_MAX {
        for phase in [0, 1, 0x1000, 0x2fff, 0x3fff] {
            let out = tables.output(tables.logsin(phase), envelope);
            assert!((0..=0x7fffff).contains(&out));
        }
        envelope += 0x10000;
    }
}

#[test]
fn reinit_at_a_new_rate_replaces_the_note_table() {
    let mut tables = Tables::new(44100.0);
    let before = tables.pitch(0);
    tables.init(88200.0);
    let after = tables.pitch(0);
    assert!((before - 2 * after).abs() <= 1);
    // And reinit at the original rate restores it exactly
    tables.init(44100.0);
    assert_eq!(tables.pitch(0), before);
}
