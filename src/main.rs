use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fmtables::import::{PatchDecoder, YamahaDecoder};
use fmtables::Tables;

mod wav;

fn parse_duration(s: &str) -> Result<Duration, std::num::ParseIntError> {
    let ms: u64 = s.parse()?;
    Ok(Duration::from_millis(ms))
}

/// Inspect the FM table engine and Yamaha patch banks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all patches in a bank dump file
    List {
        /// Path to the 32-voice bank dump
        bank_file: PathBuf,
    },
    /// Render a table-engine test tone to a WAV file
    Tone {
        /// Output WAV path
        out_file: PathBuf,

        /// Note as a signed semitone offset from middle C
        #[arg(long, default_value_t = 0)]
        note: i32,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Gate-on duration in milliseconds
        #[arg(long, default_value = "1000", value_parser = parse_duration)]
        duration: Duration,

        /// Release rate (0-99)
        #[arg(long, default_value_t = 60)]
        release: i32,
    },
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::List { bank_file } => {
            let data = std::fs::read(&bank_file).unwrap_or_else(|e| {
                eprintln!("Error reading bank file '{}': {}", bank_file.display(), e);
                std::process::exit(1);
            });

            let patches = YamahaDecoder.decode(&data).unwrap_or_else(|e| {
                eprintln!("Error decoding '{}': {}", bank_file.display(), e);
                std::process::exit(1);
            });

            for (i, patch) in patches.iter().enumerate() {
                println!("{}: {}", i, patch.name);
            }
        }
        Commands::Tone {
            out_file,
            note,
            sample_rate,
            duration,
            release,
        } => {
            if !(8000..=192_000).contains(&sample_rate) {
                eprintln!(
                    "Error: sample_rate must be between 8000 and 192000 (got {})",
                    sample_rate
                );
                std::process::exit(1);
            }

            // Keep the rendered pitch below Nyquist and inside the table
            // engine's sensible octave range
            if !(-48..=48).contains(&note) {
                eprintln!("Error: note must be between -48 and 48 (got {})", note);
                std::process::exit(1);
            }

            if !(0..=99).contains(&release) {
                eprintln!("Error: release must be between 0 and 99 (got {})", release);
                std::process::exit(1);
            }

            let tables = Tables::new(f64::from(sample_rate));
            let samples = wav::render_tone(&tables, note, sample_rate, duration, release);

            wav::write_wav(&out_file, sample_rate, &samples).unwrap_or_else(|e| {
                eprintln!("Error writing '{}': {}", out_file.display(), e);
                std::process::exit(1);
            });

            log::debug!(
                "rendered {} samples at {} Hz to {}",
                samples.len(),
                sample_rate,
                out_file.display()
            );
        }
    }
}
