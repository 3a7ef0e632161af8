use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use drumbeat_core::{bjorklund, gm_drum_name, key_int, notation, GridRes, Pattern};

#[derive(Parser, Debug)]
#[command(name = "drumbeat")]
#[command(about = "Convert drum step patterns to and from MIDI files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress informational messages (only errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert step notation to a MIDI file
    Gen {
        /// Patterns, e.g. "[kick]{C1}x...x...;[snare]{D1}....x..."
        pattern: String,

        /// Grid resolution of the notation (1/4, 1/8, 1/16, 1/32, 1/64)
        #[arg(short, long, default_value = "1/16")]
        grid: GridRes,

        /// Output file path
        #[arg(short, long, default_value = "drumbeat.mid")]
        output: PathBuf,

        /// Write the MIDI bytes to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Print the patterns found in a MIDI file
    Parse {
        /// Path to the MIDI file
        midi: PathBuf,

        /// Pad every pattern to whole bars before printing
        #[arg(long)]
        realign: bool,
    },
    /// Generate a kick/snare/hi-hat beat from Euclidean rhythms
    Euclid {
        /// Number of steps (at least 8)
        #[arg(short, long, default_value = "32")]
        steps: usize,

        /// Number of pulses (default: 1 + steps / 8)
        #[arg(short, long, default_value = "0")]
        pulses: usize,

        /// Rotate the kick by this many steps
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,

        /// Seed for the hi-hat variations
        #[arg(long)]
        seed: Option<u64>,

        /// Output file path
        #[arg(short, long, default_value = "gen_drumbeat.mid")]
        output: PathBuf,
    },
    /// Save step notation as a pattern file
    Save {
        /// Patterns to save
        pattern: String,

        /// Grid resolution of the notation
        #[arg(short, long, default_value = "1/16")]
        grid: GridRes,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the patterns of a saved pattern file
    Load {
        /// Path to the pattern file
        file: PathBuf,

        /// Also write them to this MIDI file
        #[arg(long)]
        midi: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Gen {
            pattern,
            grid,
            output,
            stdout,
        } => {
            let mut patterns = notation::parse(grid, &pattern);
            if stdout {
                // stdout carries the MIDI data, the step views go to the log
                for p in &patterns {
                    tracing::info!("{}: {}", label(p), p.pulses);
                }
                let mut out = io::stdout().lock();
                drumbeat_midi::to_midi(&mut out, &mut patterns).context("Failed to write MIDI to stdout")?;
                out.flush().context("Failed to write MIDI to stdout")?;
                Ok(())
            } else {
                print_patterns(&patterns);
                write_midi(&output, &mut patterns)
            }
        }
        Commands::Parse { midi, realign } => {
            tracing::info!("Processing MIDI file: {}", midi.display());
            let file = File::open(&midi)
                .with_context(|| format!("Failed to open MIDI file: {}", midi.display()))?;
            let mut patterns = drumbeat_midi::from_midi(BufReader::new(file))
                .with_context(|| format!("Failed to parse MIDI file: {}", midi.display()))?;

            if realign {
                for p in &mut patterns {
                    p.realign()?;
                }
            }
            if patterns.is_empty() {
                tracing::warn!("No notes found in {}", midi.display());
            }
            print_patterns(&patterns);
            Ok(())
        }
        Commands::Euclid {
            steps,
            pulses,
            offset,
            seed,
            output,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut patterns = euclidean_beat(steps, pulses, offset, &mut rng)?;
            print_patterns(&patterns);
            write_midi(&output, &mut patterns)
        }
        Commands::Save {
            pattern,
            grid,
            output,
        } => {
            let mut patterns = notation::parse(grid, &pattern);
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            drumbeat_core::write_to(BufWriter::new(file), &mut patterns)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            print_patterns(&patterns);
            tracing::info!("Output saved to {}", output.display());
            Ok(())
        }
        Commands::Load { file, midi } => {
            let reader = File::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let mut patterns = drumbeat_core::read_from(BufReader::new(reader))
                .with_context(|| format!("Failed to read patterns from {}", file.display()))?;

            print_patterns(&patterns);
            match midi {
                Some(path) => write_midi(&path, &mut patterns),
                None => Ok(()),
            }
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn write_midi(path: &Path, patterns: &mut [Pattern]) -> Result<()> {
    if patterns.is_empty() {
        tracing::warn!("Nothing to write");
        return Ok(());
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    drumbeat_midi::to_midi(BufWriter::new(file), patterns)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Output saved to {}", path.display());
    Ok(())
}

/// One line per pattern on stdout: `label: steps`
fn print_patterns(patterns: &[Pattern]) {
    for p in patterns {
        println!("{}: {}", label(p), p.pulses);
    }
}

fn label(p: &Pattern) -> String {
    let mut label = if p.name.is_empty() {
        "-".to_string()
    } else {
        p.name.clone()
    };
    if let Some(drum) = gm_drum_name(p.key) {
        label.push_str(&format!(" ({})", drum));
    }
    label
}

/// Kick split in two halves (the second one gets an extra onset), snare
/// pushed back by a beat, and hi-hats built from three randomized chunks
fn euclidean_beat(steps: usize, pulses: usize, offset: i64, rng: &mut impl Rng) -> Result<Vec<Pattern>> {
    let steps = steps.max(8);
    let pulses = if pulses < 1 { 1 + steps / 8 } else { pulses };

    let mut kick_seq = bjorklund(pulses / 2, steps / 2, 0);
    kick_seq.extend(bjorklund(pulses / 2 + 1, steps / 2, 0));
    let mut kick = Pattern::from_hits(GridRes::One16, &kick_seq).with_name("Kick");
    kick.key = key_int("C", 1).unwrap_or_default();
    kick.offset(offset)?;

    let mut snare = Pattern::from_hits(GridRes::One16, &bjorklund(pulses / 2 + 1, steps, 0)).with_name("Snare");
    snare.key = key_int("D", 1).unwrap_or_default();
    snare.offset(4)?;

    let chunks = 3;
    let group_size = steps / chunks;
    let mut hat_seq = Vec::with_capacity(steps);
    for _ in 0..chunks {
        let mut hat_pulses = group_size / 2;
        if rng.gen_bool(0.5) {
            hat_pulses += 1;
        }
        hat_seq.extend(bjorklund(hat_pulses, group_size, 0));
    }
    // Repeat the tail to cover the steps the chunks left out
    let left_over = steps % chunks;
    hat_seq.extend_from_within(hat_seq.len() - left_over..);
    let mut hats = Pattern::from_hits(GridRes::One16, &hat_seq).with_name("HiHat");
    hats.key = key_int("F#", 1).unwrap_or_default();

    Ok(vec![kick, snare, hats])
}
