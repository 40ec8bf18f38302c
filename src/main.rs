use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cdg::packet::CODE_NO_OP;
use cdg::{
    assemble_with_summary, index_to_ms, load_timing_file, read_stream, write_stream, CdgError,
    EncoderConfig, PACKET_RATE,
};

/// Encode timed lyrics into CD+G subchannel packets
#[derive(Parser)]
#[command(name = "cdg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a timing export (JSON) into a .cdg file
    Encode {
        /// Timing export from the capture tool
        input: PathBuf,

        /// Output file (defaults to the input name with a .cdg extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoder configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail on out-of-order timestamps instead of sorting
        #[arg(long)]
        strict: bool,
    },

    /// Check every packet of a .cdg file
    Verify {
        input: PathBuf,

        /// Packet rate used to report the duration
        #[arg(long, default_value_t = PACKET_RATE)]
        packet_rate: u32,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: logging already initialized");
    }
}

fn encode(
    input: &Path,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    strict: bool,
) -> Result<(), CdgError> {
    let mut config = match config {
        Some(path) => EncoderConfig::from_file(path)?,
        None => EncoderConfig::default(),
    };
    config.strict_order |= strict;

    let events = load_timing_file(input)?;
    let (stream, summary) = assemble_with_summary(&events, &config)?;

    let output = output.unwrap_or_else(|| input.with_extension("cdg"));
    let file = File::create(&output)?;
    write_stream(&stream, BufWriter::new(file))?;

    eprintln!(
        "Wrote {} packets ({} events, {:.3}s) to {}",
        stream.len(),
        summary.events,
        stream.duration_ms() as f64 / 1000.0,
        output.display()
    );
    if summary.substitutions > 0 {
        eprintln!(
            "Note: {} unsupported characters were replaced with '?'",
            summary.substitutions
        );
    }
    Ok(())
}

fn verify(input: &Path, packet_rate: u32) -> Result<(), CdgError> {
    let bytes = fs::read(input)?;
    let packets = read_stream(&bytes)?;
    let content = packets.iter().filter(|p| p.instruction_code() != CODE_NO_OP).count();
    println!(
        "{}: {} packets OK ({} content, {} filler), {:.3}s",
        input.display(),
        packets.len(),
        content,
        packets.len() - content,
        index_to_ms(packets.len() as u64, packet_rate) as f64 / 1000.0
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            config,
            strict,
        } => encode(&input, output, config, strict),
        Commands::Verify { input, packet_rate } => verify(&input, packet_rate),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
