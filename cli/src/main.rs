use clap::{Parser, Subcommand};
use echolock_cli::{build_receiver, read_wav, server, WaveformArg};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "echolock")]
#[command(about = "Decode acoustic captures of short encrypted messages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a WAV capture and print any recovered message record
    Decode {
        /// Input WAV file (any rate; mono or stereo)
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Physical-layer waveform to decode
        #[arg(short, long, value_enum, default_value = "covert")]
        waveform: WaveformArg,

        /// Fixed DSSS carrier in Hz (default 12000)
        #[arg(long)]
        carrier: Option<f32>,

        /// Scan the whole carrier pool instead of one carrier
        #[arg(long)]
        auto_scan: bool,

        /// Preshared key as 32 ASCII characters (reference default if omitted)
        #[arg(long)]
        key: Option<String>,
    },

    /// Serve decode requests over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            waveform,
            carrier,
            auto_scan,
            key,
        } => {
            let file = std::fs::File::open(&input)?;
            let samples = read_wav(file)?;
            info!(samples = samples.len(), "capture loaded");

            let receiver = build_receiver(waveform, carrier, auto_scan, key.as_deref())?;
            match receiver.decode_window(&samples) {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(())
                }
                None => {
                    eprintln!("No message found in {}", input.display());
                    std::process::exit(1);
                }
            }
        }
        Commands::Serve { port } => server::serve(port),
    }
}
