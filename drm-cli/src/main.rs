mod logging;
mod wav;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::LevelFilter;
use tokio::sync::{watch, RwLock};

use drm_dsp::{AgcFixed, AgcMode};
use drm_front::{ChannelSelectMode, ReceiveFront};
use drm_status::{SharedState, StatusBroadcast};

/// Thin command-line wrapper around the audio-plane core. The heavy
/// lifting (super-frame parsing, codec orchestration, reverb, AGC) lives
/// in `drm-parser`/`drm-decoder`/`drm-dsp`/`drm-reverb`; this binary
/// wires `ReceiveFront` and `AgcFixed` over a raw I/Q capture file and
/// keeps the status socket alive. A real OFDM demodulator sits between
/// `ReceiveFront` and `SuperFrameParser` in the full receiver and is out
/// of scope here, so there is no super-frame decode path to drive from
/// a bare capture file.
#[derive(Parser, Debug)]
#[command(name = "drm-cli", version, about = "DRM audio-plane core CLI")]
struct Args {
    /// Input I/Q capture file: interleaved little-endian 16-bit I/Q samples.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output WAV file.
    #[arg(short = 'o', long = "output", default_value = "output.wav")]
    output: PathBuf,

    /// Output sample rate in Hz.
    #[arg(short = 'r', long = "sample-rate", default_value_t = 48_000)]
    sample_rate: u32,

    /// Status broadcast socket path override.
    #[arg(short = 's', long = "status-socket")]
    status_socket: Option<PathBuf>,

    /// Verbose (debug-level) logging.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn default_status_socket() -> PathBuf {
    std::env::temp_dir().join("drm-status.sock")
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    env_logger::builder()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format(logging::formatter)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let state = Arc::new(RwLock::new(SharedState::new()));
    let socket_path = args.status_socket.clone().unwrap_or_else(default_status_socket);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let broadcast = StatusBroadcast::new(socket_path, state.clone());
    let broadcast_task = tokio::spawn(async move {
        if let Err(err) = broadcast.serve(shutdown_rx).await {
            ::log::error!("status broadcast stopped: {err}");
        }
    });

    let pipeline_handle = tokio::task::spawn_blocking(move || process_capture(&args));

    let result = tokio::select! {
        joined = pipeline_handle => match joined {
            Ok(inner) => inner,
            Err(err) => Err(anyhow::anyhow!("pipeline task panicked: {err}")),
        },
        _ = tokio::signal::ctrl_c() => {
            ::log::info!("received shutdown signal");
            Ok(())
        }
    };

    let _ = shutdown_tx.send(true);
    let _ = broadcast_task.await;

    result
}

fn process_capture(args: &Args) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)?;
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    let mut front = ReceiveFront::new(ChannelSelectMode::IqPos, args.sample_rate as f64, false);
    let mut agc = AgcFixed::new(AgcMode::Medium, args.sample_rate as f64);

    let mut output = Vec::with_capacity(samples.len() / 2);
    for pair in samples.chunks_exact(2) {
        let (i, q) = (pair[0] as f64, pair[1] as f64);
        for mut sample in front.process_sample(i, q) {
            agc.process_sample(&mut sample);
            output.push(sample.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
        }
    }

    wav::write_mono_pcm16(&args.output, args.sample_rate, &output)?;
    ::log::info!(
        "wrote {} samples to {:?} at {} Hz",
        output.len(),
        args.output,
        args.sample_rate
    );
    Ok(())
}
