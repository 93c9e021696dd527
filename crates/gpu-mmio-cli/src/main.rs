use clap::{Parser, Subcommand};
use gpu_mmio::{ComponentOrder, FillModePolicy, FlipAxis, GpuConfig, ScalingInterpretation};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gpu-mmio-cli")]
#[command(about = "Inspect the GPU register map and replay register access traces (debug CLI)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress log output (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the register region layout
    Layout,
    /// Replay a register access trace
    Replay {
        /// Trace file path
        trace: PathBuf,

        /// Hold launched operations until a `complete` line
        #[arg(long)]
        defer_completion: bool,

        /// Fill mode policy: strict, zero-selects-16bit
        #[arg(long, default_value = "strict")]
        fill_mode: FillModePolicy,

        /// 24-bit fill component order: rgb, bgr
        #[arg(long, default_value = "rgb")]
        fill24_order: ComponentOrder,

        /// Axis of the transfer flip flag: horizontal, vertical
        #[arg(long, default_value = "horizontal")]
        flip_axis: FlipAxis,

        /// Scaling mode interpretation: unscaled, halve-output
        #[arg(long, default_value = "unscaled")]
        scaling: ScalingInterpretation,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (suppressed if --quiet)
    if !cli.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Layout => gpu_mmio_cli::write_layout(&mut stdout),
        Commands::Replay {
            trace,
            defer_completion,
            fill_mode,
            fill24_order,
            flip_axis,
            scaling,
        } => {
            let config = GpuConfig {
                fill_mode_policy: fill_mode,
                fill24_order,
                flip_axis,
                scaling,
            };
            let summary = gpu_mmio_cli::replay_file(&trace, config, defer_completion, &mut stdout)?;
            if !cli.quiet {
                eprintln!("Replayed {}: {summary}", trace.display());
            }
            Ok(())
        }
    }
}
