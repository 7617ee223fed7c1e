use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rust_barcode::tools::load_frame;
use rust_barcode::{
    BarcodeResult, BarcodeScanner, FrameSession, ScanPreset, ScanStatus, ScannerConfiguration,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scan", version, about = "Scan an image for 1D and 2D barcodes")]
struct Cli {
    /// Image file to scan
    image: PathBuf,

    /// Configuration preset
    #[arg(long, value_enum, default_value_t = Preset::ShippingLabel)]
    preset: Preset,

    /// Override the preset's maximum number of codes per frame
    #[arg(long)]
    max_codes: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    ShippingLabel,
    LowResolution,
}

impl From<Preset> for ScanPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::ShippingLabel => ScanPreset::ShippingLabel,
            Preset::LowResolution => ScanPreset::LowResolution,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "rust_barcode=debug,scan=debug"
    } else {
        "rust_barcode=info,scan=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let frame = load_frame(&cli.image)
        .with_context(|| format!("failed to load image {}", cli.image.display()))?;
    info!(
        image = %cli.image.display(),
        width = frame.width,
        height = frame.height,
        "loaded image"
    );

    let mut config = ScannerConfiguration::from_preset(cli.preset.into());
    if let Some(max_codes) = cli.max_codes {
        config.set_max_codes_per_frame(max_codes);
    }

    let mut scanner = BarcodeScanner::new(config);
    let mut session = FrameSession::new();
    if !session.start() {
        anyhow::bail!("could not start frame sequence");
    }
    let status = scanner
        .process_frame(&session, &frame)
        .with_context(|| format!("failed to scan {}", cli.image.display()))?;
    session.end();

    print_report(&cli.image, status, scanner.last_results());
    Ok(())
}

fn print_report(image: &Path, status: ScanStatus, results: &[BarcodeResult]) {
    println!("=== SCAN RESULTS: {} ===", image.display());
    if status == ScanStatus::NoCodesFound {
        println!("No barcodes found");
        return;
    }

    println!("Found {} barcode(s):", results.len());
    for (i, barcode) in results.iter().enumerate() {
        println!("\nBarcode {}:", i + 1);
        println!("  Type: {}", barcode.symbology_name);
        println!("  Data: {}", barcode.data);
        println!("  Format Details:");
        for line in barcode.format_details.lines() {
            println!("    {line}");
        }
        println!(
            "  Location: ({},{}) {}x{}",
            barcode.location.x, barcode.location.y, barcode.location.width, barcode.location.height
        );
        println!(
            "  Color Inverted: {}",
            if barcode.color_inverted { "Yes" } else { "No" }
        );
        println!("  Confidence: {:.2}", barcode.confidence);
    }

    let two_d = results.iter().filter(|r| r.is_2d()).count();
    println!("\nSUMMARY:");
    println!("1D Barcodes found: {}", results.len() - two_d);
    println!("2D Barcodes found: {two_d}");
}
