// SPDX-License-Identifier: MIT
//
// platecrop — Batch driver.
//
// Entry point. Initialises logging, loads the plate reference once, then
// hands the scans directory to the session crate as a batch source: files
// matching the batch naming convention that still have the plate's
// dimensions are cropped interactively and overwritten in place. An
// operator abort stops the whole run.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use regex::Regex;
use tracing::{error, info};

use image::RgbImage;
use platecrop_analysis::read_png_dimensions;
use platecrop_core::{PlatecropError, Result, SessionConfig};
use platecrop_session::{BatchOutcome, BatchSource, run_crop_batch};

/// Filenames eligible for cropping: four digits, underscore, one lowercase
/// letter, `.png` (e.g. `0042_b.png`).
const SCAN_NAME_PATTERN: &str = r"^\d{4}_[a-z]\.png$";

const PLATE_FILENAME: &str = "_plate.png";
const CONFIG_FILENAME: &str = "platecrop.json";

#[derive(Debug, Parser)]
#[command(name = "platecrop", about = "Interactive plate-difference cropping for scan batches")]
struct Args {
    /// Directory holding the batch's scan files and the plate reference.
    #[arg(default_value = "scans")]
    scans_dir: PathBuf,

    /// Session configuration file (JSON). Defaults to `platecrop.json`
    /// inside the scans directory; missing file means defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PlatecropError::PlateMissing(path)) => {
            error!(path = %path, "plate reference not found");
            error!("scan a clean background plate and try again");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "batch stopped on error");
            ExitCode::FAILURE
        }
    }
}

/// Enumerate filenames in `scans_dir` eligible for cropping, sorted so the
/// batch runs in filename order.
fn collect_candidates(scans_dir: &std::path::Path) -> Result<VecDeque<String>> {
    let pattern = Regex::new(SCAN_NAME_PATTERN).expect("scan filename pattern is valid");

    let mut filenames: Vec<String> = std::fs::read_dir(scans_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| pattern.is_match(name))
        .collect();
    filenames.sort();
    Ok(filenames.into())
}

/// Feeds the batch from the scans directory and overwrites accepted crops
/// in place.
struct ScanDirSource {
    scans_dir: PathBuf,
    plate_dimensions: (u32, u32),
    queue: VecDeque<String>,
}

impl BatchSource for ScanDirSource {
    fn next_scan(&mut self) -> Result<Option<(String, RgbImage)>> {
        while let Some(filename) = self.queue.pop_front() {
            let path = self.scans_dir.join(&filename);

            // A file that no longer has the plate's dimensions has already
            // been cropped; skip it without decoding any pixels. Header
            // read failures are fatal for the whole run.
            let (width, height) = read_png_dimensions(&path)?;
            if (width, height) != self.plate_dimensions {
                info!(file = %filename, "already cropped");
                continue;
            }

            let scan = image::open(&path)
                .map_err(|err| {
                    PlatecropError::ImageError(format!(
                        "failed to load {}: {}",
                        path.display(),
                        err
                    ))
                })?
                .to_rgb8();
            return Ok(Some((filename, scan)));
        }
        Ok(None)
    }

    fn accept(&mut self, label: &str, image: RgbImage) -> Result<()> {
        let path = self.scans_dir.join(label);
        image.save(&path).map_err(|err| {
            PlatecropError::ImageError(format!("failed to overwrite {}: {}", path.display(), err))
        })?;
        info!(
            file = %label,
            width = image.width(),
            height = image.height(),
            "overwritten"
        );
        Ok(())
    }
}

fn run(args: &Args) -> Result<()> {
    let plate_path = args.scans_dir.join(PLATE_FILENAME);
    if !plate_path.is_file() {
        return Err(PlatecropError::PlateMissing(
            plate_path.display().to_string(),
        ));
    }

    // The plate is loaded once and shared read-only across the whole run.
    let plate = image::open(&plate_path)
        .map_err(|err| {
            PlatecropError::ImageError(format!(
                "failed to load plate {}: {}",
                plate_path.display(),
                err
            ))
        })?
        .to_rgb8();
    info!(
        width = plate.width(),
        height = plate.height(),
        "plate reference loaded"
    );

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.scans_dir.join(CONFIG_FILENAME));
    let config = SessionConfig::load_or_default(&config_path)?;

    let queue = collect_candidates(&args.scans_dir)?;
    info!(candidates = queue.len(), "scan batch enumerated");

    let source = ScanDirSource {
        scans_dir: args.scans_dir.clone(),
        plate_dimensions: plate.dimensions(),
        queue,
    };

    match run_crop_batch(plate, Box::new(source), &config)? {
        BatchOutcome::Completed => info!("batch complete"),
        // Deliberate operator cancellation of the remainder of the batch;
        // a clean stop, not an error.
        BatchOutcome::Aborted => info!("batch stopped by operator"),
    }

    Ok(())
}
