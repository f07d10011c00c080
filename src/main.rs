use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wktmap::boolean::{self, Difference, SubtractError};
use wktmap::codec::{self, CodecError};
use wktmap::doc::Layer;
use wktmap::import;
use wktmap::stats;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid WKT: {0}")]
    InvalidWkt(String),
    #[error("no valid WKT geometries found in {0}")]
    NothingImported(String),
    #[error("cannot write WKT: {0}")]
    Codec(#[from] CodecError),
    #[error("{0}")]
    Subtract(#[from] SubtractError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "wktmap", about = "WKT map layer tools")]
struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true, env = "WKTMAP_PRETTY")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a delimited text file for WKT geometries and print the new layer.
    Import { file: PathBuf },
    /// Parse one WKT geometry and print it back in canonical form.
    Normalize { wkt: String },
    /// Subtract CLIP from SUBJECT (both polygonal WKT).
    Subtract { subject: String, clip: String },
    /// Feature count and area of a project file (a layer array or `{ "layers": [...] }`).
    Stats { file: PathBuf },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectFile {
    Layers(Vec<Layer>),
    Project { layers: Vec<Layer> },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Import { file } => run_import(&file, cli.pretty),
        Command::Normalize { wkt } => run_normalize(&wkt),
        Command::Subtract { subject, clip } => run_subtract(&subject, &clip),
        Command::Stats { file } => run_stats(&file),
    }
}

fn run_import(path: &Path, pretty: bool) -> Result<(), CliError> {
    let text = read(path)?;
    let filename = path.file_name().map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
    let result = import::import_delimited(&filename, &text);
    let report = result.report;
    eprintln!("imported {} of {} lines ({} skipped)", report.imported, report.total, report.skipped);
    let Some(layer) = result.layer else {
        return Err(CliError::NothingImported(path.display().to_string()));
    };
    let rendered = if pretty { serde_json::to_string_pretty(&layer)? } else { serde_json::to_string(&layer)? };
    println!("{rendered}");
    Ok(())
}

fn run_normalize(wkt: &str) -> Result<(), CliError> {
    let geometry = parse_wkt(wkt)?;
    println!("{}", codec::serialize(&geometry)?);
    Ok(())
}

fn run_subtract(subject: &str, clip: &str) -> Result<(), CliError> {
    let subject = parse_wkt(subject)?;
    let clip = parse_wkt(clip)?;
    match boolean::subtract(&subject, &clip)? {
        Difference::Remainder(rest) => println!("{}", codec::serialize(&rest)?),
        Difference::Empty => eprintln!("subject fully removed"),
    }
    Ok(())
}

fn run_stats(path: &Path) -> Result<(), CliError> {
    let layers = match serde_json::from_str::<ProjectFile>(&read(path)?)? {
        ProjectFile::Layers(layers) | ProjectFile::Project { layers } => layers,
    };
    let totals = stats::stats(&layers);
    println!("features: {}", totals.count);
    println!("area: {} ({:.1} m²)", totals.area_label(), totals.area_m2);
    Ok(())
}

fn parse_wkt(text: &str) -> Result<geo::Geometry<f64>, CliError> {
    codec::parse(text).ok_or_else(|| CliError::InvalidWkt(text.to_string()))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}
