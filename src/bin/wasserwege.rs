use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use wasserwege::{Config, DatasetBuilder};

#[derive(Parser, Debug)]
#[command(version, about = "Find the waterways a GPX track crosses", long_about = None)]
struct Args {
    /// GeoJSON FeatureCollection of waterway lines
    #[arg(short, long)]
    dataset: PathBuf,

    /// GPX file with the track to check
    #[arg(short, long)]
    track: PathBuf,

    /// JSON or TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("wasserwege=info"))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let dataset = DatasetBuilder::new()
        .config(config)
        .geojson_path(&args.dataset)
        .build()
        .with_context(|| format!("loading dataset {}", args.dataset.display()))?;

    let start = Instant::now();
    let file = std::fs::File::open(&args.track)
        .with_context(|| format!("opening track {}", args.track.display()))?;
    let vertices = wasserwege::track::read_gpx(std::io::BufReader::new(file))?;
    let parse_ms = start.elapsed().as_secs_f64() * 1000.0;
    log::info!("Parsed {} track points in {:.2} ms", vertices.len(), parse_ms);

    let result = dataset.query(&vertices)?;
    let mut response = wasserwege::geojson::format_response(&result, dataset.config())?;
    response["processing_times_ms"]["gpx_parsing"] = serde_json::json!(parse_ms);

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
