use anyhow::Context;
use clap::{Parser, Subcommand};
use jartic::{Config, OutputFormat, QueryArgs, RoadType, Tool, TrafficClient};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Query JARTIC open traffic observations", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Quantum requests allowed in flight at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch observations for a window and area
    Query {
        /// 1 (highway) or 3 (national road)
        #[arg(short, long)]
        road_type: RoadType,

        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: String,

        /// west,south,east,north
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        #[arg(long, allow_hyphen_values = true, requires_all = ["lon", "radius_km"])]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long)]
        radius_km: Option<f64>,

        /// Observation point code, repeatable
        #[arg(short, long = "point-code")]
        point_codes: Vec<String>,

        #[arg(short, long, default_value_t = OutputFormat::GeoJson)]
        format: OutputFormat,
    },
    /// Invoke a tool by name with a JSON argument object
    Call { name: String, arguments: String },
    /// Print the tool definitions as JSON
    Tools,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(limit) = args.concurrency {
        config = config.with_max_concurrent_requests(limit);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Command::Tools = args.command {
        println!("{}", serde_json::to_string_pretty(&Tool::definitions())?);
        return Ok(());
    }

    let config = load_config(&args)?;
    info!("Using feature service at {}", config.base_url);
    let client = TrafficClient::new(config)?;

    match args.command {
        Command::Query {
            road_type,
            start,
            end,
            bbox,
            lat,
            lon,
            radius_km,
            point_codes,
            format,
        } => {
            let mut query = QueryArgs::new(road_type, start, end).with_output_format(format);
            query.bbox = bbox;
            query.center_lat = lat;
            query.center_lon = lon;
            query.radius_km = radius_km;
            if !point_codes.is_empty() {
                query = query.with_point_codes(point_codes);
            }
            let output = client.query_args(&query).await?;
            print!("{}", output.into_text()?);
        }
        Command::Call { name, arguments } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&arguments).context("arguments must be a JSON object")?;
            println!("{}", jartic::dispatch(&client, &name, arguments).await);
        }
        Command::Tools => {}
    }

    Ok(())
}
