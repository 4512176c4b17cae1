use anyhow::{bail, Context};

use quantfolio::config::ConfigManager;
use quantfolio::data::CsvConnector;
use quantfolio::engines::reconcile::OptimizeRequest;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

const USAGE: &str = "usage: quantfolio [--config FILE] [--manifest] [--risk-factor X] \
[--weights W1,W2,..] PRICES_CSV TICKER [TICKER...]";

fn run() -> anyhow::Result<()> {
    let mut config_path: Option<String> = None;
    let mut print_manifest = false;
    let mut risk_factor = 0.5;
    let mut weights: Option<Vec<f64>> = None;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(args.next().context("--config requires a path")?);
            }
            "--manifest" => print_manifest = true,
            "--risk-factor" => {
                let raw = args.next().context("--risk-factor requires a value")?;
                risk_factor = raw
                    .parse()
                    .with_context(|| format!("invalid risk factor: {}", raw))?;
            }
            "--weights" => {
                let raw = args.next().context("--weights requires a list")?;
                let parsed: Result<Vec<f64>, _> = raw.split(',').map(str::parse).collect();
                weights = Some(parsed.with_context(|| format!("invalid weights list: {}", raw))?);
            }
            other => positional.push(other.to_string()),
        }
    }

    let manager = ConfigManager::new();
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?;
    }
    let config = manager.get();

    if print_manifest {
        println!("{}", serde_json::to_string_pretty(&config.manifest())?);
        return Ok(());
    }

    if positional.len() < 2 {
        bail!("{}", USAGE);
    }
    let csv_path = positional.remove(0);
    let tickers = positional;

    let prices = CsvConnector::load_and_validate(&csv_path, &tickers, None)
        .with_context(|| format!("failed to load price table {}", csv_path))?;
    let metadata = CsvConnector::create_metadata(&csv_path, &prices, &tickers)?;
    log::info!(
        "Loaded {} rows for {} tickers from {}",
        metadata.num_rows,
        metadata.tickers.len(),
        metadata.file_path
    );
    if let Some((first, last)) = metadata.date_range {
        log::info!("Price history spans {} to {}", first, last);
    }

    let request = OptimizeRequest {
        tickers,
        prices,
        risk_factor,
        initial_weights: weights,
    };

    let outcome = quantfolio::optimize(&request, config).context("optimization failed")?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
