use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, LevelFilter};
use rayon::prelude::*;

use thermal_risk_lib::comparison::compare_reports;
use thermal_risk_lib::image_io::get_image_files_in_dir;
use thermal_risk_lib::output::read_report_json;
use thermal_risk_lib::{
    detectable_regions, load_image, process_image, risk_level_definitions, Config,
    ThermalAnalyzer,
};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Thermal imaging injury-risk analysis (posterior lower body)")]
struct Args {
    /// Path to input image or directory of images
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file (defaults are used if it does not exist)
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Analysis type label recorded in each report
    #[clap(short = 't', long)]
    analysis_type: Option<String>,

    /// Skip the per-region CSV files
    #[clap(long)]
    no_csv: bool,

    /// Enable debug logging and save intermediate images
    #[clap(short, long)]
    debug: bool,

    /// Print the detectable regions as JSON and exit
    #[clap(long)]
    list_regions: bool,

    /// Print the risk level definitions as JSON and exit
    #[clap(long)]
    list_risk_levels: bool,

    /// Compare two or more stored JSON reports (oldest first) and exit
    #[clap(long, num_args = 2.., value_name = "REPORT")]
    compare: Vec<PathBuf>,
}

fn init_logging(debug: bool) {
    let mut builder = if std::env::var_os("RUST_LOG").is_some() {
        Builder::from_env(Env::default())
    } else {
        let mut b = Builder::new();
        b.filter_level(if debug { LevelFilter::Debug } else { LevelFilter::Info });
        b
    };
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut config = Config::from_file_or_default(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;

    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }
    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }
    if let Some(analysis_type) = args.analysis_type.clone() {
        config.analysis_type = analysis_type;
    }
    if args.no_csv {
        config.write_csv = false;
    }
    if args.debug {
        config.save_debug_images = true;
    }

    if args.list_regions {
        println!("{}", serde_json::to_string_pretty(&detectable_regions())?);
        return Ok(());
    }

    if args.list_risk_levels {
        config.thresholds.validate()?;
        println!(
            "{}",
            serde_json::to_string_pretty(&risk_level_definitions(&config.thresholds))?
        );
        return Ok(());
    }

    if !args.compare.is_empty() {
        let reports = args
            .compare
            .iter()
            .map(|path| {
                read_report_json(path).with_context(|| format!("reading report {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let comparison = compare_reports(&reports, "temporal")?;
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    config.validate()?;

    let start_time = Instant::now();
    let analyzer = ThermalAnalyzer::new(config.thresholds.clone());
    let input_path = PathBuf::from(&config.input_path);

    if input_path.is_file() {
        info!("Processing single file: {}", input_path.display());
        let input_image = load_image(&input_path)
            .with_context(|| format!("decoding {}", input_path.display()))?;
        let report = process_image(input_image, &analyzer, &config)?;
        let summary = report.summary();
        info!(
            "{} regions detected, {} high-risk, {} critical",
            summary.total_regions_detected,
            summary.high_risk_regions,
            summary.critical_risk_regions
        );
        for action in &report.priority_actions {
            info!("Priority: {}", action);
        }
    } else if input_path.is_dir() {
        info!("Processing directory: {}", input_path.display());
        let image_files = get_image_files_in_dir(&input_path)?;
        info!("Found {} image files", image_files.len());

        let failures = AtomicUsize::new(0);
        let run = |path: &PathBuf| {
            info!("Processing: {}", path.display());
            let result = load_image(path).and_then(|img| process_image(img, &analyzer, &config));
            if let Err(e) = result {
                error!("Failed to analyze {}: {}", path.display(), e);
                failures.fetch_add(1, Ordering::Relaxed);
            }
        };

        if config.use_parallel {
            image_files.par_iter().for_each(run);
        } else {
            image_files.iter().for_each(run);
        }

        let failed = failures.load(Ordering::Relaxed);
        if failed > 0 {
            error!("{} of {} images failed", failed, image_files.len());
        }
    } else {
        bail!("input path {} is neither a file nor a directory", input_path.display());
    }

    // Persist the effective configuration next to the reports
    let effective_config = PathBuf::from(&config.output_base_dir).join("config_used.toml");
    fs::create_dir_all(&config.output_base_dir)?;
    config.save_to_file(&effective_config)?;

    info!("Processing completed in {:.2} seconds", start_time.elapsed().as_secs_f64());

    Ok(())
}
