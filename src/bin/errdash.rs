use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use errdash::models::FilterField;
use errdash::{Dashboard, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "errdash",
    version,
    about = "Aggregate error/telemetry records & render dashboard charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render all dashboard charts from a records file.
    Render(RenderArgs),
    /// Print aggregate summaries to stdout.
    Stats(StatsArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Records file (JSON array).
    #[arg(short, long)]
    input: PathBuf,
    /// Directory receiving correlation.svg, map.svg, pie.svg, wordcloud.svg.
    #[arg(short, long, default_value = "charts")]
    out_dir: PathBuf,
    /// Filter by exact country before rendering.
    #[arg(long)]
    country: Option<String>,
    /// Filter by exact model before rendering.
    #[arg(long)]
    model: Option<String>,
    /// World boundary GeoJSON URL (defaults to a public world dataset).
    #[arg(long)]
    geo_url: Option<String>,
    /// Skip the geography fetch; the map renders its unavailable placeholder.
    #[arg(long, default_value_t = false)]
    no_fetch: bool,
    /// Save the displayed (possibly filtered) records to this file.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format for --out (csv or json). If omitted, inferred from extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Records file (JSON array).
    #[arg(short, long)]
    input: PathBuf,
    /// How many word-cloud entries to print.
    #[arg(long, default_value_t = 10)]
    top_words: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let records = storage::load_records(&args.input)?;
    std::fs::create_dir_all(&args.out_dir)?;

    let mut dashboard = Dashboard::new(&args.out_dir);
    if let Some(url) = args.geo_url.as_ref() {
        dashboard = dashboard.with_geo_url(url.clone());
    }
    dashboard.initialize(!args.no_fetch)?;
    dashboard.load(records)?;

    if let Some(country) = args.country.as_deref() {
        dashboard.set_filter(FilterField::Country, country)?;
    }
    if let Some(model) = args.model.as_deref() {
        dashboard.set_filter(FilterField::Model, model)?;
    }

    eprintln!("{}", dashboard.filter_panel().status_text());
    eprintln!("Wrote charts to {}", args.out_dir.display());

    if let Some(path) = args.out.as_ref() {
        let displayed = dashboard.filter_panel().active_data();
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&displayed, path)?,
            "json" => storage::save_json(&displayed, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} records to {}", displayed.len(), path.display());
    }

    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let records = storage::load_records(&args.input)?;
    println!("records: {}", records.len());

    let correlation = errdash::agg::correlation_matrix(&records);
    println!(
        "correlation: {} models x {} versions, max cell {}",
        correlation.top_models.len(),
        correlation.top_versions.len(),
        correlation.max_count
    );

    let countries = errdash::agg::country_error_counts(&records);
    println!(
        "countries: {} with errors, counts {}..{}",
        countries.counts.len(),
        countries.min_positive,
        countries.max_count
    );

    let breakdown = errdash::agg::rat_breakdown(&records);
    for slice in &breakdown.slices {
        println!("rat: {} {}(ea) {:.1}%", slice.rat, slice.count, slice.percentage);
    }

    let words = errdash::agg::message_counts(&records);
    println!("messages: {} distinct", words.len());
    for entry in words.iter().take(args.top_words) {
        println!("  {}(ea)  {}", entry.count, entry.text);
    }

    Ok(())
}
