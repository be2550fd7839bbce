use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use mensura_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mensura")]
#[command(about = "Body measurement tracker with trend forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Access password (prompted for when omitted)
    #[arg(long, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show trend views for all measurements (default)
    Report {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Rolling average window in days
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(trend::MAX_ROLLING_WINDOW_DAYS)))]
        window: Option<u32>,

        /// Number of forecast days
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(forecast::MAX_HORIZON_DAYS)))]
        horizon: Option<u32>,
    },

    /// Record a new measurement
    Add {
        /// Measurement date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Weight in kg (30-100)
        #[arg(long)]
        weight: f64,

        /// Waist circumference in cm (50-120)
        #[arg(long)]
        waist: f64,

        /// Chest circumference in cm (50-120)
        #[arg(long)]
        chest: f64,
    },

    /// List stored measurements
    List,

    /// Export all measurements to CSV
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Import measurements from CSV (date,weight,waist,chest)
    Import {
        /// Source file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    mensura_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let gate = AccessGate::from_sources(config.access.password.as_deref());
    let attempt = match cli.password {
        Some(ref password) => password.clone(),
        None => prompt_password()?,
    };
    let session = gate.unlock(&attempt)?;

    let mut log = JsonlLog::in_dir(&data_dir);

    match cli.command {
        Some(Commands::Report {
            format,
            window,
            horizon,
        }) => {
            let mut settings = config.trends.settings();
            if let Some(window) = window {
                settings.rolling_window_days = window;
            }
            if let Some(horizon) = horizon {
                settings.forecast_horizon_days = horizon;
            }
            cmd_report(&session, &log, &settings, format)
        }
        Some(Commands::Add {
            date,
            weight,
            waist,
            chest,
        }) => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_add(&session, &mut log, date, weight, waist, chest)
        }
        Some(Commands::List) => cmd_list(&session, &log),
        Some(Commands::Export { path }) => cmd_export(&session, &log, &path),
        Some(Commands::Import { path }) => cmd_import(&session, &mut log, &path),
        None => {
            // Default to "report" command
            cmd_report(&session, &log, &config.trends.settings(), Format::Text)
        }
    }
}

/// Prompt on stderr so stdout stays clean for `--format json`
fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn cmd_add(
    _session: &Session,
    log: &mut JsonlLog,
    date: NaiveDate,
    weight: f64,
    waist: f64,
    chest: f64,
) -> Result<()> {
    let measurement = NewMeasurement::new(date, weight, waist, chest)?;
    let record = log.append(measurement)?;

    println!("✓ Measurement #{} recorded for {}", record.id, record.date);
    println!(
        "  Weight {:.1} kg · Waist {:.1} cm · Chest {:.1} cm",
        record.weight, record.waist, record.chest
    );
    Ok(())
}

fn cmd_list(_session: &Session, log: &JsonlLog) -> Result<()> {
    let records = log.list_all()?;
    if records.is_empty() {
        println!("No measurements recorded yet.");
        return Ok(());
    }

    println!("{:>5}  {:<10}  {:>8}  {:>8}  {:>8}", "id", "date", "weight", "waist", "chest");
    for r in &records {
        println!(
            "{:>5}  {:<10}  {:>8.1}  {:>8.1}  {:>8.1}",
            r.id, r.date, r.weight, r.waist, r.chest
        );
    }
    Ok(())
}

fn cmd_export(_session: &Session, log: &JsonlLog, path: &Path) -> Result<()> {
    let records = log.list_all()?;
    let count = csv_io::export_csv(&records, path)?;

    println!("✓ Exported {} measurements", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

fn cmd_import(_session: &Session, log: &mut JsonlLog, path: &Path) -> Result<()> {
    let import = csv_io::import_csv(path)?;
    let count = import.measurements.len();
    for measurement in import.measurements {
        log.append(measurement)?;
    }

    println!("✓ Imported {} measurements", count);
    if import.skipped > 0 {
        println!("  Skipped {} invalid rows", import.skipped);
    }
    Ok(())
}

fn cmd_report(
    _session: &Session,
    log: &JsonlLog,
    settings: &TrendSettings,
    format: Format,
) -> Result<()> {
    let records = log.list_all()?;
    let report = TrendReport::build(&records, settings);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => display_report(&report),
    }
    Ok(())
}

fn display_report(report: &TrendReport) {
    if report.is_empty() {
        println!("No measurements recorded yet.");
        println!("Add one with: mensura add --weight <KG> --waist <CM> --chest <CM>");
        return;
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  MEASUREMENT TRENDS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    if let Some(ref latest) = report.latest {
        println!(
            "  Latest ({}): {:.1} kg · waist {:.1} cm · chest {:.1} cm",
            latest.date, latest.weight, latest.waist, latest.chest
        );
    }
    println!("  Records: {}", report.record_count);
    if let Some(change) = report.weight_change {
        println!("  Weight change: {:+.1} kg", change);
    }

    section("Evolution");
    print_series(&report.raw);

    section("Weekly average");
    println!("  {:<10}  {:>3}  {:>8}  {:>8}  {:>8}", "week of", "n", "weight", "waist", "chest");
    for week in &report.weekly {
        println!(
            "  {:<10}  {:>3}  {:>8.2}  {:>8.2}  {:>8.2}",
            week.week_start, week.count, week.weight, week.waist, week.chest
        );
    }

    section(&format!(
        "Rolling average ({} days)",
        report.settings.rolling_window_days
    ));
    print_series(&report.rolling);

    section(&format!(
        "Weight forecast ({} days)",
        report.settings.forecast_horizon_days
    ));
    match &report.forecast {
        ForecastView::Available(forecast) => {
            println!(
                "  Trend: {:+.2} kg/week (r² {:.2})",
                forecast.fit.weekly_rate(),
                forecast.fit.r_squared
            );
            for point in forecast.predicted() {
                println!("  {:<10}  {:>8.2}", point.date, point.weight);
            }
        }
        ForecastView::Omitted { reason } => {
            println!("  Not available: {}", reason);
        }
    }
    println!();
}

fn section(title: &str) {
    println!();
    println!("─── {} ───", title);
}

fn print_series(series: &MeasureSeries) {
    println!("  {:<10}  {:>8}  {:>8}  {:>8}", "date", "weight", "waist", "chest");
    let rows = series.weight.iter().zip(&series.waist).zip(&series.chest);
    for ((weight, waist), chest) in rows {
        println!(
            "  {:<10}  {:>8.2}  {:>8.2}  {:>8.2}",
            weight.date, weight.value, waist.value, chest.value
        );
    }
}
