//! Forecast CLI Module
//!
//! Command-line interface for running forecasts on CSV files and serving the
//! HTTP API.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{load_csv_path, Dataset};
use crate::pipeline::{run_forecast, ForecastOutput};
use crate::preprocessing::{prepare_columns, ForecastConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn line_box_top() {
    println!("  {}", dim("┌─────────────────────────────────────────────────────────┐"));
}
fn line_box_bottom() {
    println!("  {}", dim("└─────────────────────────────────────────────────────────┘"));
}
fn line_box_sep() {
    println!("  {}", dim("├─────────────────────────────────────────────────────────┤"));
}

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() {
    line_box("");
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
            continue;
        }
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "forecast-automl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Engineer time-series features and forecast a target column from a CSV")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Column roles shared by the data commands
#[derive(Args, Debug, Clone)]
pub struct ColumnArgs {
    /// Input CSV file
    #[arg(short, long)]
    pub data: PathBuf,

    /// Date column name
    #[arg(long)]
    pub date_column: String,

    /// Target column name
    #[arg(short, long)]
    pub target: String,

    /// Predictor column names, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub predictors: Vec<String>,

    /// Category column names, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,
}

impl ColumnArgs {
    fn to_config(&self) -> ForecastConfig {
        ForecastConfig {
            date_column: self.date_column.clone(),
            category_columns: self.categories.clone(),
            target: self.target.clone(),
            predictors: self.predictors.clone(),
            selected_features: None,
            model_type: "ensemble".to_string(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Run a forecast on a CSV file
    Predict {
        #[command(flatten)]
        columns: ColumnArgs,

        /// Engineered features to train on, comma separated
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// linear, random_forest, xgboost, all or ensemble
        #[arg(short, long, default_value = "ensemble")]
        model_type: String,

        /// Write the JSON result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the engineered features available for a CSV file
    Features {
        #[command(flatten)]
        columns: ColumnArgs,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn load_data(path: &Path) -> anyhow::Result<Dataset> {
    step_run("Loading data");
    let start = Instant::now();
    let dataset = load_csv_path(path)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        dataset.height(),
        dataset.width(),
        start.elapsed()
    ));
    Ok(dataset)
}

pub fn cmd_predict(
    columns: &ColumnArgs,
    features: &[String],
    model_type: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Forecast");

    let dataset = load_data(&columns.data)?;
    let mut config = columns.to_config().with_model_type(model_type);
    if !features.is_empty() {
        config.selected_features = Some(features.to_vec());
    }

    step_run(&format!("Training {}", model_type.cyan()));
    let start = Instant::now();
    let result = run_forecast(dataset, &config)?;
    step_done(&format!("{:?}", start.elapsed()));

    print_metrics(&result);

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!();
            println!("  {} {}", ok("✓"), kv("Saved result to", &path.display().to_string()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_metrics(result: &ForecastOutput) {
    section("Metrics");
    println!(
        "  {:<16} {:>14} {:>14}",
        muted("model"),
        muted("mae"),
        muted("rmse")
    );
    for (model, metrics) in &result.metrics {
        println!("  {:<16} {:>14.4} {:>14.4}", model, metrics.mae, metrics.rmse);
    }

    for (model, importances) in &result.feature_importance {
        let mut ranked: Vec<(&String, &f64)> = importances.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1));
        section(&format!("Top features · {}", model));
        for (feature, weight) in ranked.into_iter().take(5) {
            println!("  {:<32} {:>8.4}", feature, weight);
        }
    }
}

pub fn cmd_features(columns: &ColumnArgs) -> anyhow::Result<()> {
    section("Features");

    let mut dataset = load_data(&columns.data)?;
    let prepared = prepare_columns(&mut dataset, &columns.to_config())?;

    for feature in &prepared.features.available {
        println!("  {}", feature);
    }
    for encoded in &prepared.encoded_categories {
        println!("  {} {}", encoded, dim("(category)"));
    }
    Ok(())
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Forecast API".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Upload ", &format!("http://{}:{}/api/upload", config.host, config.port)));
    line_box(&kv("Predict", &format!("http://{}:{}/api/predict", config.host, config.port)));
    line_box(&kv("Health ", &format!("http://{}:{}/api/health", config.host, config.port)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}
