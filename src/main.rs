//! fx-cashflow CLI
//!
//! Convert an FX trade export into aggregated cashflows and forward-points PnL.
//!
//! # Usage
//!
//! ```bash
//! # Aggregate cashflows, no market data
//! fx-cashflow run --input trades.csv
//!
//! # With a forward points report and folder exclusions
//! fx-cashflow run --input trades.csv --points points.csv --ignore-folders TEST,ARCHIVE
//!
//! # Generate a synthetic trade book and matching points report
//! fx-cashflow generate --trades 200 --output trades.csv --points-output points.csv
//! ```

use chrono::NaiveDate;
use fx_cashflow_engine::core::parsing::parse_date_with;
use fx_cashflow_engine::curve::forward_points::ForwardPointsCurve;
use fx_cashflow_engine::engine::aggregation::aggregate;
use fx_cashflow_engine::engine::expansion::CashflowEngine;
use fx_cashflow_engine::engine::horizon::HorizonSummary;
use fx_cashflow_engine::io::config::{OutputFormat, RunConfig};
use fx_cashflow_engine::io::points_report::load_curve;
use fx_cashflow_engine::io::report::{write_cashflow_csv_file, RunReport};
use fx_cashflow_engine::io::trades::read_trades;
use fx_cashflow_engine::simulation::trade_generator::{
    generate_points_report, generate_trade_book, TradeBookConfig,
};
use log::info;
use std::path::PathBuf;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-cashflow — FX trade cashflow expansion and forward-points PnL

USAGE:
    fx-cashflow <COMMAND> [OPTIONS]

COMMANDS:
    run         Expand trades into aggregated cashflows and PnL
    generate    Generate a synthetic trade book (for testing)
    help        Show this message

OPTIONS (run):
    --input <FILE>            Trade detail CSV (required)
    --points <FILE>           Forward points report CSV
    --ignore-folders <LIST>   Comma-separated folders to exclude
    --filter-config <FILE>    JSON file with {{"ignore_folders": [...]}}
    --out-dir <DIR>           Output directory (default: generatedFile)
    --out-csv <NAME>          Aggregated CSV file name (default: cashflows_agg.csv)
    --format <FORMAT>         Report on stdout: text (default) or json
    --as-of <DATE>            Horizon summary reference date (YYYY-MM-DD)

OPTIONS (generate):
    --trades <N>              Number of trades (default: 100)
    --pairs <LIST>            Comma-separated pairs (default: EUR/USD,USD/JPY,GBP/USD)
    --start <DATE>            Earliest value date (YYYY-MM-DD)
    --output <FILE>           Trade CSV output (default: stdout)
    --points-output <FILE>    Also write a matching points report

Set RUST_LOG=debug to see every skipped row."#
    );
}

fn next_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    args.get(*i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn parse_date_arg(value: &str, flag: &str) -> NaiveDate {
    parse_date_with(value, &["%Y-%m-%d", "%d/%m/%Y"]).unwrap_or_else(|| {
        eprintln!("{} expects a date like 2024-01-31, got '{}'", flag, value);
        process::exit(1);
    })
}

fn cmd_run(args: &[String]) {
    let mut input: Option<PathBuf> = None;
    let mut config = RunConfig::new("");
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input = Some(next_value(args, &mut i, "--input", "a file path").into()),
            "--points" => {
                config.points = Some(next_value(args, &mut i, "--points", "a file path").into())
            }
            "--ignore-folders" => {
                config.ignore_folders =
                    Some(next_value(args, &mut i, "--ignore-folders", "a folder list"))
            }
            "--filter-config" => {
                config.filter_config =
                    Some(next_value(args, &mut i, "--filter-config", "a file path").into())
            }
            "--out-dir" => {
                config.out_dir = next_value(args, &mut i, "--out-dir", "a directory").into()
            }
            "--out-csv" => config.out_csv = next_value(args, &mut i, "--out-csv", "a file name"),
            "--format" => {
                let value = next_value(args, &mut i, "--format", "'text' or 'json'");
                config.format = OutputFormat::parse(&value).unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--as-of" => {
                let value = next_value(args, &mut i, "--as-of", "a date");
                config.as_of = Some(parse_date_arg(&value, "--as-of"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    config.input = input.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let rows = read_trades(&config.input).unwrap_or_else(|e| {
        eprintln!("Error reading trades: {}", e);
        process::exit(1);
    });
    let filter = config.resolve_filter();
    let curve = match &config.points {
        Some(path) => load_curve(path),
        None => ForwardPointsCurve::empty(),
    };

    let batch = CashflowEngine::with_curve(&curve).process(&rows, &filter);
    let cashflows = aggregate(&batch.legs);

    let csv_path = config.csv_path();
    if let Err(e) = write_cashflow_csv_file(&csv_path, &cashflows) {
        eprintln!("Error writing cashflows: {}", e);
        process::exit(1);
    }
    info!(
        "wrote {} aggregated cashflows to {}",
        cashflows.len(),
        csv_path.display()
    );

    let horizon = config
        .as_of
        .map(|as_of| HorizonSummary::build(&cashflows, as_of));
    let report = RunReport::new(cashflows, batch.pnl, &curve, horizon, batch.summary);

    match config.format {
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding report: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            println!("{}", report);
            println!("Aggregated cashflow CSV: {}", csv_path.display());
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = TradeBookConfig::default();
    let mut output: Option<PathBuf> = None;
    let mut points_output: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--trades" => {
                let value = next_value(args, &mut i, "--trades", "a number");
                config.trade_count = value.parse().unwrap_or_else(|_| {
                    eprintln!("--trades requires a number");
                    process::exit(1);
                });
            }
            "--pairs" => {
                config.pairs = next_value(args, &mut i, "--pairs", "a comma-separated list")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "--start" => {
                let value = next_value(args, &mut i, "--start", "a date");
                config.start_date = parse_date_arg(&value, "--start");
            }
            "--output" => output = Some(next_value(args, &mut i, "--output", "a file path").into()),
            "--points-output" => {
                points_output =
                    Some(next_value(args, &mut i, "--points-output", "a file path").into())
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let rows = generate_trade_book(&config);
    let trades_csv = to_csv(&rows).unwrap_or_else(|e| {
        eprintln!("Error encoding trades: {}", e);
        process::exit(1);
    });

    match &output {
        Some(path) => {
            std::fs::write(path, &trades_csv).unwrap_or_else(|e| {
                eprintln!("Error writing to '{}': {}", path.display(), e);
                process::exit(1);
            });
            eprintln!("Generated {} trades → {}", rows.len(), path.display());
        }
        None => print!("{}", trades_csv),
    }

    if let Some(path) = points_output {
        let points = generate_points_report(&config.pairs, config.start_date);
        let points_csv = to_csv(&points).unwrap_or_else(|e| {
            eprintln!("Error encoding points report: {}", e);
            process::exit(1);
        });
        std::fs::write(&path, points_csv).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path.display(), e);
            process::exit(1);
        });
        eprintln!("Generated points report → {}", path.display());
    }
}

fn to_csv<T: serde::Serialize>(rows: &[T]) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.error().to_string())?;
    Ok(String::from_utf8(bytes)?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "run" => cmd_run(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
