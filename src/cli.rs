//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_protocol_report_adapter::CsvProtocolReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_health_check_settings, build_indicator_settings, log_format, log_level, quotations_dir,
    validate_config,
};
use crate::domain::error::QuotewatchError;
use crate::domain::health_check::{HealthCheckEngine, HealthCheckProfile, Protocol};
use crate::domain::indicator::IndicatorSet;
use crate::domain::indicator::calculator::IndicatorCalculator;
use crate::domain::indicator::ranking::rank_all;
use crate::logging::{LogFormat, init_logging};
use crate::ports::quotation_port::QuotationPort;
use crate::ports::report_port::ProtocolReportPort;

#[derive(Parser, Debug)]
#[command(name = "quotewatch", about = "Stock health checks and technical indicators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the health check of an instrument from a start date
    Check {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        instrument: String,
        #[arg(long)]
        start_date: NaiveDate,
        /// confirmations, selling-into-strength or selling-into-weakness
        #[arg(long)]
        profile: Option<HealthCheckProfile>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the indicator set of a quotation
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        instrument: String,
        /// First quotation at or after this date; defaults to the most recent
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Rank instruments by relative strength
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols; defaults to every instrument with data
        #[arg(long, value_delimiter = ',')]
        instruments: Vec<String>,
    },
    /// List instruments with quotation data
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Check {
            config,
            instrument,
            start_date,
            profile,
            output,
        } => run_check(&config, &instrument, start_date, profile, output.as_deref()),
        Command::Indicators {
            config,
            instrument,
            date,
        } => run_indicators(&config, &instrument, date),
        Command::Rank {
            config,
            instruments,
        } => run_rank(&config, &instruments),
        Command::List { config } => run_list(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuotewatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Wired-up adapters and engines for one command.
pub struct Context {
    pub quotations: CsvAdapter,
    pub calculator: IndicatorCalculator,
    pub engine: HealthCheckEngine,
}

/// Loads and validates the config, starts logging and builds the context.
pub fn prepare(config_path: &Path) -> Result<Context, ExitCode> {
    let config = load_config(config_path)?;

    if let Err(e) = validate_config(&config) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    let format = log_format(&config)
        .parse::<LogFormat>()
        .unwrap_or_default();
    init_logging(&log_level(&config), format);
    tracing::info!(config = %config_path.display(), "loaded config");

    let fail = |e: QuotewatchError| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    };
    let settings = build_indicator_settings(&config).map_err(fail)?;
    let health_check = build_health_check_settings(&config).map_err(fail)?;

    Ok(Context {
        quotations: CsvAdapter::new(quotations_dir(&config)),
        calculator: IndicatorCalculator::new(settings),
        engine: HealthCheckEngine::new(health_check),
    })
}

fn report(result: Result<(), QuotewatchError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_check(
    config_path: &Path,
    instrument: &str,
    start_date: NaiveDate,
    profile: Option<HealthCheckProfile>,
    output_path: Option<&Path>,
) -> ExitCode {
    let ctx = match prepare(config_path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let protocol = match check_pipeline(
        &ctx.quotations,
        &ctx.calculator,
        &ctx.engine,
        instrument,
        start_date,
        profile,
    ) {
        Ok(protocol) => protocol,
        Err(e) => return report(Err(e)),
    };

    print!("{}", format_protocol(instrument, &protocol));
    match output_path {
        Some(path) => report(CsvProtocolReportAdapter::new().write(&protocol, instrument, path)),
        None => ExitCode::SUCCESS,
    }
}

/// Loads an instrument, computes its indicators and runs the health check.
pub fn check_pipeline(
    quotations: &dyn QuotationPort,
    calculator: &IndicatorCalculator,
    engine: &HealthCheckEngine,
    instrument: &str,
    start_date: NaiveDate,
    profile: Option<HealthCheckProfile>,
) -> Result<Protocol, QuotewatchError> {
    let mut history = quotations.fetch_history(instrument)?;
    tracing::info!(instrument, quotations = history.len(), "loaded history");

    calculator.calculate_all(&mut history);

    let protocol = match profile {
        Some(profile) => {
            tracing::info!(instrument, %profile, %start_date, "running health check");
            engine.check_instrument_with_profile(&history, start_date, profile)?
        }
        None => {
            tracing::info!(instrument, %start_date, "running health check");
            engine.check_instrument(&history, start_date)?
        }
    };
    Ok(protocol)
}

pub fn format_protocol(instrument: &str, protocol: &Protocol) -> String {
    let mut out = format!("=== Health check: {instrument} ===\n");
    for entry in protocol.entries() {
        out.push_str(&format!(
            "{}  {:<12}  {}\n",
            entry.date,
            entry.category.to_string(),
            entry.text
        ));
    }

    let stats = protocol.statistics();
    out.push_str(&format!(
        "\nConfirmations: {:>4} ({}%)\n",
        stats.confirmations, stats.confirmation_percentage
    ));
    out.push_str(&format!(
        "Violations:    {:>4} ({}%)\n",
        stats.violations, stats.violation_percentage
    ));
    out.push_str(&format!(
        "Uncertain:     {:>4} ({}%)\n",
        stats.uncertain, stats.uncertain_percentage
    ));
    out
}

fn run_indicators(config_path: &Path, instrument: &str, date: Option<NaiveDate>) -> ExitCode {
    let ctx = match prepare(config_path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    report(
        indicator_pipeline(&ctx.quotations, &ctx.calculator, instrument, date)
            .map(|set| print!("{}", format_indicator_set(instrument, &set))),
    )
}

/// Indicator set of the first quotation at or after `date`, or of the most
/// recent quotation.
pub fn indicator_pipeline(
    quotations: &dyn QuotationPort,
    calculator: &IndicatorCalculator,
    instrument: &str,
    date: Option<NaiveDate>,
) -> Result<IndicatorSet, QuotewatchError> {
    let mut history = quotations.fetch_history(instrument)?;
    calculator.calculate_all(&mut history);

    let index = match date {
        Some(date) => history.index_of_date(date).ok_or_else(|| QuotewatchError::Data {
            reason: format!("no quotation of {instrument} at or after {date}"),
        })?,
        None => 0,
    };

    history
        .get(index)
        .and_then(|q| q.indicators.clone())
        .ok_or_else(|| QuotewatchError::Data {
            reason: format!("not enough history of {instrument} for indicators"),
        })
}

pub fn format_indicator_set(instrument: &str, set: &IndicatorSet) -> String {
    let rows: [(&str, String); 23] = [
        ("SMA(10)", set.sma10.to_string()),
        ("SMA(20)", set.sma20.to_string()),
        ("SMA(50)", set.sma50.to_string()),
        ("SMA(150)", set.sma150.to_string()),
        ("SMA(200)", set.sma200.to_string()),
        ("EMA(10)", set.ema10.to_string()),
        ("EMA(21)", set.ema21.to_string()),
        ("SMA(30) volume", set.sma30_volume.to_string()),
        ("Bollinger BandWidth", set.bollinger_bandwidth.to_string()),
        ("ATR percent", set.atr_percent.to_string()),
        ("Stochastic", set.stochastic.to_string()),
        ("Slow Stochastic", set.slow_stochastic.to_string()),
        ("Performance 5 days", set.performance_5_days.to_string()),
        ("RS percent sum", set.rs_percent_sum.to_string()),
        ("RS number", set.rs_number.to_string()),
        ("RS number 52w high", set.rs_number_distance_52_week_high.to_string()),
        ("RS number U/D volume", set.rs_number_up_down_volume_ratio.to_string()),
        ("Base length (weeks)", set.base_length_weeks.to_string()),
        ("Volume differential", set.volume_differential.to_string()),
        ("Distance 52w high", set.distance_to_52_week_high.to_string()),
        ("Distance 52w low", set.distance_to_52_week_low.to_string()),
        ("U/D volume ratio", set.up_down_volume_ratio.to_string()),
        ("Liquidity", set.liquidity.to_string()),
    ];

    let mut out = format!("=== Indicators: {instrument} {} ===\n", set.date);
    for (label, value) in &rows {
        out.push_str(&format!("{label:<22}{value}\n"));
    }
    out
}

fn run_rank(config_path: &Path, instruments: &[String]) -> ExitCode {
    let ctx = match prepare(config_path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let symbols = if instruments.is_empty() {
        match ctx.quotations.list_instruments() {
            Ok(symbols) => symbols,
            Err(e) => return report(Err(e)),
        }
    } else {
        normalize_instruments(instruments)
    };

    let ranked = rank_pipeline(&ctx.quotations, &ctx.calculator, &symbols);
    if ranked.is_empty() {
        return report(Err(QuotewatchError::NoData {
            instrument: symbols.join(","),
        }));
    }
    print!("{}", format_ranking(&ranked));
    ExitCode::SUCCESS
}

/// Trims symbols and drops blanks. Case is kept, symbols name quotation files.
pub fn normalize_instruments(instruments: &[String]) -> Vec<String> {
    instruments
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Most recent indicator set of each instrument, ranked on all criteria.
/// Instruments that cannot be loaded or lack a most recent set are skipped.
pub fn rank_pipeline(
    quotations: &dyn QuotationPort,
    calculator: &IndicatorCalculator,
    symbols: &[String],
) -> Vec<(String, IndicatorSet)> {
    let mut names = Vec::with_capacity(symbols.len());
    let mut population = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let history = match quotations.fetch_history(symbol) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(instrument = %symbol, error = %e, "skipping instrument");
                continue;
            }
        };
        match calculator.calculate(0, &history) {
            Some(set) => {
                names.push(symbol.clone());
                population.push(set);
            }
            None => tracing::warn!(
                instrument = %symbol,
                quotations = history.len(),
                "skipping instrument with too little history"
            ),
        }
    }

    tracing::info!(instruments = population.len(), "ranking population");
    rank_all(&mut population);

    let mut ranked: Vec<(String, IndicatorSet)> = names.into_iter().zip(population).collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| {
        b.rs_number.cmp(&a.rs_number).then_with(|| a_name.cmp(b_name))
    });
    ranked
}

pub fn format_ranking(ranked: &[(String, IndicatorSet)]) -> String {
    let mut out = format!(
        "{:<10} {:>10} {:>4} {:>10} {:>4} {:>10} {:>4}\n",
        "Symbol", "RS sum", "RS", "52w high", "RS", "U/D vol", "RS"
    );
    for (symbol, set) in ranked {
        out.push_str(&format!(
            "{:<10} {:>10} {:>4} {:>10} {:>4} {:>10} {:>4}\n",
            symbol,
            set.rs_percent_sum,
            set.rs_number,
            set.distance_to_52_week_high,
            set.rs_number_distance_52_week_high,
            set.up_down_volume_ratio,
            set.rs_number_up_down_volume_ratio,
        ));
    }
    out
}

fn run_list(config_path: &Path) -> ExitCode {
    let ctx = match prepare(config_path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let symbols = match ctx.quotations.list_instruments() {
        Ok(symbols) => symbols,
        Err(e) => return report(Err(e)),
    };

    if symbols.is_empty() {
        eprintln!(
            "No instruments found in {}",
            ctx.quotations.base_path().display()
        );
    } else {
        for symbol in &symbols {
            println!("{symbol}");
        }
        tracing::info!(instruments = symbols.len(), "listed instruments");
    }
    ExitCode::SUCCESS
}
