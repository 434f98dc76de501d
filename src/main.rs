use bill_profit_matcher::{ingest, AppConfig, ItemMatcher};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// 采购/销售单据明细匹配与盈亏计算
#[derive(Parser)]
#[command(name = "bill-profit-matcher")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 匹配一组采购/销售明细文件 (.json / .csv)
    Match {
        #[arg(long)]
        purchases: PathBuf,
        #[arg(long)]
        sales: PathBuf,
        /// 匹配器配置文件 (toml / json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// 覆盖配置中的匹配阈值
        #[arg(long)]
        threshold: Option<f64>,
        /// 输出文件，缺省输出到 stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 按清单并行匹配多组单据
    Batch {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// 输出报告
#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    generated_at: DateTime<Local>,
    match_threshold: f64,
    result: &'a T,
}

fn build_matcher(
    config: Option<&Path>,
    threshold: Option<f64>,
) -> Result<ItemMatcher, Box<dyn std::error::Error>> {
    let mut cfg = AppConfig::load(config)?.matcher;
    if let Some(t) = threshold {
        cfg = cfg.with_threshold(t);
    }
    info!("Matcher config: {:?}", cfg);
    Ok(ItemMatcher::new(cfg)?)
}

fn write_report<T: Serialize>(
    matcher: &ItemMatcher,
    result: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = Report {
        generated_at: Local::now(),
        match_threshold: matcher.config().match_threshold,
        result,
    };

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式，输出到 stderr，stdout 留给报告
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            purchases,
            sales,
            config,
            threshold,
            output,
        } => {
            let matcher = build_matcher(config.as_deref(), threshold)?;
            let purchase_items = ingest::load_purchases(&purchases)?;
            let sale_items = ingest::load_sales(&sales)?;
            info!(
                "Loaded {} purchase items, {} sale items",
                purchase_items.len(),
                sale_items.len()
            );

            let outcome = matcher.match_items(&purchase_items, &sale_items);
            write_report(&matcher, &outcome, output.as_deref())?;
        }
        Commands::Batch {
            manifest,
            config,
            output,
        } => {
            let matcher = build_matcher(config.as_deref(), None)?;
            let pairs = ingest::load_manifest(&manifest)?;
            info!("Loaded {} bill pairs from {}", pairs.len(), manifest.display());

            let entries = matcher.match_batch(&pairs);
            write_report(&matcher, &entries, output.as_deref())?;
        }
    }

    Ok(())
}
