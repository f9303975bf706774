use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};

use imdae::config;
use imdae::error::Error;
use imdae::export;
use imdae::logger::setup_logger;
use imdae::map;
use imdae::models::district::{find_district, load_districts};
use imdae::pipeline::filter::{filter_records, FilterCriteria, RangeFilter};
use imdae::pipeline::{CancelFlag, Progress, RentPipeline};
use imdae::stats;

/// Collects Seoul rental-contract records for one district, geocodes them,
/// filters by deposit/rent/period ranges and writes a CSV.
#[derive(Parser, Debug)]
#[command(name = "imdae")]
struct Cli {
    /// District code or name, e.g. 11680 or 강남구
    #[arg(long)]
    district: Option<String>,

    /// Print the administrative code table and exit
    #[arg(long)]
    list_districts: bool,

    /// Records per page request (1..=1000)
    #[arg(long)]
    page_size: Option<u64>,

    /// Deposit range in 만원, e.g. 0..50000
    #[arg(long)]
    deposit: Option<String>,

    /// Rent range in 만원, e.g. 0..300
    #[arg(long)]
    rent: Option<String>,

    /// Contract-period range in months, e.g. 12..24
    #[arg(long)]
    period: Option<String>,

    /// Directory for the CSV export
    #[arg(long)]
    out: Option<PathBuf>,

    /// Abort the collection when any page request fails
    #[arg(long)]
    fail_fast: bool,

    /// Print per-month and per-dong breakdowns
    #[arg(long)]
    breakdown: bool,
}

fn parse_range(raw: &str) -> Result<RangeFilter> {
    let (min, max) = raw
        .split_once("..")
        .ok_or_else(|| anyhow!("range must look like <min>..<max>, got '{raw}'"))?;
    let min: f64 = min.trim().parse().context("range minimum is not a number")?;
    let max: f64 = max.trim().parse().context("range maximum is not a number")?;
    Ok(RangeFilter::new(min, max))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let cli = Cli::parse();

    let mut config = config::read_config();
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if cli.fail_fast {
        config.fail_fast = true;
    }

    let districts = load_districts(Path::new(&config.district_code_path))?;

    if cli.list_districts {
        for district in &districts {
            println!("{}  {}", district.code, district.name);
        }
        return Ok(());
    }

    let query = cli
        .district
        .context("--district is required (try --list-districts)")?;
    let district = find_district(&districts, &query)
        .with_context(|| format!("unknown district '{query}'"))?
        .clone();

    let config = Arc::new(config);
    let pipeline = RentPipeline::new(config.clone());

    let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Cancellation requested, stopping after the current call");
                cancel.store(true, Ordering::Release);
            }
        });
    }

    let dataset = match pipeline
        .run(&district, &cancel, |progress| match progress {
            Progress::Page { done, total } => info!("Fetched page {done}/{total}"),
            Progress::Geocode { done, total } => {
                if done % 50 == 0 || done == total {
                    info!("Geocoded {done}/{total} addresses");
                }
            }
        })
        .await
    {
        Ok(dataset) => dataset,
        Err(Error::EmptyResult(message)) => {
            error!("{message}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut criteria = FilterCriteria::from_records(&dataset.records);
    if let Some(raw) = &cli.deposit {
        criteria.deposit = parse_range(raw)?;
    }
    if let Some(raw) = &cli.rent {
        criteria.rent = parse_range(raw)?;
    }
    if let Some(raw) = &cli.period {
        criteria.period = Some(parse_range(raw)?);
    }

    let filtered = filter_records(&dataset.records, &criteria);
    info!(
        "{} of {} records match the filter",
        filtered.len(),
        dataset.records.len()
    );

    let summary = stats::summarize(&filtered);
    println!("자치구: {} ({})", district.name, district.code);
    println!("조회 결과: {}건", summary.total);
    if let Some(mean_deposit) = summary.mean_deposit {
        println!("평균 보증금: {mean_deposit:.0}만원");
    }
    if let Some(mean_rent) = summary.mean_rent {
        println!("평균 임대료: {mean_rent:.0}만원");
    }

    if cli.breakdown {
        println!("\n월별 평균 (보증금/임대료/면적):");
        for (month, group) in stats::monthly_breakdown(&filtered) {
            println!(
                "  {month}  {}건  {:?} / {:?} / {:?}",
                group.count, group.mean_deposit, group.mean_rent, group.mean_area
            );
        }
        println!("\n법정동별 평균 (보증금/임대료):");
        for (dong, group) in stats::dong_breakdown(&filtered) {
            println!(
                "  {dong}  {}건  {:?} / {:?}",
                group.count, group.mean_deposit, group.mean_rent
            );
        }
    }

    let markers = map::build_markers(&filtered);
    if let Some(center) = map::map_center(&filtered) {
        info!(
            "{} map markers, centered at ({:.6}, {:.6})",
            markers.len(),
            center.latitude,
            center.longitude
        );
    }

    let out_dir = cli
        .out
        .or_else(|| config.export_dir.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = export::export_csv(&filtered, &out_dir, dataset.collected_at)?;
    info!("Wrote {}", path.display());

    Ok(())
}
