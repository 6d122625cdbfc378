use crate::cli::SourceArgs;
use crate::infra::{open_store, override_data_source};
use chrono::NaiveDate;
use clap::Args;
use ems::config::AppConfig;
use ems::error::AppError;
use ems::export::{printable, ExportArtifact, ExportFormat, ReportExporter, ReportSection};
use ems::records::{Month, RecordService, RecordStore};
use ems::reports::{build_overview, ReportDataset, ReportQuery};
use ems::telemetry;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Section to export: salary, department, performance, leave, analytics, attendance, payslip
    #[arg(value_parser = crate::infra::parse_section)]
    pub(crate) section: ReportSection,
    /// Output format (csv or pdf)
    #[arg(long, default_value = "pdf", value_parser = crate::infra::parse_format)]
    pub(crate) format: ExportFormat,
    /// Directory the export is written to
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
    /// Case-insensitive search over name, department and employee code
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Earliest join date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Latest join date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ReceiptArgs {
    /// Salary month, e.g. June
    #[arg(long, value_parser = crate::infra::parse_month)]
    pub(crate) month: Month,
    /// Directory the receipts are written to
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Narrow the report portion to matching employees.
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Reporting year for trends (defaults to the latest year in the data).
    #[arg(long)]
    pub(crate) year: Option<i32>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

struct Session {
    service: RecordService<dyn RecordStore>,
    exporter: ReportExporter,
}

async fn open_session(mut source: SourceArgs) -> Result<Session, AppError> {
    let mut config = AppConfig::load()?;
    config.data_source = override_data_source(
        &config.data_source,
        source.data_source.as_deref(),
        source.base_url.take(),
    )?;
    telemetry::init(&config.telemetry)?;

    let store = open_store(&config.data_source)?;
    Ok(Session {
        service: RecordService::new(store),
        exporter: ReportExporter::new(config.reporting.currency_symbol.clone()),
    })
}

fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "export written");
    Ok(path)
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        section,
        format,
        out_dir,
        query,
        from,
        to,
        source,
    } = args;

    let session = open_session(source).await?;
    let dataset = ReportDataset::load(&session.service).await;
    let query = ReportQuery {
        q: query,
        from,
        to,
        year: None,
    };

    let artifact = session.exporter.export(section, format, &dataset, &query)?;
    let path = write_artifact(&out_dir, &artifact)?;
    println!("{} written to {}", section.title(), path.display());
    Ok(())
}

pub(crate) async fn run_receipts(args: ReceiptArgs) -> Result<(), AppError> {
    let session = open_session(args.source).await?;
    let salaries = session.service.salaries().await?;
    let artifact = session.exporter.monthly_receipts(&salaries, args.month)?;
    let path = write_artifact(&args.out_dir, &artifact)?;
    println!("Salary receipts for {} written to {}", args.month, path.display());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        query,
        year,
        source,
    } = args;

    let session = open_session(source).await?;
    let dataset = ReportDataset::load(&session.service).await;
    let query = ReportQuery {
        q: query,
        year,
        ..ReportQuery::default()
    };
    let overview = build_overview(&dataset, &query);
    let currency = printable(session.exporter.currency());

    println!("Employee management demo");
    let counters = &overview.counters;
    println!(
        "Employees: {} | Departments: {} | Pending leaves: {} | Salary paid: {}{}",
        counters.total_employees,
        counters.total_departments,
        counters.pending_leaves,
        currency,
        counters.salary_paid
    );
    if !counters.recent_activity.is_empty() {
        println!("\nRecent activity");
        for activity in &counters.recent_activity {
            println!("  - {}", activity.describe());
        }
    }

    let summary = &overview.summary;
    match query.search() {
        Some(term) => println!("\nReport for '{term}' ({} employees)", summary.total_records),
        None => println!("\nReport for all employees ({})", summary.total_records),
    }
    println!(
        "  Total salary: {}{} | Avg performance: {:.2} | Leaves taken: {}",
        currency, summary.total_amount, summary.overall_performance, summary.overall_leaves
    );

    if summary.department_stats.is_empty() {
        println!("\nDepartments: none matched");
    } else {
        println!("\nDepartments");
        for (name, stat) in summary.department_stats.iter() {
            println!(
                "  {:<12} employees {:>3} | avg salary {}{:.0} | avg performance {:.2}",
                name,
                stat.count,
                currency,
                stat.average_salary(),
                stat.average_performance()
            );
        }
    }

    let active: Vec<_> = summary
        .monthly_series
        .iter()
        .filter(|month| month.total > 0.0 || month.leaves > 0)
        .collect();
    if !active.is_empty() {
        println!("\nMonthly salary and leaves");
        for month in active {
            println!(
                "  {:<10} {}{} | leaves {}",
                month.month.label(),
                currency,
                month.total,
                month.leaves
            );
        }
    }

    println!("\nInsights ({})", overview.analytics.year);
    if overview.analytics.insights.is_empty() {
        println!("  none");
    }
    for line in &overview.analytics.insights {
        println!("  {line}");
    }

    match session.service.attendance_summary(None).await {
        Ok(attendance) => println!(
            "\nAttendance: present {} ({:.1}%) | absent {} ({:.1}%) | longest streak {} days",
            attendance.present,
            attendance.present_pct,
            attendance.absent,
            attendance.absent_pct,
            attendance.longest_streak
        ),
        Err(err) => println!("\nAttendance unavailable: {err}"),
    }

    let exports: Vec<&str> = ReportSection::ALL
        .iter()
        .filter(|section| !session.exporter.page(**section, &dataset, &query).table.is_empty())
        .map(|section| section.key())
        .collect();
    println!(
        "\nSections with data: {} (use `report <section> --format {}`)",
        exports.join(", "),
        ExportFormat::default()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems::records::FixtureStore;
    use std::sync::Arc;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ems-demo-{label}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn artifacts_are_written_under_their_file_name() {
        let service: RecordService<dyn RecordStore> =
            RecordService::new(Arc::new(FixtureStore::seeded()) as Arc<dyn RecordStore>);
        let dataset = ReportDataset::load(&service).await;
        let artifact = ReportExporter::default()
            .export(
                ReportSection::Department,
                ExportFormat::Csv,
                &dataset,
                &ReportQuery::default(),
            )
            .expect("export");

        let dir = temp_dir("csv");
        let path = write_artifact(&dir, &artifact).expect("written");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("department-report.csv"));
        let written = std::fs::read(&path).expect("readable");
        assert_eq!(written, artifact.bytes);
        std::fs::remove_dir_all(dir).ok();
    }
}
