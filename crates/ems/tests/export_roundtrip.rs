//! CSV and PDF downloads produced through [`ReportExporter`], read back where the format allows.

use chrono::NaiveDate;
use ems::export::{ExportError, ExportFormat, ReportExporter, ReportSection};
use ems::records::{
    sample_state, AttendanceEntry, AttendanceStatus, Month, SalaryId, SalaryRecord, SalaryStatus,
};
use ems::reports::{ReportDataset, ReportQuery};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

fn seeded_dataset() -> ReportDataset {
    let state = sample_state();
    ReportDataset {
        employees: state.employees,
        departments: state.departments,
        leaves: state.leaves,
        salaries: state.salaries,
        register: state.register,
        attendance_log: state.attendance_log,
        payslips: state.payslips,
    }
}

fn read_rows(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|row| row.expect("row").iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn attendance_csv_survives_quoting_and_sorting() {
    let dataset = ReportDataset {
        attendance_log: vec![
            AttendanceEntry {
                date: date(4),
                status: AttendanceStatus::Absent,
                check_in: None,
                check_out: None,
                note: "He said, \"ok\"".to_string(),
            },
            AttendanceEntry {
                date: date(3),
                status: AttendanceStatus::Present,
                check_in: Some("09:02".to_string()),
                check_out: Some("18:10".to_string()),
                note: String::new(),
            },
        ],
        ..ReportDataset::default()
    };

    let artifact = ReportExporter::default()
        .export(
            ReportSection::Attendance,
            ExportFormat::Csv,
            &dataset,
            &ReportQuery::default(),
        )
        .expect("export");
    assert_eq!(artifact.file_name, "attendance-report.csv");
    assert_eq!(artifact.content_type, mime::TEXT_CSV);

    let (headers, rows) = read_rows(&artifact.bytes);
    assert_eq!(headers, ["Date", "Status", "Check In", "Check Out", "Note"]);
    assert_eq!(
        rows,
        [
            vec!["2024-06-03", "Present", "09:02", "18:10", ""],
            vec!["2024-06-04", "Absent", "-", "-", "He said, \"ok\""],
        ]
    );
}

#[test]
fn salary_csv_matches_filtered_employees() {
    let query = ReportQuery {
        q: Some("hr".to_string()),
        ..ReportQuery::default()
    };
    let artifact = ReportExporter::default()
        .export(ReportSection::Salary, ExportFormat::Csv, &seeded_dataset(), &query)
        .expect("export");

    let (headers, rows) = read_rows(&artifact.bytes);
    assert_eq!(headers, ["Name", "Department", "Salary"]);
    assert_eq!(
        rows,
        [vec!["Amit", "HR", "50000"], vec!["Sonal", "HR", "52000"]]
    );
}

#[test]
fn empty_dataset_exports_header_only_csv_and_valid_pdf() {
    let exporter = ReportExporter::default();
    let empty = ReportDataset::default();
    let query = ReportQuery::default();

    let csv = exporter
        .export(ReportSection::Salary, ExportFormat::Csv, &empty, &query)
        .expect("csv");
    assert_eq!(csv.bytes, b"Name,Department,Salary\n");

    let page = exporter.page(ReportSection::Salary, &empty, &query);
    assert_eq!(page.summary, ["Total Employees: 0", "Total Salary: ₹0"]);

    for section in ReportSection::ALL {
        let pdf = exporter
            .export(section, ExportFormat::Pdf, &empty, &query)
            .expect("pdf");
        assert!(pdf.bytes.starts_with(b"%PDF"), "{section} pdf header");
        assert_eq!(pdf.file_name, format!("{}-report.pdf", section.key()));
    }
}

#[test]
fn every_seeded_section_renders_to_pdf() {
    let exporter = ReportExporter::new("Rs.");
    let dataset = seeded_dataset();
    for section in ReportSection::ALL {
        let artifact = exporter
            .export(section, ExportFormat::Pdf, &dataset, &ReportQuery::default())
            .expect("pdf");
        assert_eq!(artifact.content_type, mime::APPLICATION_PDF);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}

#[test]
fn monthly_receipts_bundle_only_that_month() {
    let salary = |id, name: &str, month| SalaryRecord {
        id: SalaryId(id),
        employee_name: name.to_string(),
        department: Some("IT".to_string()),
        month,
        amount: 30000.0,
        status: SalaryStatus::Paid,
    };
    let salaries = vec![
        salary(1, "Priya", Month::June),
        salary(2, "Deepak", Month::April),
    ];

    let exporter = ReportExporter::default();
    let bundle = exporter
        .monthly_receipts(&salaries, Month::June)
        .expect("bundle");
    assert_eq!(bundle.file_name, "Salary-Receipts-June.pdf");
    assert!(bundle.bytes.starts_with(b"%PDF"));

    let missing = exporter.monthly_receipts(&salaries, Month::March);
    assert!(matches!(missing, Err(ExportError::NothingToExport(_))));
}
