//! CSV and PDF export of report sections, salary receipts and monthly receipt bundles.

pub mod layout;
mod pdf;
mod sections;
mod table_csv;

use std::fmt;
use std::str::FromStr;

use mime::Mime;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::records::{Month, SalaryRecord};
use crate::reports::{ReportDataset, ReportQuery};

pub use layout::{Cell, ReportDocument, ReportPage, ReportTable, Theme};
pub use pdf::ascii as printable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    Salary,
    Department,
    Performance,
    Leave,
    Analytics,
    Attendance,
    Payslip,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::Salary,
        ReportSection::Department,
        ReportSection::Performance,
        ReportSection::Leave,
        ReportSection::Analytics,
        ReportSection::Attendance,
        ReportSection::Payslip,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            ReportSection::Salary => "salary",
            ReportSection::Department => "department",
            ReportSection::Performance => "performance",
            ReportSection::Leave => "leave",
            ReportSection::Analytics => "analytics",
            ReportSection::Attendance => "attendance",
            ReportSection::Payslip => "payslip",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            ReportSection::Salary => "Employee Salary Report",
            ReportSection::Department => "Department Report",
            ReportSection::Performance => "Performance Report",
            ReportSection::Leave => "Leave Report",
            ReportSection::Analytics => "Analytics Report",
            ReportSection::Attendance => "Attendance Report",
            ReportSection::Payslip => "Payslip Statement",
        }
    }

    pub fn theme(self) -> Theme {
        sections::theme(self)
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReportSection {
    type Err = ExportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ExportError::UnknownSection(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Pdf,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> Mime {
        match self {
            ExportFormat::Csv => mime::TEXT_CSV,
            ExportFormat::Pdf => mime::APPLICATION_PDF,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownFormat(raw.to_string())),
        }
    }
}

/// A rendered file ready to be downloaded or written to disk.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// `Content-Disposition` value that makes browsers save the file.
    pub fn disposition(&self) -> String {
        let name = printable(&self.file_name).replace('"', "'");
        format!("attachment; filename=\"{name}\"")
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown report section `{0}`")]
    UnknownSection(String),
    #[error("unknown export format `{0}`")]
    UnknownFormat(String),
    #[error("no salary records for {0}")]
    NothingToExport(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Pdf(#[from] printpdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders sections and receipts with a fixed currency prefix.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    currency: String,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl ReportExporter {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Page model for a section, before rendering.
    pub fn page(
        &self,
        section: ReportSection,
        dataset: &ReportDataset,
        query: &ReportQuery,
    ) -> ReportPage {
        sections::build_page(section, dataset, query, &self.currency)
    }

    pub fn export(
        &self,
        section: ReportSection,
        format: ExportFormat,
        dataset: &ReportDataset,
        query: &ReportQuery,
    ) -> Result<ExportArtifact, ExportError> {
        let page = self.page(section, dataset, query);
        let rows = page.table.rows.len();
        let bytes = match format {
            ExportFormat::Csv => table_csv::write_table(&page.table)?,
            ExportFormat::Pdf => pdf::render(&ReportDocument::single(page), &self.currency)?,
        };
        info!(%section, %format, rows, "report exported");

        Ok(ExportArtifact {
            file_name: format!("{}-report.{}", section.key(), format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }

    pub fn receipt(&self, record: &SalaryRecord) -> Result<ExportArtifact, ExportError> {
        let page = sections::receipt_page(record, &self.currency);
        let bytes = pdf::render(&ReportDocument::single(page), &self.currency)?;
        info!(salary = %record.id, "salary receipt exported");

        Ok(ExportArtifact {
            file_name: format!(
                "Salary-Receipt-{}-{}.pdf",
                record.employee_name, record.month
            ),
            content_type: mime::APPLICATION_PDF,
            bytes,
        })
    }

    /// One receipt page per salary record of `month`.
    pub fn monthly_receipts(
        &self,
        records: &[SalaryRecord],
        month: Month,
    ) -> Result<ExportArtifact, ExportError> {
        let pages: Vec<ReportPage> = sections::receipts_for_month(records, month)
            .map(|record| sections::receipt_page(record, &self.currency))
            .collect();
        if pages.is_empty() {
            return Err(ExportError::NothingToExport(month.to_string()));
        }

        let document = ReportDocument {
            title: format!("Salary Receipts {month}"),
            pages,
        };
        let bytes = pdf::render(&document, &self.currency)?;
        info!(
            %month,
            receipts = document.pages.len(),
            rows = document.row_count(),
            "monthly receipts exported"
        );

        Ok(ExportArtifact {
            file_name: format!("Salary-Receipts-{month}.pdf"),
            content_type: mime::APPLICATION_PDF,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_parse_case_insensitively() {
        assert_eq!("Salary".parse::<ReportSection>().ok(), Some(ReportSection::Salary));
        assert_eq!(" payslip ".parse::<ReportSection>().ok(), Some(ReportSection::Payslip));
        assert!(matches!(
            "bonus".parse::<ReportSection>(),
            Err(ExportError::UnknownSection(_))
        ));
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn artifact_names_follow_section_and_format() {
        let artifact = ReportExporter::default()
            .export(
                ReportSection::Leave,
                ExportFormat::Csv,
                &ReportDataset::default(),
                &ReportQuery::default(),
            )
            .expect("exports");
        assert_eq!(artifact.file_name, "leave-report.csv");
        assert_eq!(artifact.content_type, mime::TEXT_CSV);
        assert_eq!(artifact.bytes, b"Name,Department,Leaves\n");
        assert_eq!(
            artifact.disposition(),
            "attachment; filename=\"leave-report.csv\""
        );
    }

    #[test]
    fn empty_month_has_nothing_to_export() {
        let result = ReportExporter::default().monthly_receipts(&[], Month::March);
        assert!(matches!(result, Err(ExportError::NothingToExport(month)) if month == "March"));
    }
}
