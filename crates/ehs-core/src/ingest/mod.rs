//! CSV ingest for monthly EHS report exports and the project register.

mod mapping;
mod parser;

use crate::analytics::domain::{MetricRecord, Project, ProjectId};
use std::fmt;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidMonth {
        line: usize,
        month: u32,
    },
    DuplicateReport {
        project_id: ProjectId,
        year: i32,
        month: u32,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read EHS export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid EHS CSV data: {}", err),
            ImportError::InvalidMonth { line, month } => write!(
                f,
                "report on line {} has month {} outside 1..=12",
                line, month
            ),
            ImportError::DuplicateReport {
                project_id,
                year,
                month,
            } => write!(
                f,
                "project {} already has a report for {}/{}",
                project_id, month, year
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidMonth { .. } | ImportError::DuplicateReport { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads monthly reports (`project_id,report_month,report_year,...`) and
/// projects (`id,name,status`) from CSV.
pub struct MetricCsvImporter;

impl MetricCsvImporter {
    pub fn records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MetricRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::records_from_reader(file)
    }

    pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<MetricRecord>, ImportError> {
        let rows = parser::parse_rows::<parser::ReportRow, _>(reader)?;
        mapping::records_from_rows(rows)
    }

    pub fn projects_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Project>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::projects_from_reader(file)
    }

    pub fn projects_from_reader<R: Read>(reader: R) -> Result<Vec<Project>, ImportError> {
        let rows = parser::parse_rows::<parser::ProjectRow, _>(reader)?;
        Ok(mapping::projects_from_rows(rows))
    }
}
