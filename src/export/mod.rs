//! Export of filtered list data to CSV and PDF.
//!
//! Both formats are driven by the same [`Tabular`] column definition the
//! on-screen tables use, and always receive the whole filtered collection,
//! never just the visible page.

pub mod csv;
pub mod pdf;

use std::path::{Path, PathBuf};

pub use self::csv::{to_csv_string, write_csv, write_csv_file};
pub use self::pdf::{render_pdf, write_pdf_file};

/// A row type with a fixed set of columns
pub trait Tabular {
    fn headers() -> Vec<&'static str>;

    /// Raw cell values, used for CSV and PDF
    fn cells(&self) -> Vec<String>;

    /// Cell values as rendered on screen
    fn display_cells(&self) -> Vec<String> {
        self.cells()
    }

    /// Preferred on-screen column widths, one per header
    fn column_widths() -> Vec<u16> {
        vec![14; Self::headers().len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Pdf => "PDF",
        }
    }
}

/// Resolve the output path of an export; `dir` defaults to the working directory
pub fn export_path(dir: Option<&Path>, file_name: &str) -> PathBuf {
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
