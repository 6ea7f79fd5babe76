use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use super::Tabular;

/// Write a header row plus one row per record; returns the number of data rows
pub fn write_csv<T: Tabular, W: io::Write>(writer: W, rows: &[T]) -> Result<usize> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(T::headers())?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

pub fn to_csv_string<T: Tabular>(rows: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}

pub fn write_csv_file<T: Tabular>(path: &Path, rows: &[T]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(io::BufWriter::new(file), rows).with_context(|| format!("Failed to write {}", path.display()))
}
