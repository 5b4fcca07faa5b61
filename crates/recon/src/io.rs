//! CSV adapters: load raw records, write the two output tables.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::ReconError;
use crate::model::{ConflictRow, DeletionMarker, EmpId, NonConflictRow, RawRecord, Status};

/// Input columns every feed must carry. Order in the file is free.
pub const REQUIRED_COLUMNS: [&str; 5] = ["empid", "login_id", "emp_type", "deleted_flag", "status"];

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReconError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse CSV text into raw records.
///
/// Fails before reading any row when a required column is missing, naming
/// every missing column. A `deleted_flag` outside `Y`/`N` stops the load.
pub fn load_csv_records(csv_data: &str, delimiter: u8) -> Result<Vec<RawRecord>, ReconError> {
    let csv_data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReconError::MissingColumns { columns: missing });
    }

    let idx = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let empid_idx = idx("empid");
    let login_idx = idx("login_id");
    let type_idx = idx("emp_type");
    let flag_idx = idx("deleted_flag");
    let status_idx = idx("status");

    let mut records = Vec::new();

    for record in reader.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let flag = field(flag_idx);
        let deletion_marker = DeletionMarker::from_flag(flag).ok_or_else(|| {
            ReconError::InvalidDeletedFlag {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                value: flag.to_string(),
            }
        })?;

        records.push(RawRecord {
            empid: EmpId::from(field(empid_idx)),
            login_id: field(login_idx).to_string(),
            emp_type: field(type_idx).to_string(),
            deletion_marker,
            status: Status::from_code(field(status_idx)),
        });
    }

    log::debug!("loaded {} record(s) from {} column(s)", records.len(), headers.len());

    Ok(records)
}

/// Write the conflict table. The header row is written even when `rows` is empty.
pub fn write_conflicts<W: Write>(writer: W, rows: &[ConflictRow]) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(ConflictRow::COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the non-conflict table. The header row is written even when `rows` is empty.
pub fn write_non_conflicts<W: Write>(writer: W, rows: &[NonConflictRow]) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(NonConflictRow::COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_conflicts_file(path: &Path, rows: &[ConflictRow]) -> Result<(), ReconError> {
    let file = create_file(path)?;
    write_conflicts(file, rows)
}

pub fn write_non_conflicts_file(path: &Path, rows: &[NonConflictRow]) -> Result<(), ReconError> {
    let file = create_file(path)?;
    write_non_conflicts(file, rows)
}

fn create_file(path: &Path) -> Result<std::fs::File, ReconError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ReconError::Io(format!("cannot create {}: {e}", parent.display())))?;
    }
    std::fs::File::create(path)
        .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", path.display())))
}
