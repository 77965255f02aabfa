use crate::Kinetics::chemistry_errors::ChemistryError;
use csv::{ErrorKind, ReaderBuilder, Trim};
use log::{error, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a comma separated table into rows of trimmed text cells.
/// Rows may have different lengths; nothing is interpreted here, the header row included.
pub fn load_table_from_file(file_name: &str) -> Result<Vec<Vec<String>>, ChemistryError> {
    let path = Path::new(file_name);
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open file '{}': {}", file_name, e);
            return Err(ChemistryError::Resource {
                path: file_name.to_string(),
                source: e,
            });
        }
    };
    let rows = load_table_from_reader(file, file_name)?;
    info!("Read {} rows from file '{}'", rows.len(), file_name);
    Ok(rows)
}

/// same as [`load_table_from_file`] for any reader; `origin` names the resource in errors
pub fn load_table_from_reader<R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<Vec<String>>, ChemistryError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| {
            let reason = e.to_string();
            match e.into_kind() {
                ErrorKind::Io(source) => ChemistryError::Resource {
                    path: origin.to_string(),
                    source,
                },
                _ => ChemistryError::Format {
                    path: origin.to_string(),
                    reason,
                },
            }
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}
