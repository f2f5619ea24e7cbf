//! Flat CSV persistence for catalog records.
//!
//! The file carries one row per image with the columns
//! `image_path,caption,image_url,caption_error`. Only `image_url` and
//! `caption` are required when reading.

use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::CatalogRecord;

const REQUIRED_COLUMNS: [&str; 2] = ["image_url", "caption"];

pub fn read_records(path: &Path) -> Result<Vec<CatalogRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_records_from(file)?;
    info!(path = %path.display(), rows = records.len(), "read catalog file");
    Ok(records)
}

pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<CatalogRecord>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::InvalidCatalog(format!("missing required column '{column}'")));
        }
    }
    let mut records = Vec::new();
    for row in rdr.deserialize::<CatalogRecord>() {
        records.push(row?);
    }
    debug!(rows = records.len(), "parsed catalog rows");
    Ok(records)
}

pub fn write_records(path: &Path, records: &[CatalogRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_records_to(file, records)?;
    info!(path = %path.display(), rows = records.len(), "wrote catalog file");
    Ok(())
}

pub fn write_records_to<W: Write>(writer: W, records: &[CatalogRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
