//! Per-access CSV telemetry writer: a `csv::Writer` over a `File`, one
//! header then one record per event, flushed per row.

use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::bdi::CompressionDescriptor;
use crate::error::SimError;

const HEADER: &[&str] = &[
    "MemAddress",
    "ifHit",
    "ifEvict",
    "roundedCompSize",
    "timestamp",
    "isZero",
    "isSame",
    "compSize",
    "K",
    "baseNum",
];

pub struct TelemetryWriter {
    inner: Writer<File>,
}

/// One observable event: either an access (hit or miss) or an eviction
/// caused by that access. Eviction rows are written before the access row
/// that caused them.
pub struct TelemetryRow {
    pub addr: u32,
    pub if_hit: bool,
    pub if_evict: bool,
    pub rounded_comp_size: usize,
    pub timestamp: u64,
    pub descriptor: CompressionDescriptor,
}

impl TelemetryWriter {
    pub fn create(path: &Path) -> Result<Self, SimError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut wtr = Writer::from_writer(file);
        wtr.write_record(HEADER).map_err(csv_err)?;
        Ok(Self { inner: wtr })
    }

    pub fn write_row(&mut self, row: &TelemetryRow) -> Result<(), SimError> {
        self.inner
            .write_record(&[
                format!("{:x}", row.addr),
                bool_str(row.if_hit),
                bool_str(row.if_evict),
                row.rounded_comp_size.to_string(),
                row.timestamp.to_string(),
                bool_str(row.descriptor.is_zero),
                bool_str(row.descriptor.is_same),
                row.descriptor.comp_size.to_string(),
                row.descriptor.k.to_string(),
                row.descriptor.base_num.to_string(),
            ])
            .map_err(csv_err)?;
        self.inner.flush()?;
        Ok(())
    }
}

fn bool_str(b: bool) -> String {
    if b { "1".into() } else { "0".into() }
}

fn csv_err(e: csv::Error) -> SimError {
    SimError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut w = TelemetryWriter::create(&path).unwrap();
        w.write_row(&TelemetryRow {
            addr: 0xBEEF,
            if_hit: true,
            if_evict: false,
            rounded_comp_size: 8,
            timestamp: 0,
            descriptor: CompressionDescriptor { is_zero: false, is_same: true, comp_size: 8, k: 8, base_num: 1 },
        })
        .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), HEADER.join(","));
        assert_eq!(lines.next().unwrap(), "beef,1,0,8,0,0,1,8,8,1");
    }
}
