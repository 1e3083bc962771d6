//! CSV protocol report adapter implementing [`ProtocolReportPort`].
//!
//! Writes one `date,category,text` row per entry in protocol order.

use crate::domain::error::QuotewatchError;
use crate::domain::health_check::Protocol;
use crate::ports::report_port::ProtocolReportPort;
use std::fs::File;
use std::path::Path;

const HEADER: [&str; 3] = ["date", "category", "text"];

#[derive(Debug, Default)]
pub struct CsvProtocolReportAdapter;

impl CsvProtocolReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn write_error(output_path: &Path, e: impl std::fmt::Display) -> QuotewatchError {
    QuotewatchError::Data {
        reason: format!("failed to write {}: {}", output_path.display(), e),
    }
}

impl ProtocolReportPort for CsvProtocolReportAdapter {
    fn write(
        &self,
        protocol: &Protocol,
        instrument: &str,
        output_path: &Path,
    ) -> Result<(), QuotewatchError> {
        let file = File::create(output_path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record(HEADER)
            .map_err(|e| write_error(output_path, e))?;
        for entry in protocol.entries() {
            let date = entry.date.format("%Y-%m-%d").to_string();
            let category = entry.category.to_string();
            writer
                .write_record([date.as_str(), category.as_str(), entry.text.as_str()])
                .map_err(|e| write_error(output_path, e))?;
        }
        writer.flush()?;

        tracing::info!(
            instrument,
            entries = protocol.len(),
            path = %output_path.display(),
            "protocol written"
        );
        Ok(())
    }
}
