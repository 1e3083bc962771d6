//! Protocol report port trait.

use crate::domain::error::QuotewatchError;
use crate::domain::health_check::Protocol;
use std::path::Path;

/// Port for writing health-check protocols.
pub trait ProtocolReportPort {
    fn write(
        &self,
        protocol: &Protocol,
        instrument: &str,
        output_path: &Path,
    ) -> Result<(), QuotewatchError>;
}
