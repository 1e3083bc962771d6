//! Port traits at the I/O seams.

pub mod config_port;
pub mod quotation_port;
pub mod report_port;
