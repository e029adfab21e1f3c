//! Output formatting for audit findings.
//!
//! This module handles formatting and outputting findings:
//! - [`report`] - Tab-separated finding lines
//! - [`terminal`] - Line building and highlighting

pub mod report;
mod terminal;

pub use report::{write_endpoint_findings, write_nat_costs, write_nat_status, write_route_findings};
pub use terminal::{highlight, tsv_line};
