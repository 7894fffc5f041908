//! Sales Analyzer - client for the sales call analysis service
//!
//! This crate uploads a call recording to the analysis service, tracks the
//! resulting job until it finishes and fetches the PDF and JSON reports.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Jobs, statuses, report links, upload payloads, config and errors
//! - **Application**: The job controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP service client, config file)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
