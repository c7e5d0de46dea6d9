// GoodData - Rust SDK for the GoodData analytics platform
// Licensed under the MIT License

//! # GoodData Platform SDK
//!
//! Async client library for the GoodData analytics platform REST API:
//! typed access to projects, metadata objects (reports, metrics,
//! attributes), report export, dataload processes with schedules, and
//! connector integrations.
//!
//! ## Overview
//!
//! This library provides:
//! - **Authenticated** JSON transport with retries over the platform API
//! - **Typed** metadata objects travelling in the platform's one-key envelopes
//! - **Polling** of long-running operations through [`client::FutureResult`]
//! - **Services** grouped by API area, all sharing one configured transport
//!
//! ## Architecture
//!
//! - [`client`] - endpoint, REST transport and asynchronous-operation polling
//! - [`config`] - TOML configuration with environment overrides
//! - [`domain`] - error types shared across services
//! - [`gdc`] - wire envelope plumbing and common platform structures
//! - [`account`], [`project`], [`md`], [`report`], [`dataload`],
//!   [`connector`] - one module per API area, each with DTOs and a service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gooddata::md::{Report, Restriction};
//! use gooddata::report::ExportFormat;
//! use gooddata::GoodData;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gd = GoodData::connect(
//!         "https://secure.gooddata.com",
//!         "user@example.com",
//!         "password",
//!     )?;
//!
//!     let project = gd.project_service().get_project_by_id("PROJECT_ID").await?;
//!     let report: Report = gd
//!         .metadata_service()
//!         .get_obj(&project, &[Restriction::title("Revenue")])
//!         .await?;
//!
//!     let export = gd
//!         .report_service()
//!         .export_report(&report, ExportFormat::Csv)
//!         .await?;
//!     let csv = export.wait_for().await?;
//!
//!     println!("exported {} bytes", csv.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Polling
//!
//! Operations the platform runs asynchronously (report export, process
//! execution, connector integration) return a
//! [`FutureResult`](client::FutureResult). Poll it once with `is_done` or
//! block on the final value with `wait_for`; the poll interval and attempt
//! limit come from [`config::PollingConfig`].

pub mod account;
pub mod client;
pub mod config;
pub mod connector;
pub mod dataload;
pub mod domain;
pub mod gdc;
pub mod md;
pub mod project;
pub mod report;
pub mod util;

pub use domain::{GoodDataError, Result};

use account::AccountService;
use client::{Endpoint, RestClient};
use config::{ClientConfig, HttpConfig, PollingConfig, SecretString};
use connector::ConnectorService;
use dataload::processes::ProcessService;
use md::MetadataService;
use project::ProjectService;
use report::ReportService;
use secrecy::Secret;

/// Entry point to the platform API
///
/// Holds one configured [`RestClient`] and hands out the per-area services,
/// all sharing that transport.
#[derive(Debug, Clone)]
pub struct GoodData {
    client: RestClient,
}

impl GoodData {
    /// Connects to the platform at the given URL with default HTTP and
    /// polling settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL does not parse or the
    /// HTTP client cannot be built.
    pub fn connect(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = Endpoint::parse(url)?;
        let password: SecretString = Secret::new(password.into().into());
        let client = RestClient::new(
            &endpoint,
            username,
            password,
            &HttpConfig::default(),
            &PollingConfig::default(),
        )?;
        Ok(Self { client })
    }

    /// Connects using a loaded [`ClientConfig`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config
            .validate()
            .map_err(domain::GoodDataError::Configuration)?;

        let endpoint = Endpoint::from_config(&config.endpoint)?;
        let client = RestClient::new(
            &endpoint,
            config.credentials.username.clone(),
            config.credentials.password.clone(),
            &config.http,
            &config.polling,
        )?;
        Ok(Self { client })
    }

    /// Service for account profiles
    pub fn account_service(&self) -> AccountService {
        AccountService::new(self.client.clone())
    }

    /// Service for projects (workspaces)
    pub fn project_service(&self) -> ProjectService {
        ProjectService::new(self.client.clone(), self.account_service())
    }

    /// Service for metadata objects
    pub fn metadata_service(&self) -> MetadataService {
        MetadataService::new(self.client.clone())
    }

    /// Service for report export
    pub fn report_service(&self) -> ReportService {
        ReportService::new(self.client.clone())
    }

    /// Service for dataload processes and schedules
    pub fn process_service(&self) -> ProcessService {
        ProcessService::new(self.client.clone(), self.account_service())
    }

    /// Service for connector integrations
    pub fn connector_service(&self) -> ConnectorService {
        ConnectorService::new(self.client.clone())
    }
}
