//! SKYPROBE Core Engine
//!
//! Runs the enabled categories and exports the resulting report.

use crate::cloud::{CloudProber, ProbeError, ProviderCatalog};
use crate::core::capability::Capability;
use crate::core::context::Context;
use crate::http::client::HttpClient;
use crate::recon::{env, identity, net};
use crate::reporting::exporter::Exporter;
use crate::reporting::model::EnumerationReport;
use crate::reporting::reporter::Reporter;
use std::sync::Arc;
use std::time::Duration;

/// How a completed run ended
#[derive(Debug)]
pub struct RunSummary {
    pub report: EnumerationReport,

    /// Terminal cloud failure in targeted mode, if any
    pub cloud_error: Option<ProbeError>,
}

pub struct Engine {
    ctx: Context,
    catalog: Arc<ProviderCatalog>,
    client: HttpClient,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        Self::with_catalog(ctx, ProviderCatalog::builtin())
    }

    pub fn with_catalog(ctx: Context, catalog: Arc<ProviderCatalog>) -> anyhow::Result<Self> {
        let client = HttpClient::new(Duration::from_millis(ctx.cloud_config.timeout_ms))?;
        Ok(Self {
            ctx,
            catalog,
            client,
        })
    }

    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        if self.ctx.verbose {
            tracing::info!("Enabled categories: {:?}", self.ctx.profile.enabled);
        }

        let mut reporter = Reporter::new(identity::detect());
        let mut cloud_error = None;

        // -------------------------------------------------
        // CLOUD METADATA
        // -------------------------------------------------
        if self.ctx.profile.has(Capability::Cloud) {
            tracing::info!("Enumerating cloud");
            let prober = CloudProber::new(
                Arc::clone(&self.catalog),
                self.client.clone(),
                self.ctx.cloud_config.clone(),
            );

            match prober.probe(&self.ctx.mode).await {
                Ok(outcome) => {
                    reporter.set_provider(outcome.provider().map(str::to_string));
                    reporter.record(Capability::Cloud, outcome.results());
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    if let ProbeError::ProviderNotFound(_) = e {
                        let known: Vec<&str> = self.catalog.ids().collect();
                        tracing::error!("Known providers: {}", known.join(", "));
                    }
                    cloud_error = Some(e);
                }
            }
        }

        // -------------------------------------------------
        // INTERNAL NETWORK (passive)
        // -------------------------------------------------
        let vars = env::current();

        if self.ctx.profile.has(Capability::Net) {
            tracing::info!("Enumerating net");
            let hosts = std::fs::read_to_string(net::HOSTS_FILE).ok();
            reporter.record(Capability::Net, net::collect(&vars, hosts.as_deref()));
        }

        // -------------------------------------------------
        // ENVIRONMENT
        // -------------------------------------------------
        if self.ctx.profile.has(Capability::Env) {
            tracing::info!("Enumerating envs");
            reporter.record(Capability::Env, env::collect(vars));
        }

        // -------------------------------------------------
        // EXPORT
        // -------------------------------------------------
        let report = reporter.finish();
        Exporter::new(self.client.clone())
            .export(&report, self.ctx.webhook.as_ref(), self.ctx.silent)
            .await?;

        Ok(RunSummary {
            report,
            cloud_error,
        })
    }
}
