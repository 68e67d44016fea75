//! Global context for a probe run

use crate::cli::args::Cli;
use crate::cloud::{CloudConfig, ProbeMode};
use crate::core::capability::Capability;
use crate::core::profile::ScanProfile;
use url::Url;

/// Webhook baked in at build time, for hosts where flags and environment
/// variables cannot be passed. Overrides `--webhook`.
const COMPILE_TIME_WEBHOOK: Option<&str> = option_env!("SKYPROBE_WEBHOOK");

pub struct Context {
    pub profile: ScanProfile,
    pub mode: ProbeMode,
    pub cloud_config: CloudConfig,
    pub webhook: Option<Url>,
    pub silent: bool,
    pub verbose: bool,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        Self::build(cli, COMPILE_TIME_WEBHOOK)
    }

    fn build(cli: Cli, baked_webhook: Option<&str>) -> anyhow::Result<Self> {
        let mut profile = ScanProfile::all();
        if cli.no_cloud {
            profile.disable(Capability::Cloud);
        }
        if cli.no_net {
            profile.disable(Capability::Net);
        }
        if cli.no_env {
            profile.disable(Capability::Env);
        }

        let webhook = match baked_webhook.filter(|w| !w.is_empty()) {
            Some(baked) => {
                tracing::info!("Using webhook {}", baked);
                Some(baked.to_string())
            }
            None => cli.webhook.filter(|w| !w.trim().is_empty()),
        };
        let webhook = webhook
            .map(|w| Url::parse(w.trim()))
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid webhook URL: {}", e))?;

        let cloud_config = CloudConfig {
            timeout_ms: cli.timeout,
            concurrency: cli.threads.max(1),
        };

        Ok(Self {
            profile,
            mode: ProbeMode::from_provider(cli.cloud.as_deref()),
            cloud_config,
            webhook,
            silent: cli.silent,
            verbose: cli.verbose,
        })
    }
}
