//! Orchestration of litmus and exploitation across providers

use crate::cloud::catalog::ProviderCatalog;
use crate::cloud::error::ProbeError;
use crate::cloud::exploit::{ExploitReport, ExploitRunner};
use crate::cloud::litmus::LitmusProbe;
use crate::cloud::provider::{ConfirmedEndpoint, ProviderProfile};
use crate::cloud::CloudConfig;
use crate::http::client::HttpClient;
use crate::reporting::model::ResultSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Which providers a probe call covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeMode {
    /// Only the named provider; failures are terminal
    Targeted(String),

    /// Every catalog provider until the first confirmed one
    Discovery,
}

impl ProbeMode {
    /// An absent or blank provider selects discovery mode
    pub fn from_provider(provider: Option<&str>) -> Self {
        match provider.map(str::trim) {
            Some(id) if !id.is_empty() => ProbeMode::Targeted(id.to_string()),
            _ => ProbeMode::Discovery,
        }
    }
}

/// What a probe call found
#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    pub endpoint: Option<ConfirmedEndpoint>,
    pub report: Option<ExploitReport>,
}

impl ProbeOutcome {
    pub fn provider(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|e| e.provider.as_str())
    }

    pub fn results(&self) -> ResultSet {
        self.report
            .as_ref()
            .map(ExploitReport::results)
            .unwrap_or_default()
    }
}

type Confirmed = (ProviderProfile, ConfirmedEndpoint);

/// Litmus results indexed by catalog position. `None` means still running.
struct LitmusSlots {
    slots: Vec<Option<Option<Confirmed>>>,
}

impl LitmusSlots {
    fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }

    fn fill(&mut self, index: usize, found: Option<Confirmed>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(found);
        }
    }

    /// The earliest confirmation, once every earlier provider has failed
    fn decided(&mut self) -> Option<Confirmed> {
        for slot in self.slots.iter_mut() {
            match slot {
                None => return None,
                Some(None) => continue,
                Some(Some(_)) => return slot.take().flatten(),
            }
        }
        None
    }

    fn best(&mut self) -> Option<Confirmed> {
        self.slots
            .iter_mut()
            .find(|slot| matches!(slot, Some(Some(_))))
            .and_then(|slot| slot.take().flatten())
    }
}

pub struct CloudProber {
    catalog: Arc<ProviderCatalog>,
    client: HttpClient,
    config: CloudConfig,
}

impl CloudProber {
    pub fn new(catalog: Arc<ProviderCatalog>, client: HttpClient, config: CloudConfig) -> Self {
        Self {
            catalog,
            client,
            config,
        }
    }

    pub async fn probe(&self, mode: &ProbeMode) -> Result<ProbeOutcome, ProbeError> {
        match mode {
            ProbeMode::Targeted(id) => self.probe_targeted(id).await,
            ProbeMode::Discovery => Ok(self.discover().await),
        }
    }

    async fn probe_targeted(&self, id: &str) -> Result<ProbeOutcome, ProbeError> {
        let profile = self.catalog.lookup(id)?;

        tracing::info!("Testing for provider {}", profile.id);

        let endpoint = LitmusProbe::new(&self.client)
            .test(profile)
            .await
            .ok_or_else(|| ProbeError::ProviderUnreachable(profile.id.clone()))?;

        let report = ExploitRunner::new(&self.client).run(profile, &endpoint).await;

        Ok(ProbeOutcome {
            endpoint: Some(endpoint),
            report: Some(report),
        })
    }

    /// Litmus every provider on a bounded pool. The confirmed provider that
    /// comes first in catalog order wins, decided as soon as every provider
    /// before it has failed; the remaining workers are then aborted.
    async fn discover(&self) -> ProbeOutcome {
        let permits = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut workers: JoinSet<(usize, Option<Confirmed>)> = JoinSet::new();

        for (index, profile) in self.catalog.profiles().iter().enumerate() {
            let profile = profile.clone();
            let client = self.client.clone();
            let permits = Arc::clone(&permits);

            workers.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (index, None);
                };
                tracing::info!("Testing for provider {}", profile.id);

                match LitmusProbe::new(&client).test(&profile).await {
                    Some(endpoint) => (index, Some((profile, endpoint))),
                    None => {
                        tracing::info!("Cannot reach metadata endpoint for {}", profile.id);
                        (index, None)
                    }
                }
            });
        }

        let mut slots = LitmusSlots::new(self.catalog.profiles().len());
        let mut winner = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, found)) => slots.fill(index, found),
                Err(e) => tracing::debug!("Litmus worker ended early: {}", e),
            }

            if let Some(found) = slots.decided() {
                winner = Some(found);
                workers.abort_all();
                break;
            }
        }

        // A worker that died leaves its slot open; settle for the best seen
        let winner = winner.or_else(|| slots.best());

        let Some((profile, endpoint)) = winner else {
            tracing::info!("No known cloud metadata service is reachable");
            return ProbeOutcome::default();
        };

        let report = ExploitRunner::new(&self.client).run(&profile, &endpoint).await;

        ProbeOutcome {
            endpoint: Some(endpoint),
            report: Some(report),
        }
    }
}
