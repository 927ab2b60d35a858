use std::sync::Arc;
use std::time::Duration;
use dashmap::DashMap;
use tokio::time::timeout;
use tracing::{info, warn, error};
use uuid::Uuid;
use crate::catalog::Catalog;
use crate::pipeline::job::{IngestionJob, JobStage, PipelineError, StageKind};
use crate::pipeline::service::{SpecDocument, SpecService};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub stage_timeout: Duration,
    /// Generate may depend on slow upstream analysis and gets its own,
    /// more generous budget.
    pub generate_timeout: Duration,
    pub auto_advance: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(30),
            generate_timeout: Duration::from_secs(300),
            auto_advance: true,
        }
    }
}

/// 摄取管线：每个任务走 upload -> parse -> generate 的显式状态机。
///
/// Independent jobs run fully in parallel (per-entry map, no shared mutable
/// state between jobs). Stage handlers copy their inputs out of the entry
/// before awaiting, so no map lock is held across a suspension point and
/// abandoning a stage leaves the job at its last completed stage.
pub struct Pipeline {
    jobs: DashMap<Uuid, IngestionJob>,
    service: Arc<dyn SpecService>,
    catalog: Arc<Catalog>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(service: Arc<dyn SpecService>, catalog: Arc<Catalog>, options: PipelineOptions) -> Self {
        Self {
            jobs: DashMap::new(),
            service,
            catalog,
            options,
        }
    }

    /// Validates the submission synchronously and records the job at
    /// `Created`. No network interaction happens here.
    pub fn submit(&self, provider: &str, document: SpecDocument) -> Result<Uuid, PipelineError> {
        validate_provider_name(provider)?;
        document.check_format()?;

        let job = IngestionJob::new(provider.to_string(), document);
        let job_id = job.id;
        info!(job_id = %job_id, provider = provider, "Ingestion job created");
        self.jobs.insert(job_id, job);
        Ok(job_id)
    }

    /// Snapshot of a job for user feedback.
    pub fn job(&self, job_id: Uuid) -> Option<IngestionJob> {
        self.jobs.get(&job_id).map(|j| j.clone())
    }

    /// Submit plus best-effort auto-advance through the three stages.
    /// A stage failure stops the chain and stays recorded on the job; every
    /// stage remains individually re-invokable afterwards.
    pub async fn ingest(&self, provider: &str, document: SpecDocument) -> Result<Uuid, PipelineError> {
        let job_id = self.submit(provider, document)?;
        if !self.options.auto_advance {
            return Ok(job_id);
        }

        for stage in [StageKind::Upload, StageKind::Parse, StageKind::Generate] {
            let result = match stage {
                StageKind::Upload => self.upload(job_id).await,
                StageKind::Parse => self.parse(job_id).await,
                StageKind::Generate => self.generate(job_id).await,
            };
            if let Err(e) = result {
                warn!(job_id = %job_id, stage = ?stage, error = %e, "Auto-advance stopped");
                break;
            }
        }
        Ok(job_id)
    }

    /// Created/Failed(Upload) -> Uploaded. Records the opaque storage id
    /// returned by the external service.
    pub async fn upload(&self, job_id: Uuid) -> Result<(), PipelineError> {
        // 1. Take stage inputs out of the entry (no lock across await)
        let (provider, document) = {
            let job = self.jobs.get(&job_id).ok_or(PipelineError::UnknownJob(job_id))?;
            self.check_stage(&job.stage, StageKind::Upload)?;
            (job.provider.clone(), job.document.clone())
        };

        // 2. External call under the stage timeout
        let outcome = timeout(
            self.options.stage_timeout,
            self.service.upload(&provider, &document),
        )
        .await;

        // 3. Record the transition
        match outcome {
            Ok(Ok(upload_id)) => {
                info!(job_id = %job_id, upload_id = %upload_id, "Spec uploaded");
                self.update(job_id, |job| {
                    job.upload_id = Some(upload_id);
                    job.stage = JobStage::Uploaded;
                });
                Ok(())
            }
            Ok(Err(e)) => Err(self.fail(job_id, StageKind::Upload, e.to_string())),
            Err(_) => Err(self.fail_timeout(job_id, StageKind::Upload)),
        }
    }

    /// Uploaded/Failed(Parse) -> Parsed. Stores the structural summary.
    pub async fn parse(&self, job_id: Uuid) -> Result<(), PipelineError> {
        let upload_id = {
            let job = self.jobs.get(&job_id).ok_or(PipelineError::UnknownJob(job_id))?;
            self.check_stage(&job.stage, StageKind::Parse)?;
            job.upload_id.clone().ok_or(PipelineError::StageNotReady {
                requested: StageKind::Parse,
                current: job.stage.describe(),
            })?
        };

        let outcome = timeout(self.options.stage_timeout, self.service.parse(&upload_id)).await;

        match outcome {
            Ok(Ok(summary)) => {
                info!(job_id = %job_id, operations = summary.operation_count, "Spec parsed");
                self.update(job_id, |job| {
                    job.summary = Some(summary);
                    job.stage = JobStage::Parsed;
                });
                Ok(())
            }
            Ok(Err(e)) => Err(self.fail(job_id, StageKind::Parse, e.to_string())),
            Err(_) => Err(self.fail_timeout(job_id, StageKind::Parse)),
        }
    }

    /// Parsed/Failed(Generate)/Generated -> Generated. An empty result is a
    /// failure (`NoNodesGenerated`), never success. On success the
    /// definitions replace the provider's catalog set, so re-invoking on an
    /// already-Generated job re-publishes instead of duplicating.
    pub async fn generate(&self, job_id: Uuid) -> Result<(), PipelineError> {
        let (provider, upload_id) = {
            let job = self.jobs.get(&job_id).ok_or(PipelineError::UnknownJob(job_id))?;
            self.check_stage(&job.stage, StageKind::Generate)?;
            let upload_id = job.upload_id.clone().ok_or(PipelineError::StageNotReady {
                requested: StageKind::Generate,
                current: job.stage.describe(),
            })?;
            (job.provider.clone(), upload_id)
        };

        let outcome = timeout(self.options.generate_timeout, self.service.generate(&upload_id)).await;

        let records = match outcome {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => return Err(self.fail(job_id, StageKind::Generate, e.to_string())),
            Err(_) => return Err(self.fail_timeout(job_id, StageKind::Generate)),
        };

        if records.is_empty() {
            self.fail(job_id, StageKind::Generate, "no node definitions generated".to_string());
            return Err(PipelineError::NoNodesGenerated);
        }

        // Boundary conversion: a structurally invalid record fails the
        // stage before anything reaches the catalog.
        let mut definitions = Vec::with_capacity(records.len());
        for record in records {
            match record.into_definition(&provider) {
                Ok(def) => definitions.push(def),
                Err(e) => {
                    self.fail(job_id, StageKind::Generate, e.to_string());
                    return Err(PipelineError::Rejected(e));
                }
            }
        }

        let count = definitions.len();
        if let Err(e) = self.catalog.publish_provider(&provider, definitions) {
            self.fail(job_id, StageKind::Generate, e.to_string());
            return Err(PipelineError::Rejected(e));
        }

        info!(job_id = %job_id, provider = %provider, count = count, "Node definitions generated");
        self.update(job_id, |job| {
            job.generated = count;
            job.stage = JobStage::Generated;
        });
        Ok(())
    }

    /// A stage may run from its natural predecessor or as a retry of the
    /// same failed stage; a job never advances past Failed implicitly.
    fn check_stage(&self, current: &JobStage, requested: StageKind) -> Result<(), PipelineError> {
        let ready = match (current, requested) {
            (JobStage::Created, StageKind::Upload) => true,
            (JobStage::Uploaded, StageKind::Parse) => true,
            (JobStage::Parsed, StageKind::Generate) => true,
            // Idempotent re-generate replaces the provider set
            (JobStage::Generated, StageKind::Generate) => true,
            (JobStage::Failed { at, .. }, requested) => *at == requested,
            _ => false,
        };
        if ready {
            Ok(())
        } else {
            Err(PipelineError::StageNotReady {
                requested,
                current: current.describe(),
            })
        }
    }

    fn update(&self, job_id: Uuid, f: impl FnOnce(&mut IngestionJob)) {
        if let Some(mut job) = self.jobs.get_mut(&job_id) {
            f(&mut job);
        }
    }

    fn fail(&self, job_id: Uuid, at: StageKind, reason: String) -> PipelineError {
        error!(job_id = %job_id, stage = ?at, reason = %reason, "Ingestion stage failed");
        self.update(job_id, |job| {
            job.stage = JobStage::Failed {
                at,
                reason: reason.clone(),
            };
        });
        PipelineError::Service(reason)
    }

    fn fail_timeout(&self, job_id: Uuid, at: StageKind) -> PipelineError {
        error!(job_id = %job_id, stage = ?at, "Ingestion stage timed out");
        self.update(job_id, |job| {
            job.stage = JobStage::Failed {
                at,
                reason: "timed out".to_string(),
            };
        });
        PipelineError::Timeout(at)
    }
}

fn validate_provider_name(provider: &str) -> Result<(), PipelineError> {
    let valid = !provider.is_empty()
        && provider
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PipelineError::InvalidProviderName(provider.to_string()))
    }
}
