//! Bulk DAO attribution.
//!
//! One `attributeContributionToDao` mutation is dispatched per contribution,
//! all concurrently. Progress is published on a single watch channel and the
//! outcome is reported only once every dispatch has settled.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::watch;
use tracing::{info, warn};

use super::forms::BulkDaoAttributeFormValues;
use super::{ClientError, ProtocolClient};

/// Anything that can attribute a single contribution
#[async_trait]
pub trait ContributionUpdater: Send + Sync {
    async fn attribute(&self, contribution_id: i32, dao_id: Option<i32>) -> Result<(), ClientError>;
}

#[async_trait]
impl ContributionUpdater for ProtocolClient {
    async fn attribute(&self, contribution_id: i32, dao_id: Option<i32>) -> Result<(), ClientError> {
        self.attribute_contribution(contribution_id, dao_id).await.map(|_| ())
    }
}

/// Aggregate loading state of a bulk run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkProgress {
    pub in_flight: usize,
    pub completed: usize,
    pub total: usize,
}

impl BulkProgress {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<i32>,
    pub failed: Vec<(i32, ClientError)>,
}

impl BulkOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct BulkDaoAttribution<U> {
    updater: Arc<U>,
    progress: watch::Sender<BulkProgress>,
}

impl<U: ContributionUpdater> BulkDaoAttribution<U> {
    pub fn new(updater: Arc<U>) -> Self {
        let (progress, _) = watch::channel(BulkProgress::default());
        Self { updater, progress }
    }

    pub fn subscribe(&self) -> watch::Receiver<BulkProgress> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> BulkProgress {
        *self.progress.borrow()
    }

    /// Attribute every contribution to `values.dao_id`. Invalid form values
    /// fail before anything is sent.
    pub async fn run(
        &self,
        contribution_ids: &[i32],
        values: &BulkDaoAttributeFormValues,
    ) -> Result<BulkOutcome, ClientError> {
        values.validate().map_err(ClientError::Validation)?;

        let total = contribution_ids.len();
        self.progress.send_replace(BulkProgress {
            in_flight: total,
            completed: 0,
            total,
        });
        info!(total, dao_id = ?values.dao_id, "Bulk attribution started");

        let dao_id = values.dao_id;
        let dispatches = contribution_ids.iter().map(|&id| {
            let updater = Arc::clone(&self.updater);
            let progress = &self.progress;
            async move {
                let result = updater.attribute(id, dao_id).await;
                progress.send_modify(|p| {
                    p.in_flight -= 1;
                    p.completed += 1;
                });
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(dispatches).await {
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    warn!(contribution_id = id, error = %e, "Attribution failed");
                    outcome.failed.push((id, e));
                }
            }
        }

        info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Bulk attribution settled"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ErrorKind;
    use assert_matches::assert_matches;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(i32, Option<i32>)>>,
        fail_on: Option<i32>,
    }

    #[async_trait]
    impl ContributionUpdater for Recorder {
        async fn attribute(&self, contribution_id: i32, dao_id: Option<i32>) -> Result<(), ClientError> {
            tokio::task::yield_now().await;
            self.calls.lock().unwrap().push((contribution_id, dao_id));
            if self.fail_on == Some(contribution_id) {
                return Err(ClientError::Api {
                    kind: ErrorKind::ConstraintViolation,
                    message: "rejected".into(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatches_one_mutation_per_contribution() {
        let recorder = Arc::new(Recorder::default());
        let bulk = BulkDaoAttribution::new(Arc::clone(&recorder));

        let outcome = bulk
            .run(&[1, 2, 3], &BulkDaoAttributeFormValues { dao_id: Some(42) })
            .await
            .unwrap();

        assert!(outcome.is_success());
        let mut calls = recorder.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec![(1, Some(42)), (2, Some(42)), (3, Some(42))]);
        assert_eq!(
            bulk.progress(),
            BulkProgress {
                in_flight: 0,
                completed: 3,
                total: 3
            }
        );
    }

    #[tokio::test]
    async fn partial_failure_is_reported() {
        let recorder = Arc::new(Recorder {
            fail_on: Some(2),
            ..Default::default()
        });
        let bulk = BulkDaoAttribution::new(Arc::clone(&recorder));

        let outcome = bulk
            .run(&[1, 2, 3], &BulkDaoAttributeFormValues { dao_id: Some(7) })
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.succeeded, vec![1, 3]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, 2);
        assert_eq!(recorder.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_form_dispatches_nothing() {
        let recorder = Arc::new(Recorder::default());
        let bulk = BulkDaoAttribution::new(Arc::clone(&recorder));

        let result = bulk.run(&[1], &BulkDaoAttributeFormValues { dao_id: Some(-1) }).await;

        assert_matches!(result, Err(ClientError::Validation(errors)) if errors.get("daoId").is_some());
        assert!(recorder.calls.lock().unwrap().is_empty());
        assert_eq!(bulk.progress(), BulkProgress::default());
    }
}
