use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    application::services::{
        brevo::WhatsAppCampaignsApi,
        clock::{Clock, Sleeper},
    },
    domain::{errors::WorkflowError, models::TemplateStatus},
};

/// How long to keep asking the provider whether a template got approved.
///
/// Leaving both `max_attempts` and `timeout` unset polls until the template
/// leaves the `pending` state, however long that takes. With a `timeout` the
/// last wait is shortened so one final poll lands on the deadline.
#[derive(Debug, Clone)]
pub struct ApprovalPolicy {
    pub poll_interval: Duration,
    /// Width of the "modified since" window queried on every poll.
    pub lookback: TimeDelta,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            lookback: TimeDelta::minutes(5),
            max_attempts: None,
            timeout: None,
        }
    }
}

pub struct ApprovalPoller {
    api: Arc<dyn WhatsAppCampaignsApi>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    policy: ApprovalPolicy,
}

impl ApprovalPoller {
    pub fn new(
        api: Arc<dyn WhatsAppCampaignsApi>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        policy: ApprovalPolicy,
    ) -> Self {
        Self {
            api,
            clock,
            sleeper,
            policy,
        }
    }

    /// Polls until `template_id` is approved and returns the number of polls made.
    pub async fn wait_for_approval(
        &self,
        template_id: i64,
        cancel: &CancellationToken,
    ) -> Result<u32, WorkflowError> {
        let started = self.clock.now();
        let mut attempts = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(WorkflowError::Cancelled { template_id });
            }
            attempts += 1;

            let end = self.clock.now();
            let start = end - self.policy.lookback;
            let templates = self
                .api
                .list_templates(start, end)
                .await
                .map_err(WorkflowError::provider("list templates"))?;

            match templates.into_iter().find(|t| t.id == template_id) {
                Some(template) => match template.status {
                    TemplateStatus::Approved => {
                        info!(template_id, attempts, "template approved");
                        return Ok(attempts);
                    }
                    TemplateStatus::Pending => {
                        debug!(template_id, attempts, "template still pending");
                    }
                    TemplateStatus::Rejected(status) => {
                        warn!(template_id, %status, "template rejected");
                        return Err(WorkflowError::ApprovalRejected {
                            template_id,
                            status,
                        });
                    }
                },
                None => debug!(template_id, attempts, "template not listed yet"),
            }

            if self
                .policy
                .max_attempts
                .is_some_and(|max| attempts >= max)
            {
                return Err(WorkflowError::ApprovalTimedOut {
                    template_id,
                    attempts,
                });
            }

            let nap = match self.remaining(started) {
                Some(remaining) if remaining.is_zero() => {
                    return Err(WorkflowError::ApprovalTimedOut {
                        template_id,
                        attempts,
                    });
                }
                Some(remaining) => remaining.min(self.policy.poll_interval),
                None => self.policy.poll_interval,
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(WorkflowError::Cancelled { template_id });
                }
                _ = self.sleeper.sleep(nap) => {}
            }
        }
    }

    /// Time left before the configured timeout, `None` when unbounded.
    fn remaining(&self, started: DateTime<Utc>) -> Option<Duration> {
        let timeout = self.policy.timeout?;
        let elapsed = (self.clock.now() - started).to_std().unwrap_or_default();
        Some(timeout.saturating_sub(elapsed))
    }
}
