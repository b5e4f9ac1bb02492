//! Concurrent lookup fan-out across registered services.

use crate::lookup::{
    domain::{AggregateReport, DownstreamError, DownstreamReply, LookupResult, LookupTarget},
    ports::{DownstreamClient, ServiceDirectory},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinSet};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, error, info, warn};

/// Timing limits for one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorSettings {
    /// Upper bound on a single downstream call.
    pub call_timeout: Duration,
    /// Extra time the merge waits beyond the call timeout before abandoning
    /// outstanding calls.
    pub merge_slack: Duration,
}

impl AggregatorSettings {
    /// Creates settings from explicit limits.
    #[must_use]
    pub const fn new(call_timeout: Duration, merge_slack: Duration) -> Self {
        Self {
            call_timeout,
            merge_slack,
        }
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(2))
    }
}

type CallOutcome = (LookupTarget, Result<DownstreamReply, DownstreamError>, Duration);

/// Fans one identifier out to every alive service and merges the answers.
pub struct LookupAggregator<D, L>
where
    D: ServiceDirectory + 'static,
    L: DownstreamClient + 'static,
{
    directory: Arc<D>,
    client: Arc<L>,
    settings: AggregatorSettings,
}

impl<D, L> LookupAggregator<D, L>
where
    D: ServiceDirectory + 'static,
    L: DownstreamClient + 'static,
{
    /// Creates an aggregator over `directory` using `client` for calls.
    #[must_use]
    pub const fn new(directory: Arc<D>, client: Arc<L>, settings: AggregatorSettings) -> Self {
        Self {
            directory,
            client,
            settings,
        }
    }

    /// Looks `identifier` up in every registered service.
    ///
    /// Services that are not alive are reported offline without a call. The
    /// rest are queried concurrently and merged in arrival order. Calls that
    /// fail at the transport level demote their service. The report always
    /// holds exactly one result per registered service.
    pub async fn aggregate(&self, identifier: &str) -> AggregateReport {
        let started = Instant::now();
        let records = self.directory.snapshot().await;
        let mut report = AggregateReport::new(records.len());
        let mut tasks = JoinSet::new();
        let mut pending: Vec<(task::Id, LookupTarget)> = Vec::new();
        let query: Arc<str> = Arc::from(identifier);

        for record in &records {
            if !record.is_alive() {
                debug!(service = %record.name(), "skipping offline service");
                report.push(LookupResult::offline(record.name().as_str()));
                continue;
            }

            let target = LookupTarget::from(record);
            debug!(
                service = %target.name(),
                address = %target.address(),
                identifier,
                "dispatching lookup"
            );
            let handle = tasks.spawn(call_service(
                Arc::clone(&self.client),
                target.clone(),
                Arc::clone(&query),
                self.settings.call_timeout,
            ));
            pending.push((handle.id(), target));
        }

        let deadline = started + self.settings.call_timeout + self.settings.merge_slack;
        self.merge_arrivals(&mut report, &mut tasks, &mut pending, started, deadline)
            .await;

        let finished = report.finish(started.elapsed());
        info!(
            identifier,
            services = finished.services_searched(),
            hits = finished.hits(),
            elapsed_ms = finished.total_elapsed_ms(),
            "lookup aggregated"
        );
        finished
    }

    async fn merge_arrivals(
        &self,
        report: &mut AggregateReport,
        tasks: &mut JoinSet<CallOutcome>,
        pending: &mut Vec<(task::Id, LookupTarget)>,
        started: Instant,
        deadline: Instant,
    ) {
        loop {
            match timeout_at(deadline, tasks.join_next_with_id()).await {
                Ok(Some(Ok((id, (target, outcome, elapsed))))) => {
                    take_pending(pending, id);
                    self.merge(report, &target, outcome, elapsed).await;
                }
                Ok(Some(Err(join_error))) => {
                    let Some(target) = take_pending(pending, join_error.id()) else {
                        continue;
                    };
                    error!(service = %target.name(), error = %join_error, "lookup task failed");
                    report.push(LookupResult::internal_failure(
                        target.name().as_str(),
                        join_error.to_string(),
                        started.elapsed(),
                    ));
                }
                Ok(None) => return,
                Err(_) => break,
            }
        }

        tasks.abort_all();
        for (_, target) in pending.drain(..) {
            warn!(service = %target.name(), "lookup abandoned at merge deadline");
            report.push(LookupResult::timed_out(
                target.name().as_str(),
                started.elapsed(),
            ));
            self.demote(&target, &DownstreamError::TimedOut).await;
        }
    }

    async fn merge(
        &self,
        report: &mut AggregateReport,
        target: &LookupTarget,
        outcome: Result<DownstreamReply, DownstreamError>,
        elapsed: Duration,
    ) {
        let service = target.name().as_str();
        match outcome {
            Ok(reply) => {
                debug!(service, status = reply.status, "lookup answered");
                report.push(LookupResult::from_reply(service, reply, elapsed));
            }
            Err(failure) => {
                warn!(service, error = %failure, "lookup failed; demoting service");
                report.push(LookupResult::from_error(service, &failure, elapsed));
                self.demote(target, &failure).await;
            }
        }
    }

    async fn demote(&self, target: &LookupTarget, failure: &DownstreamError) {
        if let Err(err) = self
            .directory
            .report_unreachable(target.id(), &failure.to_string())
            .await
        {
            error!(service = %target.name(), error = %err, "failed to record service as dead");
        }
    }
}

fn call_service<L: DownstreamClient + 'static>(
    client: Arc<L>,
    target: LookupTarget,
    query: Arc<str>,
    call_timeout: Duration,
) -> impl Future<Output = CallOutcome> + Send + 'static {
    async move {
        let call_started = Instant::now();
        let outcome = timeout(call_timeout, client.fetch(&target, &query))
            .await
            .unwrap_or_else(|_| Err(DownstreamError::TimedOut));
        (target, outcome, call_started.elapsed())
    }
}

fn take_pending(
    pending: &mut Vec<(task::Id, LookupTarget)>,
    id: task::Id,
) -> Option<LookupTarget> {
    let position = pending.iter().position(|(task_id, _)| *task_id == id)?;
    Some(pending.remove(position).1)
}
