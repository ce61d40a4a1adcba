// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use parking_lot::RwLock;

use crate::clock::{Timer, TimerAction};
use crate::cluster::ResourceCluster;
use crate::config::DispatchEngineConfig;
use crate::engine::event::DispatchEvent;
use crate::error::{DispatchError, Result};
use crate::event_loop::{EventAction, EventSender};
use crate::metrics::DispatchMetricsCollector;
use crate::model::{AttemptEnvelope, CancelRequest, TaskExecutorId, WorkerEvent};
use crate::payload::PayloadBuilder;
use crate::router::JobMessageRouter;

/// Implements the placement pipeline and the cancellation pipeline as handlers over
/// [`DispatchEvent`]. Each handler either completes synchronously (cheap, in-memory work like
/// publishing an already-resolved outcome) or spawns a `tokio` task that performs the async
/// collaborator calls and posts the result back through [`EventSender`]; the handler itself
/// never awaits a remote call.
pub(crate) struct DispatchEventAction {
    cluster: Arc<dyn ResourceCluster>,
    router: Arc<dyn JobMessageRouter>,
    payload_builder: Arc<dyn PayloadBuilder>,
    timer: Arc<dyn Timer>,
    metrics: Arc<dyn DispatchMetricsCollector>,
    config: DispatchEngineConfig,
    sender: RwLock<Option<EventSender<DispatchEvent>>>,
}

impl DispatchEventAction {
    pub(crate) fn new(
        cluster: Arc<dyn ResourceCluster>,
        router: Arc<dyn JobMessageRouter>,
        payload_builder: Arc<dyn PayloadBuilder>,
        timer: Arc<dyn Timer>,
        metrics: Arc<dyn DispatchMetricsCollector>,
        config: DispatchEngineConfig,
    ) -> Self {
        Self {
            cluster,
            router,
            payload_builder,
            timer,
            metrics,
            config,
            sender: RwLock::new(None),
        }
    }

    /// Must be called once, after the owning [`crate::event_loop::EventLoop`] has been started,
    /// before any event is posted to it.
    pub(crate) fn set_sender(&self, sender: EventSender<DispatchEvent>) {
        *self.sender.write() = Some(sender);
    }

    fn sender(&self) -> Result<EventSender<DispatchEvent>> {
        self.sender
            .read()
            .clone()
            .ok_or_else(|| DispatchError::Internal("event sender not initialized".to_string()))
    }

    fn handle_schedule_request(&self, envelope: AttemptEnvelope) -> Result<Option<DispatchEvent>> {
        let worker_id = envelope.request.worker_id.clone();
        debug!(
            "assigning worker {} (attempt {}) to an executor",
            worker_id, envelope.attempt
        );
        self.metrics
            .record_assignment_attempt(&worker_id, envelope.attempt);

        let cluster = self.cluster.clone();
        let sender = self.sender()?;
        tokio::spawn(async move {
            let machine_definition = envelope.request.machine_definition.clone();
            let outcome = cluster
                .get_task_executor_for(&machine_definition, &worker_id)
                .await;
            let event = match outcome {
                Ok(executor_id) => DispatchEvent::AssignedScheduleRequestEvent { envelope, executor_id },
                Err(e) => DispatchEvent::FailedToScheduleRequestEvent {
                    envelope,
                    cause: e.cause_string(),
                },
            };
            if let Err(e) = sender.post_event(event).await {
                error!("failed to post assignment outcome for {worker_id}: {e}");
            }
        });

        Ok(None)
    }

    fn handle_assigned(
        &self,
        envelope: AttemptEnvelope,
        executor_id: TaskExecutorId,
    ) -> Result<Option<DispatchEvent>> {
        let worker_id = envelope.request.worker_id.clone();
        debug!("worker {worker_id} assigned to executor {executor_id}, submitting task");

        let cluster = self.cluster.clone();
        let payload_builder = self.payload_builder.clone();
        let metrics = self.metrics.clone();
        let sender = self.sender()?;
        tokio::spawn(async move {
            let outcome = async {
                let registration = cluster.get_task_executor_info(&executor_id).await?;
                let gateway = cluster.get_task_executor_gateway(&executor_id).await?;
                let payload = payload_builder.build(&envelope.request, &registration);
                gateway.submit_task(payload).await
            }
            .await;

            let event = match outcome {
                Ok(_ack) => {
                    metrics.record_submitted(&worker_id, envelope.attempt);
                    DispatchEvent::SubmittedScheduleRequestEvent { envelope, executor_id }
                }
                Err(e) => DispatchEvent::FailedToSubmitScheduleRequestEvent {
                    envelope,
                    executor_id,
                    cause: e.cause_string(),
                },
            };
            if let Err(e) = sender.post_event(event).await {
                error!("failed to post submission outcome for {worker_id}: {e}");
            }
        });

        Ok(None)
    }

    fn handle_assignment_failed(
        &self,
        envelope: AttemptEnvelope,
        cause: String,
    ) -> Result<Option<DispatchEvent>> {
        let worker_id = envelope.request.worker_id.clone();
        self.metrics
            .record_assignment_failed(&worker_id, envelope.attempt);

        if self.config.allows_retry(envelope.attempt) {
            info!(
                "assignment failed for worker {worker_id} (attempt {}): {cause}; retrying in {:?}",
                envelope.attempt, self.config.assignment_retry_delay
            );
            let delay = self.config.assignment_retry_delay;
            let sender = self.sender()?;
            let timer = self.timer.clone();
            let action: TimerAction = Box::pin(async move {
                let retried = envelope.retry(cause);
                if let Err(e) = sender
                    .post_event(DispatchEvent::ScheduleRequestEvent(retried))
                    .await
                {
                    error!("failed to post retry for {worker_id}: {e}");
                }
            });
            tokio::spawn(async move {
                timer.schedule_once(delay, action).await;
            });
            Ok(None)
        } else {
            warn!(
                "assignment attempt cap reached for worker {worker_id} after attempt {}: {cause}",
                envelope.attempt
            );
            let stage_num = envelope.request.stage_num;
            let router = self.router.clone();
            tokio::spawn(async move {
                let event = WorkerEvent::WorkerLaunchFailed {
                    worker_id: worker_id.clone(),
                    stage_num,
                    cause_string: cause,
                };
                if !router.route_worker_event(event).await {
                    error!("job message router rejected worker event for {worker_id}");
                }
            });
            Ok(None)
        }
    }

    fn handle_submitted(
        &self,
        envelope: AttemptEnvelope,
        executor_id: TaskExecutorId,
    ) -> Result<Option<DispatchEvent>> {
        let worker_id = envelope.request.worker_id.clone();
        let stage_num = envelope.request.stage_num;
        let attempt = envelope.attempt;
        let cluster = self.cluster.clone();
        let router = self.router.clone();
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            match cluster.get_task_executor_info(&executor_id).await {
                Ok(registration) => {
                    let event = WorkerEvent::WorkerLaunched {
                        worker_id: worker_id.clone(),
                        stage_num,
                        hostname: registration.hostname,
                        resource_id: registration.resource_id,
                        cluster_resource_id: Some(registration.cluster_id),
                        worker_ports: registration.worker_ports,
                    };
                    metrics.record_launched(&worker_id, attempt);
                    if !router.route_worker_event(event).await {
                        error!("job message router rejected worker event for {worker_id}");
                    }
                }
                Err(e) => {
                    // The executor accepted the task but its registration vanished before we
                    // could re-read it; surface this as a submission-phase failure rather than
                    // silently dropping an accepted task.
                    error!("failed to re-read registration for launched worker {worker_id}: {e}");
                    let event = WorkerEvent::WorkerLaunchFailed {
                        worker_id: worker_id.clone(),
                        stage_num,
                        cause_string: e.cause_string(),
                    };
                    metrics.record_submission_failed(&worker_id);
                    if !router.route_worker_event(event).await {
                        error!("job message router rejected worker event for {worker_id}");
                    }
                }
            }
        });

        Ok(None)
    }

    fn handle_submission_failed(
        &self,
        envelope: AttemptEnvelope,
        cause: String,
    ) -> Result<Option<DispatchEvent>> {
        let worker_id = envelope.request.worker_id.clone();
        let stage_num = envelope.request.stage_num;
        self.metrics.record_submission_failed(&worker_id);
        warn!("submission terminally failed for worker {worker_id}: {cause}");

        let router = self.router.clone();
        tokio::spawn(async move {
            let event = WorkerEvent::WorkerLaunchFailed {
                worker_id: worker_id.clone(),
                stage_num,
                cause_string: cause,
            };
            if !router.route_worker_event(event).await {
                error!("job message router rejected worker event for {worker_id}");
            }
        });

        Ok(None)
    }

    fn handle_cancel(&self, request: CancelRequest) -> Result<Option<DispatchEvent>> {
        let CancelRequest { worker_id, host_name } = request;
        debug!("cancelling worker {worker_id} believed to be on host {host_name}");
        let cluster = self.cluster.clone();
        let metrics = self.metrics.clone();
        let sender = self.sender()?;
        tokio::spawn(async move {
            let outcome = async {
                let registration = cluster.get_task_executor_info_by_host(&host_name).await?;
                let gateway = cluster
                    .get_task_executor_gateway(&registration.executor_id)
                    .await?;
                gateway.cancel_task(&worker_id).await
            }
            .await;

            match outcome {
                Ok(_ack) => {
                    metrics.record_cancellation_resolved(&worker_id);
                }
                Err(e) => {
                    // Cancellation failures are metered and logged rather than dropped; we
                    // still don't auto-retry a cancel.
                    warn!("failed to cancel worker {worker_id} on host {host_name}: {e}");
                    metrics.record_cancellation_failed(&worker_id);
                }
            }

            if let Err(e) = sender.post_event(DispatchEvent::Noop).await {
                error!("failed to post cancellation completion for {worker_id}: {e}");
            }
        });

        Ok(None)
    }
}

#[async_trait]
impl EventAction<DispatchEvent> for DispatchEventAction {
    fn on_start(&self) {
        info!("dispatch engine event loop starting");
    }

    fn on_stop(&self) {
        info!("dispatch engine event loop stopping");
    }

    async fn on_receive(&self, event: DispatchEvent) -> Result<Option<DispatchEvent>> {
        match event {
            DispatchEvent::ScheduleRequestEvent(envelope) => self.handle_schedule_request(envelope),
            DispatchEvent::CancelRequestEvent(request) => self.handle_cancel(request),
            DispatchEvent::AssignedScheduleRequestEvent { envelope, executor_id } => {
                self.handle_assigned(envelope, executor_id)
            }
            DispatchEvent::FailedToScheduleRequestEvent { envelope, cause } => {
                self.handle_assignment_failed(envelope, cause)
            }
            DispatchEvent::SubmittedScheduleRequestEvent { envelope, executor_id } => {
                self.handle_submitted(envelope, executor_id)
            }
            DispatchEvent::FailedToSubmitScheduleRequestEvent { envelope, cause, .. } => {
                self.handle_submission_failed(envelope, cause)
            }
            DispatchEvent::Noop => Ok(None),
        }
    }

    fn on_error(&self, error: DispatchError) {
        error!("dispatch engine event loop error: {error}");
    }
}
