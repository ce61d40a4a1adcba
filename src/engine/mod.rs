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

//! The dispatch engine: turns [`ScheduleRequest`]s into running tasks on cluster executors.

pub mod action;
pub mod event;

use std::sync::Arc;

use crate::clock::{Timer, TokioTimer};
use crate::cluster::ResourceCluster;
use crate::config::DispatchEngineConfig;
use crate::error::Result;
use crate::event_loop::EventLoop;
use crate::metrics::{DispatchMetricsCollector, NoopDispatchMetricsCollector};
use crate::model::{AttemptEnvelope, CancelRequest, ScheduleRequest};
use crate::payload::PayloadBuilder;
use crate::router::JobMessageRouter;

use self::action::DispatchEventAction;
use self::event::DispatchEvent;

/// Owns the lifecycle of placing workers onto executors: resource assignment, task submission,
/// status publication, and cancellation. All state transitions are serialized through a single
/// mailbox (see [`crate::event_loop::EventLoop`]); the public methods here are thin, non-blocking
/// wrappers that enqueue messages.
pub struct DispatchEngine {
    event_loop: EventLoop<DispatchEvent>,
    action: Arc<DispatchEventAction>,
}

impl DispatchEngine {
    pub fn new(
        cluster: Arc<dyn ResourceCluster>,
        router: Arc<dyn JobMessageRouter>,
        payload_builder: Arc<dyn PayloadBuilder>,
        config: DispatchEngineConfig,
    ) -> Self {
        Self::with_collaborators(
            cluster,
            router,
            payload_builder,
            Arc::new(TokioTimer),
            Arc::new(NoopDispatchMetricsCollector),
            config,
        )
    }

    /// Full constructor allowing the timer and metrics collector to be swapped out, primarily
    /// for tests (a [`crate::clock::ManualTimer`] in place of the wall-clock [`TokioTimer`]).
    pub fn with_collaborators(
        cluster: Arc<dyn ResourceCluster>,
        router: Arc<dyn JobMessageRouter>,
        payload_builder: Arc<dyn PayloadBuilder>,
        timer: Arc<dyn Timer>,
        metrics: Arc<dyn DispatchMetricsCollector>,
        config: DispatchEngineConfig,
    ) -> Self {
        let action = Arc::new(DispatchEventAction::new(
            cluster,
            router,
            payload_builder,
            timer,
            metrics,
            config.clone(),
        ));
        let event_loop = EventLoop::new(
            "dispatch_engine".to_owned(),
            config.event_loop_buffer_size,
            action.clone(),
        );

        Self { event_loop, action }
    }

    /// Start the event loop. Must be called exactly once before [`DispatchEngine::submit`] or
    /// [`DispatchEngine::cancel`].
    pub fn init(&mut self) -> Result<()> {
        self.event_loop.start()?;
        self.action.set_sender(self.event_loop.get_sender()?);
        Ok(())
    }

    /// Enqueue a new placement request as attempt 1.
    pub async fn submit(&self, request: ScheduleRequest) -> Result<()> {
        self.event_loop
            .post_event(DispatchEvent::ScheduleRequestEvent(AttemptEnvelope::first(
                request,
            )))
            .await
    }

    /// Enqueue a cancellation for the worker believed to be hosted on `request.host_name`.
    pub async fn cancel(&self, request: CancelRequest) -> Result<()> {
        self.event_loop
            .post_event(DispatchEvent::CancelRequestEvent(request))
            .await
    }

    pub fn stop(&self) {
        self.event_loop.stop();
    }
}
