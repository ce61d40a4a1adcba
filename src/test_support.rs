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

//! Shared test collaborators for the dispatch engine's scenario tests.
//!
//! Hand-rolled stub implementations of every injected collaborator trait, plus small assertion
//! helpers, kept in one module so individual test modules stay focused on the scenario being
//! exercised.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::cluster::{Gateway, ResourceCluster};
use crate::error::{DispatchError, Result};
use crate::metrics::DispatchMetricsCollector;
use crate::model::{
    Ack, ExecutorPayload, MachineDefinition, ScheduleRequest, TaskExecutorId,
    TaskExecutorRegistration, WorkerEvent,
};
use crate::payload::PayloadBuilder;
use crate::router::JobMessageRouter;

pub fn test_machine_definition() -> MachineDefinition {
    MachineDefinition {
        cpu_cores: 1,
        memory_mb: 512,
        disk_mb: 1024,
        network_mbps: 100,
    }
}

pub fn test_request(worker_id: &str, stage_num: u32) -> ScheduleRequest {
    ScheduleRequest {
        worker_id: worker_id.to_owned(),
        stage_num,
        machine_definition: test_machine_definition(),
        payload: vec![],
    }
}

pub fn test_registration(executor_id: &str, hostname: &str, ports: Vec<u16>) -> TaskExecutorRegistration {
    TaskExecutorRegistration {
        executor_id: TaskExecutorId(executor_id.to_owned()),
        hostname: hostname.to_owned(),
        cluster_id: "cluster-1".to_owned(),
        worker_ports: ports,
        resource_id: format!("resource-{executor_id}"),
    }
}

/// Per-worker scripted sequence of `get_task_executor_for` outcomes, consumed in order. This is
/// how scenario S2 (retry after assignment failure) simulates "fails once, then succeeds".
#[derive(Default)]
pub struct FakeResourceCluster {
    assignment_script: Mutex<HashMap<String, Vec<Result<TaskExecutorId>>>>,
    registrations: Mutex<HashMap<TaskExecutorId, TaskExecutorRegistration>>,
    gateways: Mutex<HashMap<TaskExecutorId, Arc<dyn Gateway>>>,
    pub assignment_calls: Mutex<Vec<String>>,
}

impl FakeResourceCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_assignment(&self, worker_id: &str, outcomes: Vec<Result<TaskExecutorId>>) {
        self.assignment_script
            .lock()
            .insert(worker_id.to_owned(), outcomes);
    }

    pub fn register(&self, registration: TaskExecutorRegistration, gateway: Arc<dyn Gateway>) {
        let executor_id = registration.executor_id.clone();
        self.registrations.lock().insert(executor_id.clone(), registration);
        self.gateways.lock().insert(executor_id, gateway);
    }

    /// Overwrite an already-registered executor's registration in place (scenario S6).
    pub fn update_registration(&self, registration: TaskExecutorRegistration) {
        self.registrations
            .lock()
            .insert(registration.executor_id.clone(), registration);
    }
}

fn dispatch_err_clone(e: &DispatchError) -> DispatchError {
    DispatchError::AssignmentUnavailable(e.cause_string())
}

#[async_trait]
impl ResourceCluster for FakeResourceCluster {
    async fn get_task_executor_for(
        &self,
        _machine_definition: &MachineDefinition,
        worker_id: &str,
    ) -> Result<TaskExecutorId> {
        self.assignment_calls.lock().push(worker_id.to_owned());
        let mut script = self.assignment_script.lock();
        let outcomes = script
            .get_mut(worker_id)
            .ok_or_else(|| DispatchError::AssignmentUnavailable(format!("no script for {worker_id}")))?;
        if outcomes.is_empty() {
            return Err(DispatchError::AssignmentUnavailable(format!(
                "script exhausted for {worker_id}"
            )));
        }
        match &outcomes[0] {
            Ok(id) => {
                let id = id.clone();
                outcomes.remove(0);
                Ok(id)
            }
            Err(e) => {
                let e = dispatch_err_clone(e);
                outcomes.remove(0);
                Err(e)
            }
        }
    }

    async fn get_task_executor_gateway(&self, executor_id: &TaskExecutorId) -> Result<Arc<dyn Gateway>> {
        self.gateways
            .lock()
            .get(executor_id)
            .cloned()
            .ok_or_else(|| DispatchError::LookupFailure(format!("no gateway for {executor_id}")))
    }

    async fn get_task_executor_info(
        &self,
        executor_id: &TaskExecutorId,
    ) -> Result<TaskExecutorRegistration> {
        self.registrations
            .lock()
            .get(executor_id)
            .cloned()
            .ok_or_else(|| DispatchError::LookupFailure(format!("no registration for {executor_id}")))
    }

    async fn get_task_executor_info_by_host(
        &self,
        host_name: &str,
    ) -> Result<TaskExecutorRegistration> {
        self.registrations
            .lock()
            .values()
            .find(|reg| reg.hostname == host_name)
            .cloned()
            .ok_or_else(|| DispatchError::LookupFailure(format!("no executor hosted on {host_name}")))
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub submit_result: Mutex<Option<Result<Ack>>>,
    pub cancel_result: Mutex<Option<Result<Ack>>>,
    pub submitted: Mutex<Vec<ExecutorPayload>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submit_result(self, result: Result<Ack>) -> Self {
        *self.submit_result.lock() = Some(result);
        self
    }

    pub fn with_cancel_result(self, result: Result<Ack>) -> Self {
        *self.cancel_result.lock() = Some(result);
        self
    }
}

fn clone_ack_result(result: &Option<Result<Ack>>) -> Result<Ack> {
    match result {
        Some(Ok(ack)) => Ok(*ack),
        Some(Err(e)) => Err(DispatchError::SubmissionRejected(e.cause_string())),
        None => Ok(Ack),
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn submit_task(&self, payload: ExecutorPayload) -> Result<Ack> {
        self.submitted.lock().push(payload);
        clone_ack_result(&self.submit_result.lock())
    }

    async fn cancel_task(&self, worker_id: &str) -> Result<Ack> {
        self.cancelled.lock().push(worker_id.to_owned());
        clone_ack_result(&self.cancel_result.lock())
    }
}

#[derive(Default)]
pub struct TestJobMessageRouter {
    pub events: Arc<Mutex<Vec<WorkerEvent>>>,
}

impl TestJobMessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WorkerEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl JobMessageRouter for TestJobMessageRouter {
    async fn route_worker_event(&self, event: WorkerEvent) -> bool {
        self.events.lock().push(event);
        true
    }
}

pub struct TestPayloadBuilder;

impl PayloadBuilder for TestPayloadBuilder {
    fn build(
        &self,
        request: &ScheduleRequest,
        _registration: &TaskExecutorRegistration,
    ) -> ExecutorPayload {
        ExecutorPayload(request.worker_id.clone().into_bytes())
    }
}

#[derive(Default)]
pub struct TestMetricsCollector {
    pub events: Arc<Mutex<Vec<MetricEvent>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricEvent {
    AssignmentAttempt(String, u32),
    AssignmentFailed(String, u32),
    Submitted(String, u32),
    Launched(String, u32),
    SubmissionFailed(String),
    CancellationResolved(String),
    CancellationFailed(String),
}

impl TestMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MetricEvent> {
        self.events.lock().clone()
    }
}

impl DispatchMetricsCollector for TestMetricsCollector {
    fn record_assignment_attempt(&self, worker_id: &str, attempt: u32) {
        self.events
            .lock()
            .push(MetricEvent::AssignmentAttempt(worker_id.to_owned(), attempt));
    }

    fn record_assignment_failed(&self, worker_id: &str, attempt: u32) {
        self.events
            .lock()
            .push(MetricEvent::AssignmentFailed(worker_id.to_owned(), attempt));
    }

    fn record_submitted(&self, worker_id: &str, attempt: u32) {
        self.events
            .lock()
            .push(MetricEvent::Submitted(worker_id.to_owned(), attempt));
    }

    fn record_launched(&self, worker_id: &str, attempt: u32) {
        self.events
            .lock()
            .push(MetricEvent::Launched(worker_id.to_owned(), attempt));
    }

    fn record_submission_failed(&self, worker_id: &str) {
        self.events
            .lock()
            .push(MetricEvent::SubmissionFailed(worker_id.to_owned()));
    }

    fn record_cancellation_resolved(&self, worker_id: &str) {
        self.events
            .lock()
            .push(MetricEvent::CancellationResolved(worker_id.to_owned()));
    }

    fn record_cancellation_failed(&self, worker_id: &str) {
        self.events
            .lock()
            .push(MetricEvent::CancellationFailed(worker_id.to_owned()));
    }
}

/// Poll `cond` at `interval` up to `iterations` times, returning `true` as soon as it does.
pub async fn await_condition<F: Fn() -> bool>(interval: Duration, iterations: usize, cond: F) -> bool {
    for _ in 0..iterations {
        if cond() {
            return true;
        }
        tokio::time::sleep(interval).await;
    }
    cond()
}
