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

//! Data model shared by the placement and cancellation pipelines.

use std::fmt;

/// The CPU/memory/disk/network shape a worker requires for placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDefinition {
    pub cpu_cores: u32,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub network_mbps: u32,
}

/// An inbound request to place one worker of one stage of a streaming job.
///
/// Immutable once constructed. `payload` carries whatever opaque, executor-bound data the
/// caller needs delivered alongside the machine definition; this engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub worker_id: String,
    pub stage_num: u32,
    pub machine_definition: MachineDefinition,
    pub payload: Vec<u8>,
}

/// Wraps a [`ScheduleRequest`] with the 1-based attempt counter and, for attempt > 1, the cause
/// of the previous failure. This is the unit the placement pipeline operates on.
#[derive(Debug, Clone)]
pub struct AttemptEnvelope {
    pub request: ScheduleRequest,
    pub attempt: u32,
    pub prev_failure: Option<String>,
}

impl AttemptEnvelope {
    pub fn first(request: ScheduleRequest) -> Self {
        Self {
            request,
            attempt: 1,
            prev_failure: None,
        }
    }

    pub fn retry(self, cause: String) -> Self {
        Self {
            request: self.request,
            attempt: self.attempt + 1,
            prev_failure: Some(cause),
        }
    }
}

/// Opaque identifier of a cluster node capable of running a task, produced by the resource
/// cluster's placement function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskExecutorId(pub String);

impl fmt::Display for TaskExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptor of a selected executor, as returned by the resource cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskExecutorRegistration {
    pub executor_id: TaskExecutorId,
    pub hostname: String,
    pub cluster_id: String,
    pub worker_ports: Vec<u16>,
    pub resource_id: String,
}

/// Acknowledgement returned by a successful `Gateway` call. Carries no data of interest to the
/// engine beyond "the remote call succeeded".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

/// A request to cancel a worker, identified by the hostname currently hosting it. This is the
/// argument type for [`crate::engine::DispatchEngine::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub worker_id: String,
    pub host_name: String,
}

/// Lifecycle events published to the job-management plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    WorkerLaunched {
        worker_id: String,
        stage_num: u32,
        hostname: String,
        resource_id: String,
        cluster_resource_id: Option<String>,
        worker_ports: Vec<u16>,
    },
    WorkerLaunchFailed {
        worker_id: String,
        stage_num: u32,
        cause_string: String,
    },
}

/// The payload an executor's `Gateway::submit_task` call expects. This engine treats the
/// contents as opaque bytes built by an injected [`crate::payload::PayloadBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorPayload(pub Vec<u8>);
