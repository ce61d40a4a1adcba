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

//! The external collaborators that own the resource cluster and the executor RPC transport.
//!
//! Both the cluster itself (inventory, placement policy) and the executor transport are out of
//! scope for this crate; only the trait boundary the dispatch engine consumes is defined here.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Ack, ExecutorPayload, MachineDefinition, TaskExecutorId, TaskExecutorRegistration};

/// A view onto the cluster's executor inventory and placement policy.
///
/// Implementations must be safe for concurrent use: the dispatch engine consults this trait
/// both from its event loop and from async continuations spawned off the loop.
#[async_trait]
pub trait ResourceCluster: Send + Sync {
    /// Reserve an executor satisfying `machine_definition` for `worker_id`, or fail if none is
    /// currently available. The engine must not hold the event-loop thread during this call.
    async fn get_task_executor_for(
        &self,
        machine_definition: &MachineDefinition,
        worker_id: &str,
    ) -> Result<TaskExecutorId>;

    /// Resolve the `Gateway` used to talk to a given executor.
    async fn get_task_executor_gateway(
        &self,
        executor_id: &TaskExecutorId,
    ) -> Result<Arc<dyn Gateway>>;

    /// Look up the current registration for a known executor ID. May be called more than once
    /// for the same executor across the lifetime of a placement, since the registration can
    /// change between assignment and the eventual launch notification.
    async fn get_task_executor_info(
        &self,
        executor_id: &TaskExecutorId,
    ) -> Result<TaskExecutorRegistration>;

    /// Resolve the executor currently hosting a worker by the hostname advertised at
    /// submission time, for the cancellation pipeline.
    async fn get_task_executor_info_by_host(
        &self,
        host_name: &str,
    ) -> Result<TaskExecutorRegistration>;
}

/// The RPC surface a selected executor exposes to the scheduler.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn submit_task(&self, payload: ExecutorPayload) -> Result<Ack>;

    async fn cancel_task(&self, worker_id: &str) -> Result<Ack>;
}
