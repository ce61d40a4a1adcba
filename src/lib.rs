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

//! Dispatch engine: a scheduler dispatch actor that places streaming-job workers onto cluster
//! task executors.
//!
//! The engine coordinates four asynchronous interactions (resource assignment, task submission,
//! status publication, and cancellation) through a single-consumer event loop, with
//! bounded-by-configuration retry of transient assignment failures.

pub mod clock;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod metrics;
pub mod model;
pub mod payload;
pub mod router;

#[cfg(test)]
mod test_support;

pub use config::DispatchEngineConfig;
pub use engine::DispatchEngine;
pub use error::{DispatchError, Result};
pub use model::{
    Ack, AttemptEnvelope, CancelRequest, ExecutorPayload, MachineDefinition, ScheduleRequest,
    TaskExecutorId, TaskExecutorRegistration, WorkerEvent,
};
