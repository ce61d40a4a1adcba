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

//! The closed set of messages the dispatch engine's mailbox understands.

use crate::model::{AttemptEnvelope, CancelRequest, TaskExecutorId};

#[derive(Clone)]
pub enum DispatchEvent {
    /// Inbound: place this attempt. `attempt == 1` for a fresh `submit()` call; greater for a
    /// retry re-posted after the assignment retry delay.
    ScheduleRequestEvent(AttemptEnvelope),

    /// Inbound: cancel a worker believed to be hosted on the request's `host_name`.
    CancelRequestEvent(CancelRequest),

    /// Internal: `get_task_executor_for` succeeded.
    AssignedScheduleRequestEvent {
        envelope: AttemptEnvelope,
        executor_id: TaskExecutorId,
    },

    /// Internal: `get_task_executor_for` failed.
    FailedToScheduleRequestEvent { envelope: AttemptEnvelope, cause: String },

    /// Internal: `submit_task` acked.
    SubmittedScheduleRequestEvent {
        envelope: AttemptEnvelope,
        executor_id: TaskExecutorId,
    },

    /// Internal: `submit_task` failed, or the gateway/registration lookup preceding it failed.
    FailedToSubmitScheduleRequestEvent {
        envelope: AttemptEnvelope,
        executor_id: TaskExecutorId,
        cause: String,
    },

    /// Internal: completes a cancellation (success or failure already handled/logged).
    Noop,
}
