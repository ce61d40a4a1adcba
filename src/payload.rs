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

//! The pure builder that packages a [`ScheduleRequest`] and a resolved executor registration
//! into the payload a `Gateway::submit_task` call expects.
//!
//! The actual `ExecuteStageRequest` packaging logic is out of scope for this crate (it depends
//! on the deployment-artifact format of the job-management plane); only the seam is defined
//! here.

use crate::model::{ExecutorPayload, ScheduleRequest, TaskExecutorRegistration};

/// Builds the executor-bound payload for a schedule request. Implementations must be pure:
/// no I/O, no interior mutability observable across calls.
pub trait PayloadBuilder: Send + Sync {
    fn build(
        &self,
        request: &ScheduleRequest,
        registration: &TaskExecutorRegistration,
    ) -> ExecutorPayload;
}
