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

//! Outbound event publisher: hands [`WorkerEvent`]s to the job-management plane.

use async_trait::async_trait;

use crate::model::WorkerEvent;

/// Routes a worker lifecycle event to the job-management plane. Routing to an in-process
/// component is assumed infallible; a `false` return indicates a programming error rather than
/// a transient condition, and is logged rather than retried.
#[async_trait]
pub trait JobMessageRouter: Send + Sync {
    async fn route_worker_event(&self, event: WorkerEvent) -> bool;
}
