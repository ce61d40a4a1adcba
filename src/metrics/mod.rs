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

//! Metrics seam for the dispatch engine's lifecycle events.

#[cfg(feature = "prometheus-metrics")]
pub mod prometheus;

/// Collects counts for the lifecycle events the placement and cancellation pipelines emit.
///
/// Mirrors the shape of a typical scheduler metrics collector: one method per observable
/// transition, no return value, safe to call from any handler.
pub trait DispatchMetricsCollector: Send + Sync {
    fn record_assignment_attempt(&self, worker_id: &str, attempt: u32);
    fn record_assignment_failed(&self, worker_id: &str, attempt: u32);
    fn record_submitted(&self, worker_id: &str, attempt: u32);
    fn record_launched(&self, worker_id: &str, attempt: u32);
    fn record_submission_failed(&self, worker_id: &str);
    fn record_cancellation_resolved(&self, worker_id: &str);
    fn record_cancellation_failed(&self, worker_id: &str);
}

/// A collector that discards everything. Used as the default when no metrics backend is wired
/// up, so the engine never has to special-case "no collector configured".
#[derive(Default, Clone, Copy)]
pub struct NoopDispatchMetricsCollector;

impl DispatchMetricsCollector for NoopDispatchMetricsCollector {
    fn record_assignment_attempt(&self, _worker_id: &str, _attempt: u32) {}
    fn record_assignment_failed(&self, _worker_id: &str, _attempt: u32) {}
    fn record_submitted(&self, _worker_id: &str, _attempt: u32) {}
    fn record_launched(&self, _worker_id: &str, _attempt: u32) {}
    fn record_submission_failed(&self, _worker_id: &str) {}
    fn record_cancellation_resolved(&self, _worker_id: &str) {}
    fn record_cancellation_failed(&self, _worker_id: &str) {}
}
