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

use once_cell::sync::OnceCell;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_with_registry, CounterVec, Histogram,
    Registry,
};

use crate::error::{DispatchError, Result};
use crate::metrics::DispatchMetricsCollector;

static COLLECTOR: OnceCell<Arc<dyn DispatchMetricsCollector>> = OnceCell::new();

pub struct PrometheusDispatchMetricsCollector {
    assignment_attempts: CounterVec,
    assignment_failures: CounterVec,
    submitted: CounterVec,
    launched: Histogram,
    submission_failures: CounterVec,
    cancellations: CounterVec,
}

impl PrometheusDispatchMetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let assignment_attempts = register_counter_vec_with_registry!(
            "dispatch_assignment_attempts_total",
            "Count of assignment attempts per worker",
            &["worker_id"],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        let assignment_failures = register_counter_vec_with_registry!(
            "dispatch_assignment_failures_total",
            "Count of assignment failures per worker",
            &["worker_id"],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        let submitted = register_counter_vec_with_registry!(
            "dispatch_submitted_total",
            "Count of task submissions per worker",
            &["worker_id"],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        let launched = register_histogram_with_registry!(
            "dispatch_attempts_to_launch",
            "Histogram of the attempt number at which a worker was successfully launched",
            vec![1.0_f64, 2.0_f64, 3.0_f64, 5.0_f64, 10.0_f64],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        let submission_failures = register_counter_vec_with_registry!(
            "dispatch_submission_failures_total",
            "Count of terminal submission failures per worker",
            &["worker_id"],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        let cancellations = register_counter_vec_with_registry!(
            "dispatch_cancellations_total",
            "Count of cancellation outcomes per worker",
            &["worker_id", "outcome"],
            registry
        )
        .map_err(|e| DispatchError::Internal(format!("error registering metric: {e:?}")))?;

        Ok(Self {
            assignment_attempts,
            assignment_failures,
            submitted,
            launched,
            submission_failures,
            cancellations,
        })
    }

    pub fn current() -> Result<Arc<dyn DispatchMetricsCollector>> {
        COLLECTOR
            .get_or_try_init(|| {
                let collector = Self::new(prometheus::default_registry())?;
                Ok(Arc::new(collector) as Arc<dyn DispatchMetricsCollector>)
            })
            .map(|arc| arc.clone())
    }
}

impl DispatchMetricsCollector for PrometheusDispatchMetricsCollector {
    fn record_assignment_attempt(&self, worker_id: &str, _attempt: u32) {
        self.assignment_attempts.with_label_values(&[worker_id]).inc();
    }

    fn record_assignment_failed(&self, worker_id: &str, _attempt: u32) {
        self.assignment_failures.with_label_values(&[worker_id]).inc();
    }

    fn record_submitted(&self, worker_id: &str, _attempt: u32) {
        self.submitted.with_label_values(&[worker_id]).inc();
    }

    fn record_launched(&self, _worker_id: &str, attempt: u32) {
        self.launched.observe(attempt as f64);
    }

    fn record_submission_failed(&self, worker_id: &str) {
        self.submission_failures.with_label_values(&[worker_id]).inc();
    }

    fn record_cancellation_resolved(&self, worker_id: &str) {
        self.cancellations
            .with_label_values(&[worker_id, "resolved"])
            .inc();
    }

    fn record_cancellation_failed(&self, worker_id: &str) {
        self.cancellations
            .with_label_values(&[worker_id, "failed"])
            .inc();
    }
}
