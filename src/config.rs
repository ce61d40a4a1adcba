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

//! Dispatch engine specific configuration

use std::time::Duration;

/// Configuration for the dispatch engine's scheduling behavior.
///
/// This is constructed in code by the embedding application; the dispatch engine itself does
/// not parse configuration files or command line flags.
#[derive(Debug, Clone)]
pub struct DispatchEngineConfig {
    /// How long to wait after an assignment failure before retrying with `attempt + 1`.
    pub assignment_retry_delay: Duration,
    /// The event loop mailbox buffer size. For a dispatch engine handling many concurrent
    /// requests, a larger value is recommended.
    pub event_loop_buffer_size: usize,
    /// Maximum number of assignment attempts before giving up and publishing
    /// `WorkerLaunchFailed`. `None` means retries are unbounded, matching the original design.
    pub max_assignment_attempts: Option<u32>,
}

impl Default for DispatchEngineConfig {
    fn default() -> Self {
        Self {
            assignment_retry_delay: Duration::from_secs(60),
            event_loop_buffer_size: 10_000,
            max_assignment_attempts: None,
        }
    }
}

impl DispatchEngineConfig {
    pub fn with_assignment_retry_delay(mut self, delay: Duration) -> Self {
        self.assignment_retry_delay = delay;
        self
    }

    pub fn with_event_loop_buffer_size(mut self, buffer_size: usize) -> Self {
        self.event_loop_buffer_size = buffer_size;
        self
    }

    pub fn with_max_assignment_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_assignment_attempts = max_attempts;
        self
    }

    /// Whether `attempt` is allowed to be retried again (i.e. `attempt + 1` would still be
    /// within the configured cap, if any).
    pub fn allows_retry(&self, attempt: u32) -> bool {
        match self.max_assignment_attempts {
            Some(max) => attempt < max,
            None => true,
        }
    }
}
