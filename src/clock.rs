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

//! Timer abstraction used to schedule the delayed assignment retry.
//!
//! Production wiring uses [`TokioTimer`], which schedules on the Tokio wall clock. Tests use
//! [`ManualTimer`], which only fires callbacks when explicitly advanced, so a 60s retry delay
//! doesn't require a real 60s sleep in the test suite.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

pub type TimerAction = Pin<Box<dyn Future<Output = ()> + Send>>;

#[async_trait]
pub trait Timer: Send + Sync {
    /// Schedule `action` to run once, after `delay` has elapsed.
    async fn schedule_once(&self, delay: Duration, action: TimerAction);
}

/// Wall-clock timer backed by `tokio::time::sleep`.
#[derive(Default, Clone)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn schedule_once(&self, delay: Duration, action: TimerAction) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
    }
}

/// A timer that only fires when [`ManualTimer::fire_all`] is called, for deterministic tests of
/// the retry-after-delay transition.
#[derive(Clone, Default)]
pub struct ManualTimer {
    pending: Arc<Mutex<Vec<(Duration, TimerAction)>>>,
}

#[async_trait]
impl Timer for ManualTimer {
    async fn schedule_once(&self, delay: Duration, action: TimerAction) {
        self.pending.lock().push((delay, action));
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every action currently pending, regardless of its configured delay, and run them to
    /// completion. This is enough to drive the retry transition in tests without depending on
    /// wall-clock time.
    pub async fn fire_all(&self) {
        let pending = std::mem::take(&mut *self.pending.lock());
        for (_, action) in pending {
            action.await;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
