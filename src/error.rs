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

use std::fmt;

/// Errors produced by the dispatch engine and its injected collaborators.
///
/// This mirrors the taxonomy in the design doc: assignment failures are retried,
/// submission/routing/cancellation failures are terminal (for the attempt) but never panic
/// or hang the event loop.
#[derive(Debug)]
pub enum DispatchError {
    /// `ResourceCluster::get_task_executor_for` could not place the worker right now.
    AssignmentUnavailable(String),
    /// `Gateway::submit_task` rejected the request.
    SubmissionRejected(String),
    /// `JobMessageRouter::route_worker_event` returned `false`.
    RoutingFailure(String),
    /// `Gateway::cancel_task`, or the executor lookup backing it, failed.
    CancellationFailure(String),
    /// A gateway/registration lookup failed outside of the above categories.
    LookupFailure(String),
    /// Anything else: channel closed, mailbox not started, etc.
    Internal(String),
}

impl DispatchError {
    /// Stringify the cause the way `WorkerLaunchFailed.cause_string` expects: informational
    /// only, not meant to be pattern-matched by callers.
    pub fn cause_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::AssignmentUnavailable(msg) => {
                write!(f, "no executor available for placement: {msg}")
            }
            DispatchError::SubmissionRejected(msg) => {
                write!(f, "task submission rejected: {msg}")
            }
            DispatchError::RoutingFailure(msg) => {
                write!(f, "failed to route worker event: {msg}")
            }
            DispatchError::CancellationFailure(msg) => {
                write!(f, "failed to cancel task: {msg}")
            }
            DispatchError::LookupFailure(msg) => {
                write!(f, "executor lookup failed: {msg}")
            }
            DispatchError::Internal(msg) => write!(f, "internal dispatch engine error: {msg}"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for DispatchError {
    fn from(e: tokio::sync::mpsc::error::SendError<T>) -> Self {
        DispatchError::Internal(format!("failed to send event: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
