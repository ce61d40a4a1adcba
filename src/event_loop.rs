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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use tokio::sync::mpsc;

use crate::error::{DispatchError, Result};

/// A handler invoked once per message delivered to an [`EventLoop`]'s mailbox.
///
/// `on_receive` may return `Ok(Some(event))` to have the loop re-post another event on its own
/// behalf (used sparingly; most continuations post through a cloned [`EventSender`] instead so
/// that async work doesn't block the handler).
#[async_trait]
pub trait EventAction<E>: Send + Sync {
    fn on_start(&self);

    fn on_stop(&self);

    async fn on_receive(&self, event: E) -> Result<Option<E>>;

    fn on_error(&self, error: DispatchError);
}

/// A cloneable handle used to post events into a running [`EventLoop`]'s mailbox.
#[derive(Clone)]
pub struct EventSender<E> {
    tx_event: mpsc::Sender<E>,
}

impl<E> EventSender<E> {
    pub async fn post_event(&self, event: E) -> Result<()> {
        self.tx_event
            .send(event)
            .await
            .map_err(|e| DispatchError::Internal(format!("failed to send event: {e}")))
    }
}

/// A single-consumer mailbox that serializes delivery of `E` to one [`EventAction`].
///
/// All state transitions for all in-flight requests are serialized through this mailbox; the
/// loop itself never blocks on I/O, only `recv`.
pub struct EventLoop<E> {
    name: String,
    stopped: Arc<AtomicBool>,
    buffer_size: usize,
    action: Arc<dyn EventAction<E>>,
    tx_event: Option<mpsc::Sender<E>>,
}

impl<E: Send + 'static> EventLoop<E> {
    pub fn new(name: String, buffer_size: usize, action: Arc<dyn EventAction<E>>) -> Self {
        Self {
            name,
            stopped: Arc::new(AtomicBool::new(false)),
            buffer_size,
            action,
            tx_event: None,
        }
    }

    fn run(&self, mut rx_event: mpsc::Receiver<E>) {
        assert!(
            self.tx_event.is_some(),
            "the event sender should be initialized first"
        );
        let tx_event = self.tx_event.as_ref().unwrap().clone();
        let name = self.name.clone();
        let stopped = self.stopped.clone();
        let action = self.action.clone();
        tokio::spawn(async move {
            info!("starting the event loop {}", name);
            while !stopped.load(Ordering::SeqCst) {
                let event = match rx_event.recv().await {
                    Some(event) => event,
                    None => break,
                };
                match action.on_receive(event).await {
                    Ok(Some(event)) => {
                        if let Err(e) = tx_event.send(event).await {
                            let msg = format!("failed to re-post event: {e}");
                            error!("{msg}");
                            action.on_error(DispatchError::Internal(msg));
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("failed to process event: {e}");
                        action.on_error(e);
                    }
                }
            }
            info!("the event loop {} has been stopped", name);
        });
    }

    pub fn start(&mut self) -> Result<()> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(DispatchError::Internal(format!(
                "{} has already been stopped",
                self.name
            )));
        }
        self.action.on_start();

        let (tx_event, rx_event) = mpsc::channel::<E>(self.buffer_size);
        self.tx_event = Some(tx_event);
        self.run(rx_event);

        Ok(())
    }

    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.action.on_stop();
        } else {
            // Keep quiet to allow calling `stop` multiple times.
        }
    }

    pub fn get_sender(&self) -> Result<EventSender<E>> {
        self.tx_event
            .as_ref()
            .map(|tx_event| EventSender {
                tx_event: tx_event.clone(),
            })
            .ok_or_else(|| {
                warn!("event sender requested before the event loop was started");
                DispatchError::Internal(format!("{} has not been started", self.name))
            })
    }

    pub async fn post_event(&self, event: E) -> Result<()> {
        if let Some(tx_event) = self.tx_event.as_ref() {
            tx_event
                .send(event)
                .await
                .map_err(|e| DispatchError::Internal(format!("failed to send event: {e}")))
        } else {
            warn!("event sender does not exist");
            Ok(())
        }
    }
}
