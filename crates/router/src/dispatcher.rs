//! Dispatcher wiring: one subscription loop per
//! queue, spawned and tracked through `task::TaskManager` the same way the
//! rest of this workspace manages long-running work. Unlike the generic
//! `ReceiverFactory`/`Config`-driven pipeline the other crates in this
//! workspace still carry, the queue set here is fixed at compile time, so
//! there is no dynamic registration step.

use std::sync::Arc;

use async_trait::async_trait;
use model::messages::{BatchRequest, CompileScanDataRequest, RenderScanRequest, RobotBatchResponse, ScanData, ScanRequest};
use store::{BatchStore, InventoryStore, JobTypeCatalog, PartialStore};
use task::{labels::{ProcessLabels, TaskLabels}, TaskManager};

use crate::{
    collaborators::{BlobStore, RenderGenerator},
    ingest, scan,
};

/// Publish/subscribe over the named queues. The transport itself (a
/// fanout/topic broker) is an out-of-scope external collaborator; this
/// trait is the seam an adapter for one plugs into.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Subscribes to `queue`, returning a channel of raw message payloads.
    /// Called once per queue at dispatcher start.
    fn subscribe(&self, queue: &'static str) -> flume::Receiver<Vec<u8>>;

    /// Publishes `payload` to `queue`.
    async fn publish(&self, queue: &'static str, payload: Vec<u8>);
}

/// Subscribes to every named queue, validates and dispatches each
/// message to the handler it belongs to, and publishes the result. Holds
/// the collaborators every handler needs behind `Arc` so subscription loops
/// can be spawned independently.
pub struct Dispatcher {
    inventory: Arc<dyn InventoryStore>,
    partials: Arc<dyn PartialStore>,
    batches: Arc<dyn BatchStore>,
    catalog: Arc<dyn JobTypeCatalog>,
    blob_store: Arc<dyn BlobStore>,
    render_generator: Arc<dyn RenderGenerator>,
    process_labels: ProcessLabels,
}

impl Dispatcher {
    /// Builds a dispatcher over the given collaborators.
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        partials: Arc<dyn PartialStore>,
        batches: Arc<dyn BatchStore>,
        catalog: Arc<dyn JobTypeCatalog>,
        blob_store: Arc<dyn BlobStore>,
        render_generator: Arc<dyn RenderGenerator>,
    ) -> Self {
        Self {
            inventory,
            partials,
            batches,
            catalog,
            blob_store,
            render_generator,
            process_labels: ProcessLabels::new("router"),
        }
    }

    /// Spawns one subscription loop per queue, registering each with
    /// `task_manager`. Returns once every loop has been spawned; the loops
    /// themselves run until `broker` closes their channel.
    pub fn run(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        self.spawn_batch_request(broker, task_manager);
        self.spawn_batch_response(broker, task_manager);
        self.spawn_scan_compile(broker, task_manager);
        self.spawn_scan_request(broker, task_manager);
        self.spawn_scan_response(broker, task_manager);
        self.spawn_scan_data(broker, task_manager);
        self.spawn_inventory_render(broker, task_manager);
    }

    fn register(&self, task_manager: &mut TaskManager, queue: &str, handle: task::JoinHandleTask) {
        task_manager.register(handle, &TaskLabels::new("router", queue, "broker"));
    }

    fn spawn_batch_request(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let this = self.clone();
        let broker = broker.clone();
        let receiver = broker.subscribe("batch/request");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<BatchRequest>(&payload) {
                    Ok(requests) => {
                        match crate::batch::handle_batch_request(&requests, this.inventory.as_ref(), this.catalog.as_ref(), this.batches.as_ref()).await {
                            Ok(robot_batch_request) => match serde_json::to_vec(&robot_batch_request) {
                                Ok(bytes) => broker.publish("robot/batch_request", bytes).await,
                                Err(err) => tracing::error!(error = %err, "failed to encode robot/batch_request"),
                            },
                            Err(err) => tracing::error!(error = %err, "batch/request planning failed, aborting batch"),
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed batch/request"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "batch/request", "broker"))
        });
        self.register(task_manager, "batch/request", handle);
    }

    fn spawn_batch_response(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let this = self.clone();
        let broker = broker.clone();
        let receiver = broker.subscribe("batch/response");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<RobotBatchResponse>(&payload) {
                    Ok(response) => {
                        let updates = crate::batch::handle_batch_response(&response, this.inventory.as_ref(), this.batches.as_ref()).await;
                        publish_updates(&broker, updates).await;
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed batch/response"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "batch/response", "broker"))
        });
        self.register(task_manager, "batch/response", handle);
    }

    fn spawn_scan_compile(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let this = self.clone();
        let broker = broker.clone();
        let receiver = broker.subscribe("scan/compile");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<CompileScanDataRequest>(&payload) {
                    Ok(request) => {
                        let updates = crate::compile::handle_scan_compile(&request, this.partials.as_ref(), this.inventory.as_ref()).await;
                        publish_updates(&broker, updates).await;
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed scan/compile"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "scan/compile", "broker"))
        });
        self.register(task_manager, "scan/compile", handle);
    }

    fn spawn_scan_request(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let broker = broker.clone();
        let receiver = broker.subscribe("scan/request");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<ScanRequest>(&payload) {
                    Ok(request) => {
                        let relayed = scan::relay_scan_request(request);
                        match serde_json::to_vec(&relayed) {
                            Ok(bytes) => broker.publish("robot/scan_request", bytes).await,
                            Err(err) => tracing::error!(error = %err, "failed to encode robot/scan_request"),
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed scan/request"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "scan/request", "broker"))
        });
        self.register(task_manager, "scan/request", handle);
    }

    fn spawn_scan_response(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let broker = broker.clone();
        let receiver = broker.subscribe("scan/response");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice(&payload) {
                    Ok(response) => scan::log_scan_response(&response),
                    Err(err) => tracing::warn!(error = %err, "dropping malformed scan/response"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "scan/response", "broker"))
        });
        self.register(task_manager, "scan/response", handle);
    }

    fn spawn_scan_data(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let this = self.clone();
        let receiver = broker.subscribe("scan/data");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<ScanData>(&payload) {
                    Ok(data) => {
                        if let Err(err) = ingest::ingest_scan_data(data, this.partials.as_ref(), this.blob_store.as_ref()).await {
                            tracing::error!(error = %err, "scan/data ingestion failed");
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed scan/data"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "scan/data", "broker"))
        });
        self.register(task_manager, "scan/data", handle);
    }

    fn spawn_inventory_render(self: &Arc<Self>, broker: &Arc<dyn Broker>, task_manager: &mut TaskManager) {
        let this = self.clone();
        let receiver = broker.subscribe("inventory/render");
        let process_labels = self.process_labels.clone();
        let handle = tokio::spawn(async move {
            while let Ok(payload) = receiver.recv_async().await {
                match serde_json::from_slice::<RenderScanRequest>(&payload) {
                    Ok(request) => {
                        if let Err(err) = crate::render::dispatch_render_request(&request, this.inventory.as_ref(), this.render_generator.as_ref()).await {
                            tracing::error!(error = %err, "inventory/render dispatch failed");
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping malformed inventory/render"),
                }
            }
            TaskManager::no_task_cleaner(process_labels, TaskLabels::new("router", "inventory/render", "broker"))
        });
        self.register(task_manager, "inventory/render", handle);
    }
}

async fn publish_updates(broker: &Arc<dyn Broker>, updates: Vec<model::ItemUpdate>) {
    if updates.is_empty() {
        return;
    }
    match serde_json::to_vec(&updates) {
        Ok(bytes) => broker.publish("inventory/updates", bytes).await,
        Err(err) => tracing::error!(error = %err, "failed to encode inventory/updates"),
    }
}
