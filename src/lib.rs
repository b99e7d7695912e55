#![doc = include_str!("../README.md")]
#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results,
    variant_size_differences
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! `ouroboros-core` is the coordination brain of a warehouse-inventory
//! robot: it compiles noisy scan detections into a canonical
//! inventory model, plans ordered robot manipulations against client
//! requests, and reconciles the robot's reported outcomes back into
//! inventory state.
//!
//! The crate is a thin library, not a binary: the
//! message broker, document store, blob store, and render generator are
//! all external collaborators the embedding process supplies as
//! trait objects. [`Core`] is the one piece of end-to-end wiring this
//! crate adds on top of its component crates — it assembles a
//! [`router::Dispatcher`] from those collaborators and starts one
//! subscription loop per named queue.

pub use compiler;
pub use config;
pub use geometry;
pub use model;
pub use planner;
pub use response;
pub use router;
pub use store;
pub use task;

use std::sync::Arc;

use router::{BlobStore, Broker, Dispatcher, RenderGenerator};
use store::{BatchStore, InventoryStore, JobTypeCatalog, PartialStore};
use task::TaskManager;

/// Assembles every component crate behind the collaborator traits the
/// embedding process supplies, and starts the router's subscription
/// loops. Every collaborator is passed in explicitly rather than reached
/// for through global state.
pub struct Core {
    dispatcher: Arc<Dispatcher>,
}

impl Core {
    /// Builds the dispatcher over the given collaborators. Does not start
    /// any subscription loop yet; call [`Core::start`] for that.
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        partials: Arc<dyn PartialStore>,
        batches: Arc<dyn BatchStore>,
        catalog: Arc<dyn JobTypeCatalog>,
        blob_store: Arc<dyn BlobStore>,
        render_generator: Arc<dyn RenderGenerator>,
    ) -> Self {
        Self { dispatcher: Arc::new(Dispatcher::new(inventory, partials, batches, catalog, blob_store, render_generator)) }
    }

    /// Subscribes to every named queue over `broker`, spawning one
    /// task per queue and registering it with a fresh [`TaskManager`].
    /// Returns once every subscription loop has been spawned; the loops
    /// themselves run until `broker` closes their channels or the returned
    /// `TaskManager` is asked to join.
    pub fn start(&self, broker: &Arc<dyn Broker>) -> TaskManager {
        let mut task_manager = TaskManager::new();
        self.dispatcher.run(broker, &mut task_manager);
        task_manager
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use model::job::{GenericJobType, JobType};
    use model::messages::RenderScanRequest;
    use store::memory::{InMemoryBatchStore, InMemoryInventoryStore, InMemoryJobTypeCatalog, InMemoryPartialStore};

    use super::*;

    #[derive(Default)]
    struct MemoryBroker {
        channels: Mutex<HashMap<&'static str, (flume::Sender<Vec<u8>>, flume::Receiver<Vec<u8>>)>>,
        published: Mutex<Vec<(&'static str, Vec<u8>)>>,
    }

    impl MemoryBroker {
        fn sender(&self, queue: &'static str) -> flume::Sender<Vec<u8>> {
            self.channels.lock().unwrap().entry(queue).or_insert_with(flume::unbounded).0.clone()
        }
    }

    #[async_trait]
    impl Broker for MemoryBroker {
        fn subscribe(&self, queue: &'static str) -> flume::Receiver<Vec<u8>> {
            self.channels.lock().unwrap().entry(queue).or_insert_with(flume::unbounded).1.clone()
        }

        async fn publish(&self, queue: &'static str, payload: Vec<u8>) {
            self.published.lock().unwrap().push((queue, payload));
        }
    }

    struct NoopBlobStore;

    #[async_trait]
    impl BlobStore for NoopBlobStore {
        async fn store_image(&self, _scan_id: &str, _image_id: &str, _bytes: &[u8]) -> Result<(), router::BlobStoreError> {
            Ok(())
        }
    }

    struct NoopRenderGenerator;

    #[async_trait]
    impl RenderGenerator for NoopRenderGenerator {
        async fn render(&self, _request: &RenderScanRequest, _items: Vec<model::Item>) -> Result<(), router::RenderError> {
            Ok(())
        }
    }

    fn box_item(uuid: model::Uuid, barcode_data: &str) -> model::Item {
        let barcode = model::Barcode {
            meta: model::BarcodeMeta { barcode_type: "GS1-128".into(), data: barcode_data.into(), aisle_index: 1 },
            absolute: model::BarcodeAbsolute {
                position: model::Vector3::new(0.0, 0.1, 0.0),
                dimension: model::Vector3::new(0.05, 0.05, 0.0),
                aligned_axis: model::Axis::X,
            },
            relative: model::BarcodeRelative {
                header: model::Header { frame_id: "parent_item".into() },
                position: model::Vector3::new(0.0, 0.1, 0.0),
                dimension: model::Vector3::new(0.05, 0.05, 0.0),
                side: model::Side::Left,
            },
            item_uuid: uuid,
        };
        model::Item {
            uuid,
            meta: model::ItemMeta {
                item_type: model::ItemType::Box,
                location: model::Location::Inventory,
                destination: None,
                available: true,
                aisle_index: 1,
                scan_id: "scan-1".into(),
                stack: Vec::new(),
            },
            absolute: model::ItemAbsolute {
                position: model::Vector3::new(0.0, 0.0, 0.0),
                dimension: model::Vector3::new(0.3, 0.3, 0.2),
                aligned_axis: model::Axis::X,
                waypoint: None,
                depth_index: None,
                stack_index: None,
            },
            relative: model::ItemRelative { dimension: model::Vector3::new(0.3, 0.3, 0.2), side: model::Side::Left },
            barcodes: vec![barcode.clone()],
            primary_barcode: Some(barcode),
        }
    }

    #[tokio::test]
    async fn start_wires_batch_request_end_to_end() {
        let inventory = Arc::new(InMemoryInventoryStore::new());
        let uuid = model::Uuid::new_v4();
        let _ = inventory.create_item(box_item(uuid, "00100897774117552794")).await;

        let catalog = Arc::new(InMemoryJobTypeCatalog::new(vec![JobType {
            job_type: "FETCH_INVENTORY".into(),
            generic_type: GenericJobType::FetchInventory,
            vendor: "RUBIC".into(),
            predetermined: false,
            item_uuid: None,
        }]));

        let core = Core::new(
            inventory,
            Arc::new(InMemoryPartialStore::new()),
            Arc::new(InMemoryBatchStore::new()),
            catalog,
            Arc::new(NoopBlobStore),
            Arc::new(NoopRenderGenerator),
        );

        let broker = Arc::new(MemoryBroker::default());
        let broker_trait: Arc<dyn Broker> = broker.clone();
        let _task_manager = core.start(&broker_trait);

        let requests: model::messages::BatchRequest = vec![model::messages::JobRequest {
            job_type: "FETCH_INVENTORY".into(),
            vendor: "RUBIC".into(),
            uid: Some("00100897774117552794".into()),
            destination_uuid: None,
        }];
        broker.sender("batch/request").send(serde_json::to_vec(&requests).unwrap()).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let published = broker.published.lock().unwrap();
        assert!(published.iter().any(|(queue, _)| *queue == "robot/batch_request"));
    }
}
