#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! The router/dispatcher: subscribes to the client- and
//! robot-facing queues, validates each message against its wire schema,
//! invokes the compiler/planner/response handler it belongs to, and
//! publishes the result. Unlike the generic receiver/processor/exporter
//! pipeline this workspace started from, the set of queues is closed and
//! known at compile time, so dispatch is a tagged match rather than a
//! dynamically configured pipeline.

pub mod batch;
pub mod collaborators;
pub mod compile;
mod dispatcher;
pub mod ingest;
pub mod render;
pub mod scan;

pub use collaborators::{BlobStore, BlobStoreError, RenderError, RenderGenerator};
pub use dispatcher::{Broker, Dispatcher};

/// All the errors a router handler can fail with. A `Store`/`Planner`/
/// `Response` failure is whatever the handler it wraps produced; the
/// remaining variants are the router's own.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A queue body failed to parse or decode.
    #[error("malformed message on {queue}: {reason}")]
    MalformedMessage {
        /// Queue the offending message was received on.
        queue: &'static str,
        /// Why the message was rejected.
        reason: String,
    },

    /// An inventory store lookup or mutation failed.
    #[error(transparent)]
    Store(#[from] store::Error),

    /// Batch planning failed.
    #[error(transparent)]
    Planner(#[from] planner::Error),

    /// Response reconciliation failed.
    #[error(transparent)]
    Response(#[from] response::Error),

    /// The blob-store collaborator failed.
    #[error(transparent)]
    Blob(#[from] collaborators::BlobStoreError),

    /// The render-generator collaborator failed.
    #[error(transparent)]
    Render(#[from] collaborators::RenderError),
}
