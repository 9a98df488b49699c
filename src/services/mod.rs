pub mod batch;
pub mod blob_store;
pub mod export;
pub mod image_registry;
pub mod quantizer;
pub mod render_pipeline;
pub mod scheduler;
pub mod selection;
pub mod session;

pub use batch::{BatchEntry, BatchManifest, BundleError, EntryStatus};
pub use blob_store::{BlobStore, ByteHandle};
pub use export::{Download, ExportService};
pub use image_registry::{ImageRegistry, IngestReport, UploadedImage};
pub use quantizer::{ExternalQuantizer, PaletteQuantizer, QuantizeError, QuantizedOutput};
pub use render_pipeline::{PendingRender, RenderEvent, RenderPipeline};
pub use scheduler::{Dependencies, ReactiveScheduler};
pub use selection::SelectionState;
pub use session::{PreviewSession, SessionError, SessionState, SessionStatus};
