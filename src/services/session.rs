//! The preview session: one owner for all mutable preview state.
//!
//! Registry, selection, effect parameters, animation seed, surface and
//! scheduler live together behind a single `RwLock`. Every mutating
//! operation takes the write lock, applies its change, hands the scheduler a
//! fresh [`Dependencies`] snapshot and, when that snapshot changed, spawns a
//! render pass. The pass handle is returned so callers can await the result;
//! dropping it leaves the pass running.

use glint_fx::{Compositor, Pixmap};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use utoipa::ToSchema;

use super::image_registry::{ImageRegistry, IngestReport};
use super::render_pipeline::{PendingRender, RenderEvent, RenderPipeline};
use super::scheduler::{Dependencies, ReactiveScheduler};
use super::selection::SelectionState;
use crate::models::{AppConfig, EffectParameters, ImageId, ImageSummary, IncomingFile};
use crate::rendering::{Surface, SurfaceInfo};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Image not found: {0}")]
    UnknownImage(ImageId),
}

/// State guarded by the session lock
#[derive(Debug)]
pub struct SessionState {
    pub(crate) registry: ImageRegistry,
    pub(crate) selection: SelectionState,
    pub(crate) params: EffectParameters,
    pub(crate) seed: u64,
    pub(crate) surface: Surface,
    pub(crate) scheduler: ReactiveScheduler,
}

impl SessionState {
    fn dependencies(&self) -> Dependencies {
        Dependencies {
            selected: self.selection.selected().cloned(),
            params: self.params,
            seed: self.seed,
        }
    }
}

/// Snapshot of the session for status displays
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionStatus {
    pub images: usize,
    pub live_handles: usize,
    pub selected: Option<ImageId>,
    pub params: EffectParameters,
    pub seed: u64,
    pub surface: SurfaceInfo,
}

/// Shared handle to the preview session. Cheap to clone.
#[derive(Clone)]
pub struct PreviewSession {
    state: Arc<RwLock<SessionState>>,
    pipeline: RenderPipeline,
}

impl PreviewSession {
    pub fn new(config: &AppConfig) -> Self {
        let state = Arc::new(RwLock::new(SessionState {
            registry: ImageRegistry::new(config.registry.max_images),
            selection: SelectionState::default(),
            params: config.effects,
            seed: 0,
            surface: Surface::new(),
            scheduler: ReactiveScheduler::new(),
        }));
        let pipeline = RenderPipeline::new(
            state.clone(),
            Compositor::new(config.preview.max_width),
        );
        Self { state, pipeline }
    }

    /// Receive every render outcome from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.pipeline.subscribe()
    }

    /// Register files; the first one becomes selected if the registry was empty.
    pub async fn ingest(&self, files: Vec<IncomingFile>) -> (IngestReport, Option<PendingRender>) {
        let mut state = self.state.write().await;
        let was_empty = state.registry.is_empty();
        let report = state.registry.ingest(files);
        if was_empty {
            state.selection.adopt_first(report.added.first());
        }

        tracing::info!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            total = state.registry.len(),
            selected = ?state.selection.selected(),
            "Files ingested"
        );

        let render = self.schedule(&mut state);
        (report, render)
    }

    /// Release every image, clear the selection and shrink the surface to 0x0.
    pub async fn remove_all(&self) -> (usize, Option<PendingRender>) {
        let mut state = self.state.write().await;
        let removed = state.registry.remove_all();
        state.selection.clear();
        state.surface.reset();

        tracing::info!(removed, "All images removed");

        let render = self.schedule(&mut state);
        (removed, render)
    }

    /// Make `id` the preview target.
    pub async fn select(
        &self,
        id: &ImageId,
    ) -> Result<(ImageSummary, Option<PendingRender>), SessionError> {
        let mut state = self.state.write().await;
        let SessionState {
            registry,
            selection,
            ..
        } = &mut *state;
        if !selection.select(id, registry) {
            tracing::debug!(id = %id, "Rejected selection of unknown image");
            return Err(SessionError::UnknownImage(id.clone()));
        }
        let summary = registry
            .get(id)
            .map(|image| image.summary())
            .ok_or_else(|| SessionError::UnknownImage(id.clone()))?;

        tracing::info!(id = %id, "Image selected");
        Ok((summary, self.schedule(&mut state)))
    }

    pub async fn params(&self) -> EffectParameters {
        self.state.read().await.params
    }

    /// Modify the effect parameters in place. Setters on
    /// [`EffectParameters`] keep values in range.
    pub async fn update_params(
        &self,
        update: impl FnOnce(&mut EffectParameters),
    ) -> (EffectParameters, Option<PendingRender>) {
        let mut state = self.state.write().await;
        update(&mut state.params);
        let params = state.params;

        tracing::debug!(
            intensity = params.intensity,
            grain = params.grain,
            tint = %params.tint,
            "Effect parameters updated"
        );

        let render = self.schedule(&mut state);
        (params, render)
    }

    /// Set the animation seed directly.
    pub async fn set_seed(&self, seed: u64) -> Option<PendingRender> {
        let mut state = self.state.write().await;
        state.seed = seed;
        self.schedule(&mut state)
    }

    /// Advance the animation seed, which always schedules a render.
    pub async fn refresh(&self) -> (u64, Option<PendingRender>) {
        let mut state = self.state.write().await;
        state.seed = state.seed.wrapping_add(1);
        let seed = state.seed;

        tracing::debug!(seed, "Preview refreshed");

        let render = self.schedule(&mut state);
        (seed, render)
    }

    pub async fn images(&self) -> Vec<ImageSummary> {
        self.state.read().await.registry.list()
    }

    pub async fn selected(&self) -> Option<ImageSummary> {
        let state = self.state.read().await;
        let id = state.selection.selected()?;
        state.registry.get(id).map(|image| image.summary())
    }

    pub async fn surface_info(&self) -> SurfaceInfo {
        self.state.read().await.surface.info()
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.read().await;
        SessionStatus {
            images: state.registry.len(),
            live_handles: state.registry.live_handles(),
            selected: state.selection.selected().cloned(),
            params: state.params,
            seed: state.seed,
            surface: state.surface.info(),
        }
    }

    /// Selected image and a copy of the surface pixels, if the surface
    /// currently shows that image.
    ///
    /// While a render for a new selection is pending, or after it failed to
    /// decode, the surface still holds the previous image and this returns
    /// `None`.
    pub async fn composite_snapshot(&self) -> Option<(ImageSummary, Pixmap)> {
        let state = self.state.read().await;
        let id = state.selection.selected()?;
        if state.surface.source() != Some(id) {
            tracing::debug!(
                selected = %id,
                shown = ?state.surface.source(),
                "Surface does not show the selected image"
            );
            return None;
        }
        let image = state.registry.get(id)?.summary();
        let pixmap = state.surface.pixmap()?.clone();
        Some((image, pixmap))
    }

    /// Every registered image with its original bytes, in upload order.
    pub async fn originals(&self) -> Vec<(ImageSummary, Arc<[u8]>)> {
        let state = self.state.read().await;
        state
            .registry
            .list()
            .into_iter()
            .filter_map(|image| {
                let bytes = state.registry.bytes(&image.id)?;
                Some((image, bytes))
            })
            .collect()
    }

    /// Selected image with its original bytes.
    pub async fn original(&self) -> Option<(ImageSummary, Arc<[u8]>)> {
        let state = self.state.read().await;
        let id = state.selection.selected()?;
        let image = state.registry.get(id)?.summary();
        let bytes = state.registry.bytes(id)?;
        Some((image, bytes))
    }

    /// PNG of the surface as it is, encoded off the async runtime.
    pub async fn surface_png(&self) -> Option<Vec<u8>> {
        let pixmap = self.state.read().await.surface.pixmap()?.clone();
        match tokio::task::spawn_blocking(move || glint_fx::encode_png(&pixmap)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to encode preview");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Preview encode task failed");
                None
            }
        }
    }

    /// Release every byte handle before the process exits.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        let released = state.registry.remove_all();
        state.selection.clear();
        state.surface.reset();
        tracing::info!(released, "Preview session shut down");
    }

    fn schedule(&self, state: &mut SessionState) -> Option<PendingRender> {
        let generation = state.scheduler.observe(state.dependencies())?;
        Some(self.pipeline.spawn(generation))
    }
}
