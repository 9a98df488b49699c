//! Asynchronous render passes over the session state.
//!
//! A pass is spawned per scheduler generation and runs in three steps:
//!
//! 1. Under the read lock, resolve the selected image's bytes
//! 2. Decode on the blocking pool (the only suspension point besides locking)
//! 3. Re-check the generation, snapshot parameters and seed, compose on the
//!    blocking pool, then commit under the write lock if still current
//!
//! A pass whose generation has been superseded at any check ends as
//! [`RenderEvent::Discarded`] and never touches the surface.

use glint_fx::{Compositor, FxError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use super::session::SessionState;
use crate::models::ImageId;

/// Outcome of one render pass, also broadcast to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderEvent {
    /// New pixels are on the surface
    Committed {
        generation: u64,
        image_id: ImageId,
        width: u32,
        height: u32,
    },
    /// A newer generation took over before this pass could commit
    Discarded { generation: u64 },
    /// The selected image could not be decoded; surface untouched
    DecodeFailed {
        generation: u64,
        image_id: ImageId,
        error: String,
    },
    /// Nothing selected; surface untouched
    NoSelection { generation: u64 },
    /// The surface pixmap could not be allocated; surface untouched
    SurfaceUnavailable { generation: u64, error: String },
}

impl RenderEvent {
    pub fn generation(&self) -> u64 {
        match self {
            RenderEvent::Committed { generation, .. }
            | RenderEvent::Discarded { generation }
            | RenderEvent::DecodeFailed { generation, .. }
            | RenderEvent::NoSelection { generation }
            | RenderEvent::SurfaceUnavailable { generation, .. } => *generation,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, RenderEvent::Committed { .. })
    }
}

/// Handle to a spawned render pass.
///
/// Dropping it detaches the pass; it still runs to completion.
#[derive(Debug)]
pub struct PendingRender {
    generation: u64,
    handle: JoinHandle<RenderEvent>,
}

impl PendingRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the pass to finish.
    pub async fn wait(self) -> RenderEvent {
        match self.handle.await {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(generation = self.generation, error = %e, "Render task failed");
                RenderEvent::Discarded {
                    generation: self.generation,
                }
            }
        }
    }
}

/// Spawns render passes against shared session state
#[derive(Clone)]
pub struct RenderPipeline {
    state: Arc<RwLock<SessionState>>,
    compositor: Compositor,
    events: broadcast::Sender<RenderEvent>,
}

impl RenderPipeline {
    pub(crate) fn new(state: Arc<RwLock<SessionState>>, compositor: Compositor) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state,
            compositor,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.events.subscribe()
    }

    /// Start a pass for `generation` on the runtime.
    pub fn spawn(&self, generation: u64) -> PendingRender {
        let pipeline = self.clone();
        let handle = tokio::spawn(async move {
            let event = pipeline.run(generation).await;
            pipeline.publish(&event);
            event
        });
        PendingRender { generation, handle }
    }

    async fn run(&self, generation: u64) -> RenderEvent {
        let (image_id, bytes) = {
            let state = self.state.read().await;
            if !state.scheduler.is_current(generation) {
                return RenderEvent::Discarded { generation };
            }
            let Some(id) = state.selection.selected().cloned() else {
                return RenderEvent::NoSelection { generation };
            };
            match state.registry.bytes(&id) {
                Some(bytes) => (id, bytes),
                None => return RenderEvent::NoSelection { generation },
            }
        };

        let decoded = match tokio::task::spawn_blocking(move || glint_fx::decode(&bytes)).await {
            Ok(Ok(image)) => image,
            Ok(Err(e)) => {
                return RenderEvent::DecodeFailed {
                    generation,
                    image_id,
                    error: e.to_string(),
                }
            }
            Err(e) => {
                return RenderEvent::DecodeFailed {
                    generation,
                    image_id,
                    error: format!("Decode task failed: {e}"),
                }
            }
        };

        // Parameters are read when the decode completes, not when the pass started
        let params = {
            let state = self.state.read().await;
            if !state.scheduler.is_current(generation) {
                return RenderEvent::Discarded { generation };
            }
            state.params.to_fx(state.seed)
        };

        let compositor = self.compositor;
        let composed =
            tokio::task::spawn_blocking(move || compositor.compose(&decoded, &params)).await;
        let pixmap = match composed {
            Ok(Ok(pixmap)) => pixmap,
            Ok(Err(e @ FxError::EmptyImage { .. })) => {
                return RenderEvent::DecodeFailed {
                    generation,
                    image_id,
                    error: e.to_string(),
                }
            }
            Ok(Err(e)) => {
                return RenderEvent::SurfaceUnavailable {
                    generation,
                    error: e.to_string(),
                }
            }
            Err(e) => {
                return RenderEvent::SurfaceUnavailable {
                    generation,
                    error: format!("Compose task failed: {e}"),
                }
            }
        };

        let mut state = self.state.write().await;
        if !state.scheduler.is_current(generation) {
            return RenderEvent::Discarded { generation };
        }
        let (width, height) = (pixmap.width(), pixmap.height());
        state.surface.commit(pixmap, image_id.clone(), generation);

        RenderEvent::Committed {
            generation,
            image_id,
            width,
            height,
        }
    }

    fn publish(&self, event: &RenderEvent) {
        match event {
            RenderEvent::Committed {
                generation,
                image_id,
                width,
                height,
            } => tracing::debug!(
                generation,
                image_id = %image_id,
                width,
                height,
                "Render committed"
            ),
            RenderEvent::Discarded { generation } => {
                tracing::debug!(generation, "Stale render discarded")
            }
            RenderEvent::DecodeFailed {
                generation,
                image_id,
                error,
            } => tracing::warn!(generation, image_id = %image_id, %error, "Image decode failed"),
            RenderEvent::NoSelection { generation } => {
                tracing::debug!(generation, "Nothing selected, render skipped")
            }
            RenderEvent::SurfaceUnavailable { generation, error } => {
                tracing::warn!(generation, %error, "Drawing surface unavailable")
            }
        }

        // No subscribers is fine
        let _ = self.events.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_generation() {
        let event = RenderEvent::DecodeFailed {
            generation: 7,
            image_id: ImageId::new("0123456789AB"),
            error: "bad".into(),
        };
        assert_eq!(event.generation(), 7);
        assert!(!event.is_committed());
    }

    #[test]
    fn test_event_serializes_with_status_tag() {
        let event = RenderEvent::Committed {
            generation: 2,
            image_id: ImageId::new("0123456789AB"),
            width: 1024,
            height: 512,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "committed");
        assert_eq!(json["image_id"], "0123456789AB");
        assert_eq!(json["width"], 1024);

        let json = serde_json::to_value(RenderEvent::Discarded { generation: 1 }).unwrap();
        assert_eq!(json["status"], "discarded");
    }
}
