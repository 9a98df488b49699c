use glint_fx::Pixmap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ImageId;

/// The drawing surface: empty (0x0) or the last committed composite.
#[derive(Debug, Default)]
pub struct Surface {
    pixmap: Option<Pixmap>,
    source: Option<ImageId>,
    generation: u64,
}

/// Public view of the surface state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
    /// Image drawn on the surface, if any
    pub image_id: Option<ImageId>,
    /// Render generation that produced the current pixels
    pub generation: u64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn source(&self) -> Option<&ImageId> {
        self.source.as_ref()
    }

    /// Replace the pixels with a finished composite.
    pub fn commit(&mut self, pixmap: Pixmap, source: ImageId, generation: u64) {
        self.pixmap = Some(pixmap);
        self.source = Some(source);
        self.generation = generation;
    }

    /// Shrink back to 0x0.
    pub fn reset(&mut self) {
        self.pixmap = None;
        self.source = None;
    }

    pub fn info(&self) -> SurfaceInfo {
        let (width, height) = self.dimensions();
        SurfaceInfo {
            width,
            height,
            image_id: self.source.clone(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_empty() {
        let surface = Surface::new();
        assert!(surface.pixmap().is_none());
        assert_eq!(surface.dimensions(), (0, 0));
    }

    #[test]
    fn test_commit_and_reset() {
        let mut surface = Surface::new();
        let pixmap = Pixmap::new(8, 4).unwrap();
        surface.commit(pixmap, ImageId::new("0123456789AB"), 3);

        let info = surface.info();
        assert_eq!((info.width, info.height), (8, 4));
        assert_eq!(info.generation, 3);
        assert_eq!(info.image_id, Some(ImageId::new("0123456789AB")));
        assert_eq!(surface.source(), Some(&ImageId::new("0123456789AB")));

        surface.reset();
        assert_eq!(surface.dimensions(), (0, 0));
        assert!(surface.source().is_none());
    }
}
