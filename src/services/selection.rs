use super::image_registry::ImageRegistry;
use crate::models::ImageId;

/// Which registered image, if any, is the preview target.
///
/// Only changes through [`SelectionState::select`] (checked against the
/// registry), [`SelectionState::adopt_first`] and [`SelectionState::clear`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<ImageId>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&ImageId> {
        self.selected.as_ref()
    }

    /// Select `id` if the registry knows it. Returns false and leaves the
    /// selection unchanged otherwise.
    pub fn select(&mut self, id: &ImageId, registry: &ImageRegistry) -> bool {
        if !registry.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Take `first` when nothing is selected yet.
    pub fn adopt_first(&mut self, first: Option<&ImageId>) {
        if self.selected.is_none() {
            self.selected = first.cloned();
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IncomingFile;

    fn registry_with(names: &[&str]) -> (ImageRegistry, Vec<ImageId>) {
        let mut registry = ImageRegistry::new(None);
        let files = names
            .iter()
            .map(|name| IncomingFile::new(*name, "image/png", vec![0]))
            .collect();
        let report = registry.ingest(files);
        (registry, report.added)
    }

    #[test]
    fn test_select_known_image() {
        let (registry, ids) = registry_with(&["a.png", "b.png"]);
        let mut selection = SelectionState::default();

        assert!(selection.select(&ids[1], &registry));
        assert_eq!(selection.selected(), Some(&ids[1]));
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let (registry, ids) = registry_with(&["a.png"]);
        let mut selection = SelectionState::default();
        selection.select(&ids[0], &registry);

        assert!(!selection.select(&ImageId::new("FFFFFFFFFFFF"), &registry));
        assert_eq!(selection.selected(), Some(&ids[0]));
    }

    #[test]
    fn test_adopt_first_only_when_empty() {
        let (_registry, ids) = registry_with(&["a.png", "b.png"]);
        let mut selection = SelectionState::default();

        selection.adopt_first(ids.first());
        selection.adopt_first(ids.get(1));
        assert_eq!(selection.selected(), Some(&ids[0]));

        selection.clear();
        assert!(selection.selected().is_none());
    }
}
