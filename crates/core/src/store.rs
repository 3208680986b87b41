//! Annotation storage arena
//!
//! Owns every annotation in a document and hands out stable
//! [`AnnotationId`] handles. Components such as the stacking-order
//! operation borrow the store; they never take ownership of annotations.

use std::collections::HashMap;

use crate::annotation::{Annotation, AnnotationId, CoordinateSpace, SpaceCoordinate};
use crate::stacking::StackingOrderChange;

/// Collection of annotations for a document
///
/// Keeps an id-keyed map plus the insertion order of ids. Insertion order
/// is the deterministic tie-break for annotations with equal stacking
/// order values.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// All annotations indexed by ID
    annotations: HashMap<AnnotationId, Annotation>,

    /// IDs in insertion order
    order: Vec<AnnotationId>,
}

impl AnnotationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            annotations: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Rebuild a store from a previously saved annotation list
    ///
    /// The list order becomes the insertion order.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        let mut store = Self::new();
        for annotation in annotations {
            store.add(annotation);
        }
        store
    }

    /// Add an annotation and return its ID
    pub fn add(&mut self, annotation: Annotation) -> AnnotationId {
        let id = annotation.id();
        if self.annotations.insert(id, annotation).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove an annotation by ID
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let removed = self.annotations.remove(&id);
        if removed.is_some() {
            self.order.retain(|&existing| existing != id);
        }
        removed
    }

    /// Get an annotation by ID
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    /// Get a mutable reference to an annotation by ID
    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.get_mut(&id)
    }

    /// Get count of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// IDs in insertion order
    pub fn ids(&self) -> &[AnnotationId] {
        &self.order
    }

    /// Iterate annotations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.order.iter().filter_map(|id| self.annotations.get(id))
    }

    /// Clone the annotations out in insertion order (for persistence)
    pub fn annotations(&self) -> Vec<Annotation> {
        self.iter().cloned().collect()
    }

    /// Annotations whose coordinate space equals `space`, insertion order
    pub fn in_space(&self, space: CoordinateSpace) -> Vec<&Annotation> {
        self.iter().filter(|a| a.space() == space).collect()
    }

    /// IDs in `space` sorted back-to-front for rendering
    ///
    /// Ascending stacking order; ties keep insertion order.
    pub fn draw_order(&self, space: CoordinateSpace) -> Vec<AnnotationId> {
        let mut ids: Vec<(AnnotationId, i32)> = self
            .iter()
            .filter(|a| a.space() == space)
            .map(|a| (a.id(), a.stacking_order()))
            .collect();
        ids.sort_by_key(|&(_, order)| order);
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// Hit test to find annotations at a point in a coordinate space
    ///
    /// Returns visible annotations hit at the point, topmost (highest
    /// stacking order) first.
    pub fn hit_test(
        &self,
        space: CoordinateSpace,
        point: &SpaceCoordinate,
        tolerance: f32,
    ) -> Vec<AnnotationId> {
        let mut hits: Vec<(AnnotationId, i32)> = self
            .iter()
            .filter(|a| a.space() == space && a.hit_test(point, tolerance))
            .map(|a| (a.id(), a.stacking_order()))
            .collect();
        hits.sort_by_key(|&(_, order)| std::cmp::Reverse(order));
        hits.into_iter().map(|(id, _)| id).collect()
    }

    /// Select one annotation and deselect every other
    pub fn select_only(&mut self, id: AnnotationId) {
        for annotation in self.annotations.values_mut() {
            annotation.set_selected(annotation.id() == id);
        }
    }

    /// Deselect all annotations
    pub fn clear_selection(&mut self) {
        for annotation in self.annotations.values_mut() {
            annotation.set_selected(false);
        }
    }

    /// IDs of selected annotations in insertion order
    pub fn selected_ids(&self) -> Vec<AnnotationId> {
        self.iter()
            .filter(|a| a.is_selected())
            .map(|a| a.id())
            .collect()
    }

    /// Apply a stacking-order changeset produced by a reordering operation
    ///
    /// Panics if a change references an annotation that is not in this
    /// store; changesets are only valid against the store they were
    /// computed from.
    pub fn apply(&mut self, changes: &[StackingOrderChange]) {
        for change in changes {
            self.annotations
                .get_mut(&change.id)
                .expect("stacking-order change must reference an annotation in this store")
                .set_stacking_order(change.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationShape, AnnotationStyle, Bounds, SpaceCoordinate};

    const TAB: CoordinateSpace = CoordinateSpace::Tab { tab_index: 0 };

    fn boxed(min_x: f32, min_y: f32, max_x: f32, max_y: f32, order: i32) -> Annotation {
        let mut annotation = Annotation::new(
            TAB,
            AnnotationShape::Box {
                top_left: SpaceCoordinate::new(min_x, max_y),
                bottom_right: SpaceCoordinate::new(max_x, min_y),
            },
            AnnotationStyle::new(),
        );
        annotation.set_stacking_order(order);
        annotation
    }

    #[test]
    fn add_get_remove() {
        let mut store = AnnotationStore::new();
        let id = store.add(boxed(0.0, 0.0, 10.0, 10.0, 1));

        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some());

        let removed = store.remove(id).expect("annotation should be removed");
        assert_eq!(removed.id(), id);
        assert!(store.is_empty());
        assert!(store.ids().is_empty());
    }

    #[test]
    fn draw_order_sorts_ascending_with_stable_ties() {
        let mut store = AnnotationStore::new();
        let high = store.add(boxed(0.0, 0.0, 10.0, 10.0, 5));
        let low = store.add(boxed(0.0, 0.0, 10.0, 10.0, 1));
        let tied_first = store.add(boxed(0.0, 0.0, 10.0, 10.0, 3));
        let tied_second = store.add(boxed(0.0, 0.0, 10.0, 10.0, 3));

        assert_eq!(
            store.draw_order(TAB),
            vec![low, tied_first, tied_second, high]
        );
    }

    #[test]
    fn draw_order_filters_by_space() {
        let mut store = AnnotationStore::new();
        let in_tab = store.add(boxed(0.0, 0.0, 10.0, 10.0, 1));
        store.add(Annotation::new(
            CoordinateSpace::Window { window_index: 2 },
            AnnotationShape::BrowserTab {
                bounds: Bounds::new(0.0, 0.0, 100.0, 100.0),
            },
            AnnotationStyle::new(),
        ));

        assert_eq!(store.draw_order(TAB), vec![in_tab]);
        assert_eq!(store.in_space(TAB).len(), 1);
        assert_eq!(
            store.in_space(CoordinateSpace::Window { window_index: 2 }).len(),
            1
        );
    }

    #[test]
    fn hit_test_returns_topmost_first() {
        let mut store = AnnotationStore::new();
        let bottom = store.add(boxed(0.0, 0.0, 30.0, 30.0, 1));
        let top = store.add(boxed(10.0, 10.0, 40.0, 40.0, 2));

        let hits = store.hit_test(TAB, &SpaceCoordinate::new(20.0, 20.0), 0.0);
        assert_eq!(hits, vec![top, bottom]);
    }

    #[test]
    fn hit_test_skips_hidden() {
        let mut store = AnnotationStore::new();
        let id = store.add(boxed(0.0, 0.0, 30.0, 30.0, 1));
        store
            .get_mut(id)
            .expect("annotation should exist")
            .set_visible(false);

        assert!(store
            .hit_test(TAB, &SpaceCoordinate::new(10.0, 10.0), 0.0)
            .is_empty());
    }

    #[test]
    fn selection_bookkeeping() {
        let mut store = AnnotationStore::new();
        let first = store.add(boxed(0.0, 0.0, 10.0, 10.0, 1));
        let second = store.add(boxed(20.0, 20.0, 30.0, 30.0, 2));

        store.select_only(second);
        assert_eq!(store.selected_ids(), vec![second]);

        store.select_only(first);
        assert_eq!(store.selected_ids(), vec![first]);

        store.clear_selection();
        assert!(store.selected_ids().is_empty());
    }

    #[test]
    fn annotations_round_trip_preserves_order() {
        let mut store = AnnotationStore::new();
        let first = store.add(boxed(0.0, 0.0, 10.0, 10.0, 2));
        let second = store.add(boxed(5.0, 5.0, 15.0, 15.0, 1));

        let rebuilt = AnnotationStore::from_annotations(store.annotations());
        assert_eq!(rebuilt.ids(), &[first, second]);
        assert_eq!(
            rebuilt
                .get(first)
                .expect("annotation should exist")
                .stacking_order(),
            2
        );
    }

    #[test]
    fn apply_writes_changeset_values() {
        let mut store = AnnotationStore::new();
        let id = store.add(boxed(0.0, 0.0, 10.0, 10.0, 7));

        store.apply(&[StackingOrderChange {
            id,
            previous: 7,
            current: 1,
        }]);
        assert_eq!(
            store
                .get(id)
                .expect("annotation should exist")
                .stacking_order(),
            1
        );
    }
}
