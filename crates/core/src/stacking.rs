//! Stacking-order reordering
//!
//! Recomputes the integer stacking order of a set of annotations confined
//! to one coordinate space so that a selected annotation moves forward,
//! backward, to the front, or to the back relative to the annotations it
//! spatially intersects. Annotations that do not overlap the selected one
//! are never used as move targets.
//!
//! The operation is a pure in-memory computation over a borrowed
//! [`AnnotationStore`]. It produces a changeset of new order values;
//! [`StackingOrderOperation::run`] also writes them back. Failures are
//! atomic; no annotation is touched unless the whole set reorders.

use std::collections::BTreeSet;

use crate::annotation::{Annotation, AnnotationId, AnnotationKind, CoordinateSpace};
use crate::store::AnnotationStore;

const HANDLE_MSG: &str = "annotation handle must resolve in the store";

/// Requested relative movement for the selected annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingOrder {
    /// Place the selected annotation in front of every annotation in the set
    BringToFront,

    /// Move the selected annotation in front of the nearest intersecting
    /// annotation above it
    BringForward,

    /// Place the selected annotation behind every annotation in the set
    SendToBack,

    /// Move the selected annotation behind the nearest intersecting
    /// annotation below it
    SendBackward,
}

/// One annotation's stacking order before and after a reordering
///
/// A successful reordering yields one entry per annotation in the set,
/// including annotations whose value only changed through the final dense
/// renumbering. Callers decide how to propagate change notifications and
/// may use `previous` to build an undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackingOrderChange {
    /// The annotation the change applies to
    pub id: AnnotationId,

    /// Stacking order before the operation
    pub previous: i32,

    /// Stacking order assigned by the operation
    pub current: i32,
}

/// Why a set of annotations cannot be reordered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("no annotations for reordering")]
    Empty,

    #[error("selected annotation is not among the annotations being reordered")]
    SelectionNotInSet,

    #[error("annotations span multiple coordinate spaces: {labels}")]
    MixedSpaces { labels: String },

    /// Chart, spacer, and viewport space have no manual draw order
    #[error("annotations in {0} space cannot be reordered")]
    UnorderableSpace(CoordinateSpace),

    #[error("stereotaxic annotation order is implied by 3-D coordinates and cannot be changed")]
    StereotaxicOrderImplied,

    #[error("surface annotation order is implied by vertex coordinates and cannot be changed")]
    SurfaceOrderImplied,

    #[error("all tab annotations must be in the same tab")]
    TabMismatch,

    #[error("all window annotations must be in the same window")]
    WindowMismatch,
}

/// Result alias for reordering operations
pub type ReorderResult<T> = Result<T, ReorderError>;

/// Snapshot of one annotation while the new order is being computed
#[derive(Debug, Clone, Copy)]
struct OrderEntry {
    id: AnnotationId,
    original: i32,
    order: i32,
    intersects_selected: bool,
}

/// Recomputes stacking-order values for a set of annotations
///
/// Constructed from the handles of the annotations being reordered and the
/// selected annotation driving the move. The operation never owns
/// annotations; `run` and `preview` borrow the store per call. A handle
/// that does not resolve in the store is a caller bug and panics.
#[derive(Debug, Clone)]
pub struct StackingOrderOperation {
    /// Handles of the annotations being reordered, back-to-front ties
    /// resolved by this order
    targets: Vec<AnnotationId>,

    /// The annotation the directive applies to
    selected: AnnotationId,
}

impl StackingOrderOperation {
    /// Create an operation over `targets` with `selected` as the
    /// annotation to move
    pub fn new(targets: Vec<AnnotationId>, selected: AnnotationId) -> Self {
        Self { targets, selected }
    }

    /// Compute and apply the new stacking order
    ///
    /// On success every annotation in the set is assigned a dense 1-based
    /// value and the full changeset is returned. On error the store is
    /// untouched.
    pub fn run(
        &self,
        store: &mut AnnotationStore,
        order: StackingOrder,
    ) -> ReorderResult<Vec<StackingOrderChange>> {
        let changes = self.preview(store, order)?;
        store.apply(&changes);
        Ok(changes)
    }

    /// Compute the changeset without mutating the store
    pub fn preview(
        &self,
        store: &AnnotationStore,
        order: StackingOrder,
    ) -> ReorderResult<Vec<StackingOrderChange>> {
        // Nothing to reorder.
        if self.targets.len() <= 1 {
            return Ok(Vec::new());
        }
        if !self.targets.contains(&self.selected) {
            return Err(ReorderError::SelectionNotInSet);
        }
        validate_compatibility(store, &self.targets)?;

        let selected = store.get(self.selected).expect(HANDLE_MSG);
        let mut entries: Vec<OrderEntry> = self
            .targets
            .iter()
            .map(|&id| {
                let annotation = store.get(id).expect(HANDLE_MSG);
                OrderEntry {
                    id,
                    original: annotation.stacking_order(),
                    order: annotation.stacking_order(),
                    intersects_selected: id != self.selected && selected.intersects(annotation),
                }
            })
            .collect();

        // Stable: equal values keep the handle order passed in.
        entries.sort_by_key(|entry| entry.order);

        // Renumber with even values so the selected annotation can slot
        // between two neighbors with a plus or minus one.
        for (rank, entry) in entries.iter_mut().enumerate() {
            entry.order = rank as i32 * 2;
        }

        let selected_index = entries
            .iter()
            .position(|entry| entry.id == self.selected)
            .expect(HANDLE_MSG);

        // Nearest intersecting annotation on either side of the selected
        // one; annotations that do not overlap it are skipped.
        let in_front = entries[selected_index + 1..]
            .iter()
            .find(|entry| entry.intersects_selected)
            .map(|entry| entry.order);
        let behind = entries[..selected_index]
            .iter()
            .rev()
            .find(|entry| entry.intersects_selected)
            .map(|entry| entry.order);

        match order {
            StackingOrder::BringForward => {
                if let Some(neighbor) = in_front {
                    entries[selected_index].order = neighbor + 1;
                }
            }
            StackingOrder::BringToFront => {
                let front = entries
                    .last()
                    .expect("set has at least two annotations")
                    .order;
                entries[selected_index].order = front + 1;
            }
            StackingOrder::SendBackward => {
                if let Some(neighbor) = behind {
                    entries[selected_index].order = neighbor - 1;
                }
            }
            StackingOrder::SendToBack => {
                let back = entries
                    .first()
                    .expect("set has at least two annotations")
                    .order;
                entries[selected_index].order = back - 1;
            }
        }

        entries.sort_by_key(|entry| entry.order);

        Ok(entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| StackingOrderChange {
                id: entry.id,
                previous: entry.original,
                current: rank as i32 + 1,
            })
            .collect())
    }
}

/// Check that a set of annotations can be reordered together
///
/// All annotations must share one orderable coordinate space (the same tab
/// or the same window). Sets consisting entirely of browser-tab
/// annotations are always compatible.
pub fn validate_compatibility(
    store: &AnnotationStore,
    ids: &[AnnotationId],
) -> ReorderResult<()> {
    if ids.is_empty() {
        return Err(ReorderError::Empty);
    }

    let annotations: Vec<&Annotation> = ids
        .iter()
        .map(|&id| store.get(id).expect(HANDLE_MSG))
        .collect();

    // Browser tabs order among themselves regardless of space.
    if annotations
        .iter()
        .all(|a| a.kind() == AnnotationKind::BrowserTab)
    {
        return Ok(());
    }

    let labels: BTreeSet<&'static str> = annotations.iter().map(|a| a.space().label()).collect();
    if labels.len() > 1 {
        return Err(ReorderError::MixedSpaces {
            labels: labels.into_iter().collect::<Vec<_>>().join(", "),
        });
    }

    let space = annotations[0].space();
    match space {
        CoordinateSpace::Chart | CoordinateSpace::Spacer | CoordinateSpace::Viewport => {
            Err(ReorderError::UnorderableSpace(space))
        }
        CoordinateSpace::Stereotaxic => Err(ReorderError::StereotaxicOrderImplied),
        CoordinateSpace::Surface => Err(ReorderError::SurfaceOrderImplied),
        CoordinateSpace::Tab { .. } => {
            if annotations.iter().all(|a| a.space() == space) {
                Ok(())
            } else {
                Err(ReorderError::TabMismatch)
            }
        }
        CoordinateSpace::Window { .. } => {
            if annotations.iter().all(|a| a.space() == space) {
                Ok(())
            } else {
                Err(ReorderError::WindowMismatch)
            }
        }
    }
}
