//! Scenemark Core Library
//!
//! Annotation data model, storage arena, and stacking-order operations
//! for the scene viewer.

pub mod annotation;
pub mod csv_export;
pub mod stacking;
pub mod store;

pub use annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationShape, AnnotationStyle, Bounds, Color,
    CoordinateSpace, SpaceCoordinate,
};
pub use csv_export::{export_annotations, export_annotations_to_string, CsvExportConfig, CsvExportError};
pub use stacking::{
    validate_compatibility, ReorderError, ReorderResult, StackingOrder, StackingOrderChange,
    StackingOrderOperation,
};
pub use store::AnnotationStore;
