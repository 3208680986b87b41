//! Annotation engine data model
//!
//! Annotations are 2-D marks placed in one of the viewer's coordinate
//! spaces. Tab- and window-space positions are percentages (0-100) of the
//! owning viewport; data spaces use their native units. Each annotation
//! carries an integer stacking order that decides back-to-front precedence.

use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation
///
/// Stable across the annotation's lifetime, persists in saved files.
/// Generated using UUID v4 for guaranteed uniqueness.
pub type AnnotationId = uuid::Uuid;

/// Position within a coordinate space
///
/// For tab and window space:
/// - Origin (0, 0) at bottom-left of the viewport
/// - X increases to the right, Y increases upward
/// - Units are percentages of viewport width/height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceCoordinate {
    pub x: f32,
    pub y: f32,
}

impl SpaceCoordinate {
    /// Create a new coordinate
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another coordinate
    pub fn distance_to(&self, other: &SpaceCoordinate) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box in a single coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Create bounds from explicit extents
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create bounds from two corners in any order
    pub fn from_corners(a: SpaceCoordinate, b: SpaceCoordinate) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Check whether two bounds overlap in X and Y
    ///
    /// Touching edges count as an intersection.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Check whether a point lies inside the bounds, expanded by a tolerance
    pub fn contains(&self, point: &SpaceCoordinate, tolerance: f32) -> bool {
        point.x >= self.min_x - tolerance
            && point.x <= self.max_x + tolerance
            && point.y >= self.min_y - tolerance
            && point.y <= self.max_y + tolerance
    }
}

/// Coordinate space an annotation's position is expressed in
///
/// Tab and window membership ride in the variant payload so an annotation
/// cannot claim one space while carrying another space's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// Chart axes of a plotted view
    Chart,

    /// Spacer region between tab viewports
    Spacer,

    /// 3-D stereotaxic (model) coordinates
    Stereotaxic,

    /// Surface vertex coordinates
    Surface,

    /// Viewport of one browser tab
    Tab { tab_index: u16 },

    /// Raw drawing viewport
    Viewport,

    /// Viewport of one window
    Window { window_index: u16 },
}

impl CoordinateSpace {
    /// Lowercase space name used in error messages and exports
    pub fn label(&self) -> &'static str {
        match self {
            CoordinateSpace::Chart => "chart",
            CoordinateSpace::Spacer => "spacer",
            CoordinateSpace::Stereotaxic => "stereotaxic",
            CoordinateSpace::Surface => "surface",
            CoordinateSpace::Tab { .. } => "tab",
            CoordinateSpace::Viewport => "viewport",
            CoordinateSpace::Window { .. } => "window",
        }
    }
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    Box,
    /// A UI tab region itself, exempt from space-compatibility rules
    /// during reordering
    BrowserTab,
    Image,
    Line,
    Oval,
    Text,
}

impl AnnotationKind {
    /// Lowercase kind name used in exports
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationKind::Box => "box",
            AnnotationKind::BrowserTab => "browser-tab",
            AnnotationKind::Image => "image",
            AnnotationKind::Line => "line",
            AnnotationKind::Oval => "oval",
            AnnotationKind::Text => "text",
        }
    }
}

/// Annotation geometry
///
/// Geometry determines the annotation kind and its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationShape {
    /// Line segment from start to end point
    Line {
        start: SpaceCoordinate,
        end: SpaceCoordinate,
    },

    /// Box defined by two corners
    Box {
        top_left: SpaceCoordinate,
        bottom_right: SpaceCoordinate,
    },

    /// Oval defined by center and radii
    Oval {
        center: SpaceCoordinate,
        radius_x: f32,
        radius_y: f32,
    },

    /// Text block anchored at a position with an estimated extent
    Text {
        position: SpaceCoordinate,
        width: f32,
        height: f32,
    },

    /// Image placed between two corners
    Image {
        top_left: SpaceCoordinate,
        bottom_right: SpaceCoordinate,
    },

    /// The region occupied by a browser tab itself
    BrowserTab { bounds: Bounds },
}

impl AnnotationShape {
    /// The annotation kind this geometry renders as
    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationShape::Line { .. } => AnnotationKind::Line,
            AnnotationShape::Box { .. } => AnnotationKind::Box,
            AnnotationShape::Oval { .. } => AnnotationKind::Oval,
            AnnotationShape::Text { .. } => AnnotationKind::Text,
            AnnotationShape::Image { .. } => AnnotationKind::Image,
            AnnotationShape::BrowserTab { .. } => AnnotationKind::BrowserTab,
        }
    }

    /// Get the bounding box for this geometry
    pub fn bounding_box(&self) -> Bounds {
        match self {
            AnnotationShape::Line { start, end } => Bounds::from_corners(*start, *end),
            AnnotationShape::Box {
                top_left,
                bottom_right,
            }
            | AnnotationShape::Image {
                top_left,
                bottom_right,
            } => Bounds::from_corners(*top_left, *bottom_right),
            AnnotationShape::Oval {
                center,
                radius_x,
                radius_y,
            } => Bounds::new(
                center.x - radius_x,
                center.y - radius_y,
                center.x + radius_x,
                center.y + radius_y,
            ),
            AnnotationShape::Text {
                position,
                width,
                height,
            } => Bounds::new(
                position.x,
                position.y,
                position.x + width,
                position.y + height,
            ),
            AnnotationShape::BrowserTab { bounds } => *bounds,
        }
    }

    /// Check if a point is near this geometry (within tolerance)
    ///
    /// Used for hit testing during selection.
    pub fn contains_point(&self, point: &SpaceCoordinate, tolerance: f32) -> bool {
        match self {
            AnnotationShape::Line { start, end } => {
                point_near_line_segment(point, start, end, tolerance)
            }
            AnnotationShape::Oval {
                center,
                radius_x,
                radius_y,
            } => {
                let dx = (point.x - center.x) / radius_x.max(f32::EPSILON);
                let dy = (point.y - center.y) / radius_y.max(f32::EPSILON);
                let dist = (dx * dx + dy * dy).sqrt();
                (dist - 1.0) * radius_x.max(*radius_y) <= tolerance
            }
            AnnotationShape::Box { .. }
            | AnnotationShape::Image { .. }
            | AnnotationShape::Text { .. }
            | AnnotationShape::BrowserTab { .. } => self.bounding_box().contains(point, tolerance),
        }
    }
}

/// Helper function for point-to-line-segment distance check
fn point_near_line_segment(
    point: &SpaceCoordinate,
    start: &SpaceCoordinate,
    end: &SpaceCoordinate,
    tolerance: f32,
) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-6 {
        // Degenerate line segment
        return point.distance_to(start) <= tolerance;
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = SpaceCoordinate::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&closest) <= tolerance
}

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Common annotation colors
impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
}

/// Visual styling for annotation rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Stroke color for lines and outlines
    pub stroke_color: Color,

    /// Stroke width in viewport percent
    pub stroke_width: f32,

    /// Fill color for closed shapes (None for no fill)
    pub fill_color: Option<Color>,

    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,
}

impl AnnotationStyle {
    /// Create default style (black stroke, no fill)
    pub fn new() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_width: 0.5,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::new()
    }
}

/// A 2-D annotation in one coordinate space
///
/// Annotations are owned by an [`crate::store::AnnotationStore`]; other
/// components refer to them through their [`AnnotationId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable unique identifier
    id: AnnotationId,

    /// Coordinate space the shape's positions are expressed in
    space: CoordinateSpace,

    /// Geometry
    shape: AnnotationShape,

    /// Visual style
    style: AnnotationStyle,

    /// Back-to-front draw precedence (higher = in front)
    stacking_order: i32,

    /// Whether this annotation is currently selected
    selected: bool,

    /// Whether this annotation is visible
    visible: bool,
}

impl Annotation {
    /// Create a new annotation with a generated ID
    pub fn new(space: CoordinateSpace, shape: AnnotationShape, style: AnnotationStyle) -> Self {
        Self {
            id: AnnotationId::new_v4(),
            space,
            shape,
            style,
            stacking_order: 0,
            selected: false,
            visible: true,
        }
    }

    /// Create an annotation with a specific ID (for deserialization)
    pub fn with_id(
        id: AnnotationId,
        space: CoordinateSpace,
        shape: AnnotationShape,
        style: AnnotationStyle,
    ) -> Self {
        Self {
            id,
            space,
            shape,
            style,
            stacking_order: 0,
            selected: false,
            visible: true,
        }
    }

    /// Get the annotation ID
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Get the coordinate space
    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    /// Get the annotation kind
    pub fn kind(&self) -> AnnotationKind {
        self.shape.kind()
    }

    /// Get the geometry
    pub fn shape(&self) -> &AnnotationShape {
        &self.shape
    }

    /// Get the style
    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Tab index, if this annotation lives in tab space
    pub fn tab_index(&self) -> Option<u16> {
        match self.space {
            CoordinateSpace::Tab { tab_index } => Some(tab_index),
            _ => None,
        }
    }

    /// Window index, if this annotation lives in window space
    pub fn window_index(&self) -> Option<u16> {
        match self.space {
            CoordinateSpace::Window { window_index } => Some(window_index),
            _ => None,
        }
    }

    /// Get the stacking order
    pub fn stacking_order(&self) -> i32 {
        self.stacking_order
    }

    /// Set the stacking order
    pub fn set_stacking_order(&mut self, order: i32) {
        self.stacking_order = order;
    }

    /// Check if annotation is selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set selection state
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Check if annotation is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Get the bounding box in this annotation's coordinate space
    pub fn bounds(&self) -> Bounds {
        self.shape.bounding_box()
    }

    /// Check whether this annotation's bounds overlap another's
    ///
    /// Annotations in different coordinate spaces (including different tab
    /// or window indices) never intersect.
    pub fn intersects(&self, other: &Annotation) -> bool {
        if self.space != other.space {
            return false;
        }
        self.bounds().intersects(&other.bounds())
    }

    /// Check if a point hits this annotation (for selection)
    pub fn hit_test(&self, point: &SpaceCoordinate, tolerance: f32) -> bool {
        if !self.visible {
            return false;
        }
        self.shape.contains_point(point, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_shape(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> AnnotationShape {
        AnnotationShape::Box {
            top_left: SpaceCoordinate::new(min_x, max_y),
            bottom_right: SpaceCoordinate::new(max_x, min_y),
        }
    }

    #[test]
    fn coordinate_distance() {
        let p1 = SpaceCoordinate::new(0.0, 0.0);
        let p2 = SpaceCoordinate::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn bounds_from_corners_normalizes() {
        let bounds = Bounds::from_corners(
            SpaceCoordinate::new(50.0, 10.0),
            SpaceCoordinate::new(20.0, 40.0),
        );
        assert_eq!(bounds, Bounds::new(20.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn bounds_intersection() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
        let c = Bounds::new(20.0, 20.0, 30.0, 30.0);
        let touching = Bounds::new(10.0, 0.0, 20.0, 10.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&touching));
    }

    #[test]
    fn oval_bounding_box() {
        let shape = AnnotationShape::Oval {
            center: SpaceCoordinate::new(50.0, 50.0),
            radius_x: 10.0,
            radius_y: 5.0,
        };
        assert_eq!(shape.bounding_box(), Bounds::new(40.0, 45.0, 60.0, 55.0));
    }

    #[test]
    fn shape_kinds() {
        let line = AnnotationShape::Line {
            start: SpaceCoordinate::new(0.0, 0.0),
            end: SpaceCoordinate::new(1.0, 1.0),
        };
        let tab = AnnotationShape::BrowserTab {
            bounds: Bounds::new(0.0, 0.0, 100.0, 100.0),
        };
        assert_eq!(line.kind(), AnnotationKind::Line);
        assert_eq!(tab.kind(), AnnotationKind::BrowserTab);
        assert_eq!(box_shape(0.0, 0.0, 1.0, 1.0).kind(), AnnotationKind::Box);
    }

    #[test]
    fn intersects_requires_same_space() {
        let shape = box_shape(10.0, 10.0, 30.0, 30.0);
        let in_tab_one = Annotation::new(
            CoordinateSpace::Tab { tab_index: 1 },
            shape.clone(),
            AnnotationStyle::new(),
        );
        let also_tab_one = Annotation::new(
            CoordinateSpace::Tab { tab_index: 1 },
            box_shape(20.0, 20.0, 40.0, 40.0),
            AnnotationStyle::new(),
        );
        let in_tab_two = Annotation::new(
            CoordinateSpace::Tab { tab_index: 2 },
            shape.clone(),
            AnnotationStyle::new(),
        );
        let in_window = Annotation::new(
            CoordinateSpace::Window { window_index: 0 },
            shape,
            AnnotationStyle::new(),
        );

        assert!(in_tab_one.intersects(&also_tab_one));
        assert!(!in_tab_one.intersects(&in_tab_two));
        assert!(!in_tab_one.intersects(&in_window));
    }

    #[test]
    fn hit_test_ignores_hidden_annotations() {
        let mut annotation = Annotation::new(
            CoordinateSpace::Tab { tab_index: 0 },
            box_shape(10.0, 10.0, 30.0, 30.0),
            AnnotationStyle::new(),
        );
        let inside = SpaceCoordinate::new(20.0, 20.0);

        assert!(annotation.hit_test(&inside, 0.0));
        annotation.set_visible(false);
        assert!(!annotation.hit_test(&inside, 0.0));
    }

    #[test]
    fn line_hit_test_uses_segment_distance() {
        let annotation = Annotation::new(
            CoordinateSpace::Viewport,
            AnnotationShape::Line {
                start: SpaceCoordinate::new(0.0, 0.0),
                end: SpaceCoordinate::new(100.0, 0.0),
            },
            AnnotationStyle::new(),
        );

        assert!(annotation.hit_test(&SpaceCoordinate::new(50.0, 2.0), 3.0));
        assert!(!annotation.hit_test(&SpaceCoordinate::new(50.0, 10.0), 3.0));
    }

    #[test]
    fn space_labels() {
        assert_eq!(CoordinateSpace::Tab { tab_index: 3 }.label(), "tab");
        assert_eq!(CoordinateSpace::Stereotaxic.label(), "stereotaxic");
        assert_eq!(
            CoordinateSpace::Window { window_index: 1 }.to_string(),
            "window"
        );
    }
}
