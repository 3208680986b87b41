//! CSV export for annotations
//!
//! Provides functionality to export annotation sets to CSV format for
//! analysis, reporting, and integration with external tools.

use std::io::Write;

use crate::annotation::{Annotation, Color};

/// Error types for CSV export
#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

pub type CsvExportResult<T> = Result<T, CsvExportError>;

/// Configuration for CSV export
#[derive(Debug, Clone)]
pub struct CsvExportConfig {
    /// Include column headers in the output
    pub include_headers: bool,

    /// CSV delimiter character
    pub delimiter: u8,

    /// Include hidden annotations in export
    pub include_hidden: bool,
}

impl Default for CsvExportConfig {
    fn default() -> Self {
        Self {
            include_headers: true,
            delimiter: b',',
            include_hidden: false,
        }
    }
}

/// Export annotations to CSV format
///
/// CSV columns:
/// - ID: Unique annotation identifier
/// - Space: Coordinate space name
/// - Tab: Tab index for tab-space annotations (empty otherwise)
/// - Window: Window index for window-space annotations (empty otherwise)
/// - Type: Annotation kind (line, box, oval, ...)
/// - Stroke Color: Hex color code for stroke (e.g., #FF0000)
/// - Fill Color: Hex color code for fill or empty if no fill
/// - Stroke Width: Stroke width in viewport percent
/// - Opacity: Opacity from 0.0 to 1.0
/// - BBox Min X / Min Y / Max X / Max Y: Bounding box extents
/// - Visible: Whether the annotation is visible (true/false)
/// - Stacking Order: Back-to-front draw precedence
pub fn export_annotations<W: Write>(
    writer: W,
    annotations: &[&Annotation],
    config: &CsvExportConfig,
) -> CsvExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.include_headers)
        .from_writer(writer);

    if config.include_headers {
        csv_writer.write_record([
            "ID",
            "Space",
            "Tab",
            "Window",
            "Type",
            "Stroke Color",
            "Fill Color",
            "Stroke Width",
            "Opacity",
            "BBox Min X",
            "BBox Min Y",
            "BBox Max X",
            "BBox Max Y",
            "Visible",
            "Stacking Order",
        ])?;
    }

    let filtered: Vec<&Annotation> = annotations
        .iter()
        .copied()
        .filter(|a| config.include_hidden || a.is_visible())
        .collect();

    for annotation in filtered {
        let style = annotation.style();
        let bounds = annotation.bounds();

        csv_writer.write_record(&[
            annotation.id().to_string(),
            annotation.space().label().to_string(),
            annotation
                .tab_index()
                .map(|index| index.to_string())
                .unwrap_or_default(),
            annotation
                .window_index()
                .map(|index| index.to_string())
                .unwrap_or_default(),
            annotation.kind().label().to_string(),
            color_to_hex(&style.stroke_color),
            style
                .fill_color
                .as_ref()
                .map(color_to_hex)
                .unwrap_or_default(),
            style.stroke_width.to_string(),
            style.opacity.to_string(),
            bounds.min_x.to_string(),
            bounds.min_y.to_string(),
            bounds.max_x.to_string(),
            bounds.max_y.to_string(),
            annotation.is_visible().to_string(),
            annotation.stacking_order().to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export annotations to a CSV string
pub fn export_annotations_to_string(
    annotations: &[&Annotation],
    config: &CsvExportConfig,
) -> CsvExportResult<String> {
    let mut buffer = Vec::new();
    export_annotations(&mut buffer, annotations, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Convert a color to a hex string like #RRGGBB
fn color_to_hex(color: &Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}
