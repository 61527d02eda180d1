//! Configuration for the export and import pipelines

use super::Position;

/// Export options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// Pretty-print artifact JSON
    pub pretty: bool,
}

impl ExportConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Import options
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Where the created diagram node is placed under its parent
    pub diagram_position: Position,
    /// Diagram name used when the notation document carries none
    pub diagram_name_fallback: String,
}

impl ImportConfig {
    pub fn new(diagram_position: Position) -> Self {
        Self {
            diagram_position,
            ..Default::default()
        }
    }

    pub fn with_diagram_position(mut self, position: Position) -> Self {
        self.diagram_position = position;
        self
    }

    pub fn with_diagram_name_fallback(mut self, name: impl Into<String>) -> Self {
        self.diagram_name_fallback = name.into();
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            diagram_position: Position::new(200.0, 200.0),
            diagram_name_fallback: "ParametricDiagram".to_string(),
        }
    }
}
