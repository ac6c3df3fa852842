use serde::Serialize;

/// Axis-aligned bounding box of a placed component, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub id: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Obstacle {
    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x1 && point.0 <= self.x2 && point.1 >= self.y1 && point.1 <= self.y2
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub id: String,
    /// Role label used for coloring (`"5V"`, `"GND"` or the connection name).
    pub role: String,
    pub points: Vec<(f32, f32)>,
    pub color: String,
    /// False when at least one segment fell back to the direct stub.
    pub routed: bool,
}

impl Wire {
    pub fn new(id: String, role: String, points: Vec<(f32, f32)>) -> Self {
        Self {
            id,
            role,
            points,
            color: String::new(),
            routed: true,
        }
    }
}

/// Zero-length marker drawn on top of a mapped pin.
#[derive(Debug, Clone, PartialEq)]
pub struct PinMarker {
    pub id: String,
    pub point: (f32, f32),
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    MalformedPinMap,
    MissingPinMapFile,
    UnresolvedSize,
    UnknownDevice,
    UnknownPin,
    NoRoute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    /// Builds a diagnostic and reports it through the `log` facade.
    pub fn raise(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        let diagnostic = Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        log::warn!("{}: {}", diagnostic.subject, diagnostic.message);
        diagnostic
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutedCircuit {
    pub wires: Vec<Wire>,
    pub pin_markers: Vec<PinMarker>,
    pub obstacles: Vec<Obstacle>,
    pub diagnostics: Vec<Diagnostic>,
}
