use crate::shapes::ShapeKind;

/// The active editing tool. Exactly one is active at any time; the session
/// routes every pointer event through this variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Polygon,
    Eyedropper,
    Select,
    Text,
    Crop,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Brush,
            Tool::Eraser,
            Tool::Rectangle,
            Tool::Circle,
            Tool::Line,
            Tool::Polygon,
            Tool::Eyedropper,
            Tool::Select,
            Tool::Text,
            Tool::Crop,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Line => "Line",
            Tool::Polygon => "Polygon",
            Tool::Eyedropper => "Eyedropper",
            Tool::Select => "Select",
            Tool::Text => "Text",
            Tool::Crop => "Crop",
        }
    }

    /// The shape primitive this tool draws, for the shape-drawing tools.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Polygon => Some(ShapeKind::Polygon),
            _ => None,
        }
    }
}
