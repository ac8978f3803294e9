use crate::types::{Color, Mm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenPattern {
    Solid,
    Dash,
    Dot,
}

/// Outline styling for paths and text.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub thickness: Mm,
    pub pattern: PenPattern,
}

impl Pen {
    pub fn new(color: Color, thickness: Mm) -> Self {
        Self {
            color,
            thickness,
            pattern: PenPattern::Solid,
        }
    }

    pub fn with_pattern(mut self, pattern: PenPattern) -> Self {
        self.pattern = pattern;
        self
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen::new(Color::BLACK, Mm::from_f32(0.2))
    }
}

/// Fill styling for closed shapes and text glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub color: Color,
}

impl Brush {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::new(Color::BLACK)
    }
}
