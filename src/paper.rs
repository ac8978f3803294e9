use crate::types::{Margins, Mm};

/// Paper geometry: the overall sheet plus the margins that bound the
/// live area available for content placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paper {
    width: Mm,
    height: Mm,
    margins: Margins,
}

impl Paper {
    pub fn new(width: Mm, height: Mm, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    pub fn a4() -> Self {
        Self::new(Mm::from_i32(210), Mm::from_i32(297), Margins::all(20.0))
    }

    pub fn letter() -> Self {
        // 8.5in x 11in.
        Self::new(
            Mm::from_f32(215.9),
            Mm::from_f32(279.4),
            Margins::all(20.0),
        )
    }

    pub fn width(&self) -> Mm {
        self.width
    }

    pub fn height(&self) -> Mm {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Width of the live area inside the left and right margins.
    pub fn live_width(&self) -> Mm {
        (self.width - self.margins.left - self.margins.right).max(Mm::ZERO)
    }

    /// Height of the live area inside the top and bottom margins.
    pub fn live_height(&self) -> Mm {
        (self.height - self.margins.top - self.margins.bottom).max(Mm::ZERO)
    }
}
