use crate::canvas::{Canvas, ClipWindow};
use crate::error::ScoreflowError;
use crate::object::{Drawable, ObjectCommon};
use crate::types::{Mm, Point};

/// Fixed-advance text measurement. Real font metrics live behind export
/// backends; layout only needs a monotone width estimate, and a constant
/// per-glyph advance keeps it deterministic.
pub trait TextMetrics {
    fn advance(&self, text: &str, size: Mm) -> Mm;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMetrics {
    /// Advance per glyph as a fraction of the font size.
    pub em_fraction: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self { em_fraction: 0.6 }
    }
}

impl TextMetrics for FixedAdvanceMetrics {
    fn advance(&self, text: &str, size: Mm) -> Mm {
        size * self.em_fraction * text.chars().count() as f32
    }
}

/// A run of text.
///
/// When a text object breaks across lines, continuation slices normally
/// replay the original run through a clip window. Some notations instead
/// repeat a marker on every line (an octave line continues as "(8va)"),
/// so a continuation string can replace the clipped replay on slices
/// after the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    text: String,
    size: Mm,
    continuation_text: Option<String>,
}

impl Text {
    pub fn plain(text: impl Into<String>, size: Mm) -> Self {
        Self {
            text: text.into(),
            size,
            continuation_text: None,
        }
    }

    pub fn with_continuation(
        text: impl Into<String>,
        size: Mm,
        continuation: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            size,
            continuation_text: Some(continuation.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> Mm {
        self.size
    }

    /// Width of the run under the given metrics.
    pub fn measure(&self, metrics: &impl TextMetrics) -> Mm {
        metrics.advance(&self.text, self.size)
    }
}

impl Drawable for Text {
    fn type_name(&self) -> &'static str {
        "text"
    }

    fn render_complete(
        &self,
        common: &ObjectCommon,
        pos: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        common.apply_style(canvas);
        canvas.draw_text(pos, self.text.clone(), self.size, None);
        Ok(())
    }

    fn render_before_break(
        &self,
        common: &ObjectCommon,
        start: Point,
        stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        common.apply_style(canvas);
        let clip = ClipWindow::new(Mm::ZERO, Some(stop.x - start.x));
        canvas.draw_text(start, self.text.clone(), self.size, Some(clip));
        Ok(())
    }

    fn render_spanning_continuation(
        &self,
        common: &ObjectCommon,
        local_start_x: Mm,
        start: Point,
        stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        common.apply_style(canvas);
        match &self.continuation_text {
            Some(continuation) => {
                canvas.draw_text(start, continuation.clone(), self.size, None);
            }
            None => {
                let clip = ClipWindow::new(local_start_x, Some(stop.x - start.x));
                canvas.draw_text(start, self.text.clone(), self.size, Some(clip));
            }
        }
        Ok(())
    }

    fn render_after_break(
        &self,
        common: &ObjectCommon,
        local_start_x: Mm,
        start: Point,
        _stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        common.apply_style(canvas);
        match &self.continuation_text {
            Some(continuation) => {
                canvas.draw_text(start, continuation.clone(), self.size, None);
            }
            None => {
                let clip = ClipWindow::new(local_start_x, None);
                canvas.draw_text(start, self.text.clone(), self.size, Some(clip));
            }
        }
        Ok(())
    }
}
