use crate::canvas::{Canvas, ClipWindow, PathElement};
use crate::error::ScoreflowError;
use crate::object::{Drawable, ObjectCommon};
use crate::types::{Mm, Point};

/// A vector path built from move, line, and cubic segments, all relative
/// to the owning object's position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single line segment from the object's position to `end`.
    pub fn straight_line(end: Point) -> Self {
        let mut path = Self::new();
        path.line_to(end);
        path
    }

    pub fn move_to(&mut self, pos: Point) -> &mut Self {
        self.elements.push(PathElement::MoveTo(pos));
        self
    }

    pub fn line_to(&mut self, pos: Point) -> &mut Self {
        self.elements.push(PathElement::LineTo(pos));
        self
    }

    pub fn cubic_to(&mut self, control_1: Point, control_2: Point, end: Point) -> &mut Self {
        self.elements.push(PathElement::CurveTo {
            control_1,
            control_2,
            end,
        });
        self
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Rightmost x reached by any anchor or control point. Curves are
    /// bounded by their control polygon, so this never under-reports.
    pub fn max_x(&self) -> Mm {
        let mut max = Mm::ZERO;
        for element in &self.elements {
            match element {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => max = max.max(p.x),
                PathElement::CurveTo {
                    control_1,
                    control_2,
                    end,
                } => {
                    max = max.max(control_1.x).max(control_2.x).max(end.x);
                }
            }
        }
        max
    }
}

impl Drawable for Path {
    fn type_name(&self) -> &'static str {
        "path"
    }

    fn render_complete(
        &self,
        common: &ObjectCommon,
        pos: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        common.apply_style(canvas);
        canvas.draw_path(pos, self.elements.clone(), None);
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
        canvas.draw_path(start, self.elements.clone(), Some(clip));
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
        let clip = ClipWindow::new(local_start_x, Some(stop.x - start.x));
        canvas.draw_path(start, self.elements.clone(), Some(clip));
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
        let clip = ClipWindow::new(local_start_x, None);
        canvas.draw_path(start, self.elements.clone(), Some(clip));
        Ok(())
    }
}
