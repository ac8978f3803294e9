use crate::canvas::Canvas;
use crate::error::ScoreflowError;
use crate::flowable::FrameId;
use crate::style::{Brush, Pen};
use crate::types::{Mm, Point};
use std::fmt;

/// Handle to an object in a [`Scene`](crate::scene::Scene) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) usize);

/// The ownership link of a positioned object. Parents must exist before
/// their children are inserted, so the tree cannot contain cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Page(usize),
    Frame(FrameId),
    Object(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Complete,
    BeforeBreak,
    SpanningContinuation,
    AfterBreak,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderPhase::Complete => "complete",
            RenderPhase::BeforeBreak => "before-break",
            RenderPhase::SpanningContinuation => "spanning-continuation",
            RenderPhase::AfterBreak => "after-break",
        };
        write!(f, "{}", name)
    }
}

/// Position, styling, and tree membership shared by every drawable
/// object. Concrete graphic types hold their content separately and
/// receive this by reference during rendering.
#[derive(Debug, Clone)]
pub struct ObjectCommon {
    pub pos: Point,
    /// Horizontal extent subject to line wrapping. Zero means the object
    /// never splits, even inside a flowable frame.
    pub breakable_width: Mm,
    pub pen: Option<Pen>,
    pub brush: Option<Brush>,
    /// Draw order; lower values are painted first (further behind).
    pub z_index: i32,
    pub(crate) parent: Parent,
    /// Nearest flowable frame ancestor, resolved once at insertion.
    pub(crate) frame: Option<FrameId>,
}

impl ObjectCommon {
    pub fn parent(&self) -> Parent {
        self.parent
    }

    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    pub(crate) fn apply_style(&self, canvas: &mut Canvas) {
        if let Some(brush) = &self.brush {
            canvas.set_brush(brush.clone());
        }
        if let Some(pen) = &self.pen {
            canvas.set_pen(pen.clone());
        }
    }
}

/// Everything needed to insert an object into a scene.
#[derive(Debug, Clone)]
pub struct ObjectSpec {
    pub pos: Point,
    pub parent: Parent,
    pub breakable_width: Mm,
    pub pen: Option<Pen>,
    pub brush: Option<Brush>,
    pub z_index: i32,
}

impl ObjectSpec {
    pub fn new(pos: Point, parent: Parent) -> Self {
        Self {
            pos,
            parent,
            breakable_width: Mm::ZERO,
            pen: None,
            brush: None,
            z_index: 0,
        }
    }

    pub fn breakable_width(mut self, width: Mm) -> Self {
        self.breakable_width = width;
        self
    }

    pub fn pen(mut self, pen: Pen) -> Self {
        self.pen = Some(pen);
        self
    }

    pub fn brush(mut self, brush: Brush) -> Self {
        self.brush = Some(brush);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// The flowable-aware render protocol.
///
/// Objects that never split (zero breakable width, or never placed in a
/// flowable frame) only need `render_complete`. The three break phases
/// default to a fail-fast error raised at the point the phase is
/// actually demanded, so simple types can omit them.
///
/// For the break phases, `start` and `stop` are document-space points on
/// the current line, and `local_start_x` is the offset into the object's
/// own content where the slice begins (for clip windows).
pub trait Drawable {
    fn type_name(&self) -> &'static str;

    fn render_complete(
        &self,
        common: &ObjectCommon,
        pos: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError>;

    fn render_before_break(
        &self,
        common: &ObjectCommon,
        start: Point,
        stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        let _ = (common, start, stop, canvas);
        Err(ScoreflowError::UnimplementedRenderPhase {
            type_name: self.type_name(),
            phase: RenderPhase::BeforeBreak,
        })
    }

    fn render_spanning_continuation(
        &self,
        common: &ObjectCommon,
        local_start_x: Mm,
        start: Point,
        stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        let _ = (common, local_start_x, start, stop, canvas);
        Err(ScoreflowError::UnimplementedRenderPhase {
            type_name: self.type_name(),
            phase: RenderPhase::SpanningContinuation,
        })
    }

    fn render_after_break(
        &self,
        common: &ObjectCommon,
        local_start_x: Mm,
        start: Point,
        stop: Point,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        let _ = (common, local_start_x, start, stop, canvas);
        Err(ScoreflowError::UnimplementedRenderPhase {
            type_name: self.type_name(),
            phase: RenderPhase::AfterBreak,
        })
    }
}
