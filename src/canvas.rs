use crate::style::{Brush, Pen};
use crate::types::{Mm, Point};

/// A horizontal sub-range of a primitive's content.
///
/// `start` is measured in the primitive's own content space; `width` of
/// `None` means "to content end". A backend consuming a clipped command
/// translates the content by `-start` and paints only `[0, width)`,
/// so a single authored primitive can be replayed once per line slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub start: Mm,
    pub width: Option<Mm>,
}

impl ClipWindow {
    pub fn new(start: Mm, width: Option<Mm>) -> Self {
        Self { start, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    CurveTo {
        control_1: Point,
        control_2: Point,
        end: Point,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPen(Pen),
    SetBrush(Brush),
    DrawPath {
        pos: Point,
        elements: Vec<PathElement>,
        clip: Option<ClipWindow>,
    },
    DrawText {
        pos: Point,
        text: String,
        size: Mm,
        clip: Option<ClipWindow>,
    },
}

/// The fully recorded scene, in paint order. Positions are absolute
/// document-space coordinates; export sinks consume this directly.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<Command>,
}

/// A recording canvas for one render pass.
///
/// Pen and brush changes are deduplicated against the current graphics
/// state so repeated slices of one object do not bloat the scene.
pub struct Canvas {
    commands: Vec<Command>,
    current_pen: Option<Pen>,
    current_brush: Option<Brush>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            current_pen: None,
            current_brush: None,
        }
    }

    pub fn set_pen(&mut self, pen: Pen) {
        if self.current_pen.as_ref() == Some(&pen) {
            return;
        }
        self.current_pen = Some(pen.clone());
        self.commands.push(Command::SetPen(pen));
    }

    pub fn set_brush(&mut self, brush: Brush) {
        if self.current_brush.as_ref() == Some(&brush) {
            return;
        }
        self.current_brush = Some(brush.clone());
        self.commands.push(Command::SetBrush(brush));
    }

    pub fn draw_path(&mut self, pos: Point, elements: Vec<PathElement>, clip: Option<ClipWindow>) {
        self.commands.push(Command::DrawPath {
            pos,
            elements,
            clip,
        });
    }

    pub fn draw_text(
        &mut self,
        pos: Point,
        text: impl Into<String>,
        size: Mm,
        clip: Option<ClipWindow>,
    ) {
        self.commands.push(Command::DrawText {
            pos,
            text: text.into(),
            size,
            clip,
        });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn finish(self) -> DisplayList {
        DisplayList {
            commands: self.commands,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}
