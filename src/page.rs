use crate::paper::Paper;
use crate::types::{Mm, Point, Rect};

/// One page of the document.
///
/// Pages are created exclusively by [`Document`](crate::document::Document)
/// in index order; application code positions objects relative to them but
/// never constructs or mutates them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pos: Point,
    index: usize,
    paper: Paper,
}

impl Page {
    pub(crate) fn new(pos: Point, index: usize, paper: Paper) -> Self {
        Self { pos, index, paper }
    }

    /// Index of this page in the document's page sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Document-space position of the page's top-left corner.
    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    /// The full sheet, positioned relative to the page.
    pub fn bounding_rect(&self) -> Rect {
        Rect {
            x: Mm::ZERO,
            y: Mm::ZERO,
            width: self.paper.width(),
            height: self.paper.height(),
        }
    }

    /// The area inside the margins, positioned relative to the page.
    pub fn live_area_rect(&self) -> Rect {
        Rect {
            x: self.paper.margins().left,
            y: self.paper.margins().top,
            width: self.paper.live_width(),
            height: self.paper.live_height(),
        }
    }
}
