use crate::document::Document;
use crate::paper::Paper;
use crate::types::{Mm, Point};
use std::cell::{Cell, Ref, RefCell};

/// Handle to a flowable frame owned by a [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    NewLine,
    NewPage,
}

/// A computed descriptor of one wrap event in a flowable frame.
///
/// `x` is the local x position at which the break triggers, `length` the
/// width of the line segment it starts, and `margin_above_next` the
/// vertical gap inserted before that line (the frame's padding for line
/// breaks, zero for page breaks, which restart at the live-area top).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakController {
    pub kind: BreakKind,
    pub x: Mm,
    pub length: Mm,
    pub margin_above_next: Mm,
}

fn layout_debug_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("SCOREFLOW_LAYOUT_DEBUG")
            .ok()
            .map(|v| {
                let v = v.trim();
                v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
            })
            .unwrap_or(false)
    })
}

/// A layout container that linearizes its children along one logical
/// horizontal axis and wraps them across lines and pages.
///
/// The frame's origin is relative to the live-area origin of page 0; the
/// first line is shortened by that x offset, every later line spans the
/// full live width. Break controllers are cached and fully recomputed on
/// first access after any geometry mutation.
pub struct FlowableFrame {
    pos: Point,
    width: Mm,
    height: Mm,
    y_padding: Mm,
    cache: RefCell<Vec<BreakController>>,
    dirty: Cell<bool>,
}

impl FlowableFrame {
    pub fn new(pos: Point, width: Mm, height: Mm, y_padding: Mm) -> Self {
        Self {
            pos,
            width,
            height,
            y_padding,
            cache: RefCell::new(Vec::new()),
            dirty: Cell::new(true),
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn width(&self) -> Mm {
        self.width
    }

    pub fn height(&self) -> Mm {
        self.height
    }

    pub fn y_padding(&self) -> Mm {
        self.y_padding
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
        self.dirty.set(true);
    }

    pub fn set_width(&mut self, width: Mm) {
        self.width = width;
        self.dirty.set(true);
    }

    pub fn set_height(&mut self, height: Mm) {
        self.height = height;
        self.dirty.set(true);
    }

    pub fn set_y_padding(&mut self, y_padding: Mm) {
        self.y_padding = y_padding;
        self.dirty.set(true);
    }

    /// Drops the cached break controllers. Layout queries recompute them
    /// in full on next access.
    pub fn invalidate_layout(&mut self) {
        self.dirty.set(true);
    }

    /// How many stacked lines fit in one page's live height. Always at
    /// least one, so overtall frames still make forward progress.
    fn lines_per_page(&self, paper: &Paper) -> usize {
        let advance = self.height + self.y_padding;
        if advance <= Mm::ZERO {
            return 1;
        }
        let fit = paper.live_height().to_milli_i64() / advance.to_milli_i64();
        fit.max(1) as usize
    }

    fn first_line_width(&self, paper: &Paper) -> Mm {
        (paper.live_width() - self.pos.x).max(Mm::ZERO)
    }

    fn generate(&self, paper: &Paper) -> Vec<BreakController> {
        let live_width = paper.live_width();
        let mut controllers = Vec::new();
        if self.width <= Mm::ZERO || live_width <= Mm::ZERO {
            return controllers;
        }
        let lines_per_page = self.lines_per_page(paper);
        let mut x = self.first_line_width(paper);
        let mut line_on_page = 1usize;
        // Content ending exactly on a line boundary emits no trailing
        // controller: the boundary belongs to the break before it.
        while x < self.width {
            let length = (self.width - x).min(live_width);
            if line_on_page >= lines_per_page {
                controllers.push(BreakController {
                    kind: BreakKind::NewPage,
                    x,
                    length,
                    margin_above_next: Mm::ZERO,
                });
                line_on_page = 1;
            } else {
                controllers.push(BreakController {
                    kind: BreakKind::NewLine,
                    x,
                    length,
                    margin_above_next: self.y_padding,
                });
                line_on_page += 1;
            }
            x += live_width;
        }
        if layout_debug_enabled() {
            let pages = controllers
                .iter()
                .filter(|c| c.kind == BreakKind::NewPage)
                .count();
            eprintln!(
                "scoreflow: frame width {}mm -> {} break controllers ({} page breaks, {} lines/page)",
                self.width.to_f32(),
                controllers.len(),
                pages,
                lines_per_page,
            );
        }
        controllers
    }

    fn ensure(&self, paper: &Paper) {
        if self.dirty.get() {
            *self.cache.borrow_mut() = self.generate(paper);
            self.dirty.set(false);
        }
    }

    /// The ordered break controllers for this frame, computing them if
    /// the cache is stale.
    pub fn controllers(&self, paper: &Paper) -> Ref<'_, Vec<BreakController>> {
        self.ensure(paper);
        self.cache.borrow()
    }

    /// Index of the break controller whose trigger position is the
    /// greatest one `<= x`, or `None` when `x` is still on the first
    /// line. A position exactly on a trigger belongs to that break.
    pub fn last_break_index_at(&self, paper: &Paper, x: Mm) -> Option<usize> {
        let controllers = self.controllers(paper);
        controllers
            .partition_point(|c| c.x <= x)
            .checked_sub(1)
    }

    /// Distance from local `x` to the end of the line it falls on.
    /// Negative when `x` lies past the line end (only possible past the
    /// content end of the final line).
    pub fn dist_to_line_end(&self, paper: &Paper, x: Mm) -> Mm {
        match self.last_break_index_at(paper, x) {
            None => self.first_line_width(paper) - x,
            Some(i) => {
                let controllers = self.controllers(paper);
                let line = &controllers[i];
                line.x + line.length - x
            }
        }
    }

    /// The page a local x position lands on, counting page-break
    /// controllers at or before it.
    pub fn page_index_at(&self, paper: &Paper, x: Mm) -> usize {
        let controllers = self.controllers(paper);
        let upto = controllers.partition_point(|c| c.x <= x);
        controllers[..upto]
            .iter()
            .filter(|c| c.kind == BreakKind::NewPage)
            .count()
    }

    /// Index of the last page this frame's content reaches.
    pub fn last_page_index(&self, paper: &Paper) -> usize {
        self.controllers(paper)
            .iter()
            .filter(|c| c.kind == BreakKind::NewPage)
            .count()
    }

    /// Maps a local position (x along the logical axis, y as an offset
    /// from the current line's top) to an absolute document-space
    /// position. Referentially consistent for fixed frame state.
    pub fn local_to_doc(&self, doc: &Document, local: Point) -> Point {
        let paper = doc.paper();
        self.ensure(paper);
        let live_origin = Point::new(paper.margins().left, paper.margins().top);
        let controllers = self.cache.borrow();
        let idx = controllers
            .partition_point(|c| c.x <= local.x)
            .checked_sub(1);
        match idx {
            None => doc.page_origin_in_doc_space(0) + live_origin + self.pos + local,
            Some(i) => {
                let line = &controllers[i];
                let page = controllers[..=i]
                    .iter()
                    .filter(|c| c.kind == BreakKind::NewPage)
                    .count();
                let last_page_break = controllers[..=i]
                    .iter()
                    .rposition(|c| c.kind == BreakKind::NewPage);
                // Lines after the last page break stack from the live-area
                // top; on the frame's first page they stack from its own y.
                let (lines_above, base_y) = match last_page_break {
                    Some(j) => (i - j, Mm::ZERO),
                    None => (i + 1, self.pos.y),
                };
                let line_y = base_y + (self.height + self.y_padding) * (lines_above as i32);
                doc.page_origin_in_doc_space(page)
                    + live_origin
                    + Point::new(local.x - line.x, line_y + local.y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ORIGIN;

    fn mm(v: f32) -> Mm {
        Mm::from_f32(v)
    }

    // A4 with 20mm margins: live area is 170 x 257.
    fn paper() -> Paper {
        Paper::a4()
    }

    fn doc() -> Document {
        Document::new(Paper::a4())
    }

    #[test]
    fn no_controllers_when_content_fits_one_line() {
        let frame = FlowableFrame::new(Point::from_f32(10.0, 11.0), mm(100.0), mm(5.0), mm(2.0));
        assert!(frame.controllers(&paper()).is_empty());
    }

    #[test]
    fn zero_width_frame_is_a_valid_trivial_case() {
        let frame = FlowableFrame::new(ORIGIN, Mm::ZERO, mm(5.0), mm(2.0));
        assert!(frame.controllers(&paper()).is_empty());
        assert_eq!(
            frame.local_to_doc(&doc(), ORIGIN),
            Point::from_f32(20.0, 20.0)
        );
    }

    #[test]
    fn one_new_line() {
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 1.5), mm(5.0), mm(2.0));
        let controllers = frame.controllers(&paper());
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].kind, BreakKind::NewLine);
        assert_eq!(controllers[0].x, mm(170.0));
        assert_eq!(controllers[0].length, mm(85.0));
    }

    #[test]
    fn many_new_lines() {
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 3.5), mm(50.0), mm(20.0));
        let controllers = frame.controllers(&paper());
        assert_eq!(controllers.len(), 3);
        assert!(controllers.iter().all(|c| c.kind == BreakKind::NewLine));
        assert_eq!(controllers[0].x, mm(170.0));
        assert_eq!(controllers[1].x, mm(340.0));
        assert_eq!(controllers[2].x, mm(510.0));
    }

    #[test]
    fn new_pages_when_one_line_fills_a_page() {
        // 200 + 20 > 257: one line per page, so every break is a page break.
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 3.5), mm(200.0), mm(20.0));
        let controllers = frame.controllers(&paper());
        assert_eq!(controllers.len(), 3);
        assert!(controllers.iter().all(|c| c.kind == BreakKind::NewPage));
        assert_eq!(controllers[0].x, mm(170.0));
        assert_eq!(controllers[2].x, mm(510.0));
    }

    #[test]
    fn line_and_page_breaks_alternate_with_two_lines_per_page() {
        // 257 / (120 + 5) = 2 lines per page.
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 4.5), mm(120.0), mm(5.0));
        let controllers = frame.controllers(&paper());
        let kinds: Vec<BreakKind> = controllers.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BreakKind::NewLine,
                BreakKind::NewPage,
                BreakKind::NewLine,
                BreakKind::NewPage,
            ]
        );
    }

    #[test]
    fn new_lines_carry_padding_and_new_pages_do_not() {
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 4.5), mm(120.0), mm(5.0));
        let controllers = frame.controllers(&paper());
        for c in controllers.iter() {
            match c.kind {
                BreakKind::NewLine => assert_eq!(c.margin_above_next, mm(5.0)),
                BreakKind::NewPage => assert_eq!(c.margin_above_next, Mm::ZERO),
            }
        }
    }

    #[test]
    fn segments_tile_the_frame_exactly() {
        for width in [1.0f32, 153.0, 170.0, 312.5, 500.0, 1234.5] {
            let frame = FlowableFrame::new(Point::from_f32(17.0, 11.0), mm(width), mm(5.0), mm(2.0));
            let controllers = frame.controllers(&paper());
            let first = frame.first_line_width(&paper()).min(mm(width));
            let total: Mm = first + controllers.iter().map(|c| c.length).sum::<Mm>();
            assert_eq!(total, mm(width), "width {}", width);
            assert!(controllers.iter().all(|c| c.length <= mm(170.0)));
            // Triggers strictly increase.
            for pair in controllers.windows(2) {
                assert!(pair[0].x < pair[1].x);
            }
        }
    }

    #[test]
    fn content_ending_exactly_on_a_boundary_emits_no_trailing_controller() {
        let frame = FlowableFrame::new(ORIGIN, mm(340.0), mm(5.0), mm(2.0));
        let controllers = frame.controllers(&paper());
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].x, mm(170.0));
        assert_eq!(controllers[0].length, mm(170.0));
    }

    #[test]
    fn break_index_at_trigger_belongs_to_that_break() {
        let frame = FlowableFrame::new(ORIGIN, mm(600.0), mm(5.0), mm(2.0));
        assert_eq!(frame.last_break_index_at(&paper(), mm(169.999)), None);
        assert_eq!(frame.last_break_index_at(&paper(), mm(170.0)), Some(0));
        assert_eq!(frame.last_break_index_at(&paper(), mm(340.0)), Some(1));
        assert_eq!(frame.last_break_index_at(&paper(), mm(350.0)), Some(1));
    }

    #[test]
    fn dist_to_line_end_accounts_for_frame_offset() {
        let frame = FlowableFrame::new(Point::from_f32(10.0, 0.0), mm(600.0), mm(5.0), mm(2.0));
        // First line runs from local 0 to 160.
        assert_eq!(frame.dist_to_line_end(&paper(), mm(100.0)), mm(60.0));
        // Second line: trigger 160, length 170.
        assert_eq!(frame.dist_to_line_end(&paper(), mm(200.0)), mm(130.0));
    }

    #[test]
    fn maps_first_line_positions() {
        let frame = FlowableFrame::new(Point::from_f32(10.0, 11.0), mm(1000.0), mm(5.0), mm(2.0));
        let mapped = frame.local_to_doc(&doc(), Point::from_f32(100.0, 40.0));
        // Page origin (0,0) + margins (20,20) + frame pos + local offset.
        assert_eq!(mapped, Point::from_f32(130.0, 71.0));
    }

    #[test]
    fn maps_second_line_positions() {
        let frame = FlowableFrame::new(Point::from_f32(17.0, 11.0), mm(1000.0), mm(5.0), mm(2.0));
        // First line is 153 wide, so local x 300 is 147 into line 1.
        let mapped = frame.local_to_doc(&doc(), Point::from_f32(300.0, 40.0));
        assert_eq!(mapped.x, mm(20.0 + 147.0));
        // Line 1 sits one advance (5 + 2) below the frame's own y.
        assert_eq!(mapped.y, mm(20.0 + 11.0 + 7.0 + 40.0));
    }

    #[test]
    fn maps_positions_after_a_page_break() {
        // One line per page; first break is a page break at 153.
        let frame = FlowableFrame::new(Point::from_f32(17.0, 11.0), mm(1000.0), mm(200.0), mm(20.0));
        let mapped = frame.local_to_doc(&doc(), Point::from_f32(160.0, 3.0));
        // Page 1 origin x = 210 + 150 gap; line restarts at the live-area top.
        assert_eq!(mapped.x, mm(360.0 + 20.0 + 7.0));
        assert_eq!(mapped.y, mm(20.0 + 3.0));
    }

    #[test]
    fn line_stacking_resets_on_each_page() {
        // Two lines per page.
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 6.0), mm(120.0), mm(5.0));
        let d = doc();
        for line in 0..6 {
            let x = mm(170.0 * line as f32 + 10.0);
            let mapped = frame.local_to_doc(&d, Point::new(x, Mm::ZERO));
            let line_on_page = line % 2;
            let page = line / 2;
            assert_eq!(
                mapped.y,
                mm(20.0 + 125.0 * line_on_page as f32),
                "line {}",
                line
            );
            assert_eq!(mapped.x, mm(360.0 * page as f32 + 20.0 + 10.0));
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let frame = FlowableFrame::new(Point::from_f32(17.0, 11.0), mm(5000.0), mm(5.0), mm(2.0));
        let local = Point::from_f32(3211.5, 1.25);
        let d = doc();
        assert_eq!(frame.local_to_doc(&d, local), frame.local_to_doc(&d, local));
    }

    #[test]
    fn geometry_mutation_recomputes_controllers_in_full() {
        let mut frame = FlowableFrame::new(ORIGIN, mm(170.0 * 1.5), mm(5.0), mm(2.0));
        assert_eq!(frame.controllers(&paper()).len(), 1);
        frame.set_width(mm(170.0 * 3.5));
        assert_eq!(frame.controllers(&paper()).len(), 3);
        frame.set_width(mm(10.0));
        assert!(frame.controllers(&paper()).is_empty());
    }

    #[test]
    fn last_page_index_counts_page_breaks() {
        let frame = FlowableFrame::new(ORIGIN, mm(170.0 * 4.5), mm(120.0), mm(5.0));
        assert_eq!(frame.last_page_index(&paper()), 2);
        assert_eq!(frame.page_index_at(&paper(), mm(10.0)), 0);
        assert_eq!(frame.page_index_at(&paper(), mm(400.0)), 1);
    }
}
