use crate::page::Page;
use crate::paper::Paper;
use crate::types::{Mm, Point};

/// The document root: owns the ordered page sequence and supplies pages
/// on demand.
///
/// Pages are laid out in a single row, left to right, separated by a
/// fixed visual gap; page origins are derived from the index alone and
/// never stored redundantly.
pub struct Document {
    paper: Paper,
    page_gap: Mm,
    pages: Vec<Page>,
}

impl Document {
    pub fn new(paper: Paper) -> Self {
        Self {
            paper,
            page_gap: Mm::from_i32(150),
            pages: Vec::new(),
        }
    }

    pub fn with_page_gap(mut self, gap: Mm) -> Self {
        self.page_gap = gap;
        self
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn page_gap(&self) -> Mm {
        self.page_gap
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns the page at `index`, lazily creating every missing page
    /// up to it in index order.
    pub fn page_at(&mut self, index: usize) -> &Page {
        while self.pages.len() <= index {
            let i = self.pages.len();
            let pos = self.page_origin_in_doc_space(i);
            self.pages.push(Page::new(pos, i, self.paper));
        }
        &self.pages[index]
    }

    /// Document-space position of a page's top-left corner, derived from
    /// the index, paper width, and inter-page gap.
    pub fn page_origin_in_doc_space(&self, index: usize) -> Point {
        Point {
            x: (self.paper.width() + self.page_gap) * index as i32,
            y: Mm::ZERO,
        }
    }
}
