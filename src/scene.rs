use crate::canvas::Canvas;
use crate::document::Document;
use crate::error::ScoreflowError;
use crate::flowable::{FlowableFrame, FrameId};
use crate::object::{Drawable, ObjectCommon, ObjectId, ObjectSpec, Parent};
use crate::spanner::Spanner;
use crate::types::{Mm, Point};

struct ObjectNode {
    common: ObjectCommon,
    content: Box<dyn Drawable>,
}

/// The object tree and render driver.
///
/// Owns the document, the flowable frames, and an arena of positioned
/// objects. Parents must exist before their children are inserted, which
/// keeps the tree acyclic by construction, and each object's nearest
/// flowable frame ancestor is resolved once at insertion rather than
/// rediscovered by walking at render time.
pub struct Scene {
    doc: Document,
    frames: Vec<FlowableFrame>,
    objects: Vec<ObjectNode>,
}

impl Scene {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            frames: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn add_frame(&mut self, frame: FlowableFrame) -> FrameId {
        self.frames.push(frame);
        FrameId(self.frames.len() - 1)
    }

    pub fn frame(&self, id: FrameId) -> &FlowableFrame {
        &self.frames[id.0]
    }

    pub fn frame_mut(&mut self, id: FrameId) -> &mut FlowableFrame {
        &mut self.frames[id.0]
    }

    /// Inserts an object under an existing parent and resolves its
    /// flowable frame membership.
    pub fn add(
        &mut self,
        spec: ObjectSpec,
        content: Box<dyn Drawable>,
    ) -> Result<ObjectId, ScoreflowError> {
        match spec.parent {
            Parent::Page(_) => {}
            Parent::Frame(f) => {
                if f.0 >= self.frames.len() {
                    return Err(ScoreflowError::InvalidConfiguration(
                        "parent frame does not exist in this scene".to_string(),
                    ));
                }
            }
            Parent::Object(o) => {
                if o.0 >= self.objects.len() {
                    return Err(ScoreflowError::InvalidConfiguration(
                        "parent object does not exist in this scene".to_string(),
                    ));
                }
            }
        }
        let frame = self.frame_of_parent(spec.parent);
        self.objects.push(ObjectNode {
            common: ObjectCommon {
                pos: spec.pos,
                breakable_width: spec.breakable_width,
                pen: spec.pen,
                brush: spec.brush,
                z_index: spec.z_index,
                parent: spec.parent,
                frame,
            },
            content,
        });
        Ok(ObjectId(self.objects.len() - 1))
    }

    pub fn common(&self, id: ObjectId) -> &ObjectCommon {
        &self.objects[id.0].common
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn frame_of_parent(&self, parent: Parent) -> Option<FrameId> {
        match parent {
            Parent::Page(_) => None,
            Parent::Frame(f) => Some(f),
            Parent::Object(o) => self.objects[o.0].common.frame,
        }
    }

    /// Accumulates positions up the parent chain into frame-local
    /// coordinates. Only meaningful for chains that end at a frame.
    fn local_in_frame(&self, parent: Parent, pos: Point) -> Point {
        let mut acc = pos;
        let mut parent = parent;
        loop {
            match parent {
                Parent::Frame(_) | Parent::Page(_) => return acc,
                Parent::Object(o) => {
                    let node = &self.objects[o.0];
                    acc = node.common.pos + acc;
                    parent = node.common.parent;
                }
            }
        }
    }

    /// Resolves a (parent, position) pair to absolute document space,
    /// mapping through a flowable frame when the chain ends in one.
    pub fn doc_pos_of(&self, parent: Parent, pos: Point) -> Point {
        let mut acc = pos;
        let mut parent = parent;
        loop {
            match parent {
                Parent::Page(i) => return self.doc.page_origin_in_doc_space(i) + acc,
                Parent::Frame(f) => return self.frames[f.0].local_to_doc(&self.doc, acc),
                Parent::Object(o) => {
                    let node = &self.objects[o.0];
                    acc = node.common.pos + acc;
                    parent = node.common.parent;
                }
            }
        }
    }

    /// An object's resolved document-space position.
    pub fn doc_pos(&self, id: ObjectId) -> Point {
        let node = &self.objects[id.0];
        self.doc_pos_of(node.common.parent, node.common.pos)
    }

    /// Resolves a spanner's end anchor into an offset from a prospective
    /// owner at (`parent`, `pos`), validating flowable membership.
    ///
    /// Fails when the anchors straddle a flowable boundary or resolve to
    /// different frames, and when a flowable end anchor precedes its
    /// start (only left-to-right flow is supported).
    pub fn spanner_end_offset_at(
        &self,
        parent: Parent,
        pos: Point,
        spanner: &Spanner,
    ) -> Result<Point, ScoreflowError> {
        let owner_frame = self.frame_of_parent(parent);
        let offset = match spanner.end_parent {
            None => spanner.end_pos,
            Some(end_parent) => {
                if end_parent.0 >= self.objects.len() {
                    return Err(ScoreflowError::InvalidConfiguration(
                        "spanner end parent does not exist in this scene".to_string(),
                    ));
                }
                let end_node = &self.objects[end_parent.0];
                if owner_frame != end_node.common.frame {
                    return Err(ScoreflowError::SpannerAnchorMismatch(
                        "start and end anchors must share one flowable frame (or neither be in one)"
                            .to_string(),
                    ));
                }
                if owner_frame.is_some() {
                    let end = self.local_in_frame(end_node.common.parent, end_node.common.pos)
                        + spanner.end_pos;
                    end - self.local_in_frame(parent, pos)
                } else {
                    let end =
                        self.doc_pos_of(end_node.common.parent, end_node.common.pos) + spanner.end_pos;
                    end - self.doc_pos_of(parent, pos)
                }
            }
        };
        if owner_frame.is_some() && offset.x < Mm::ZERO {
            return Err(ScoreflowError::InvalidConfiguration(
                "flowable spanner end precedes its start in the flow direction".to_string(),
            ));
        }
        Ok(offset)
    }

    pub fn spanner_end_offset(
        &self,
        owner: ObjectId,
        spanner: &Spanner,
    ) -> Result<Point, ScoreflowError> {
        let node = &self.objects[owner.0];
        self.spanner_end_offset_at(node.common.parent, node.common.pos, spanner)
    }

    /// Euclidean distance from an owner's position to the spanner's
    /// resolved end anchor, in the owner's length unit.
    pub fn spanner_length_at(
        &self,
        parent: Parent,
        pos: Point,
        spanner: &Spanner,
    ) -> Result<Mm, ScoreflowError> {
        let offset = self.spanner_end_offset_at(parent, pos, spanner)?;
        Ok(Spanner::length_of_offset(offset))
    }

    pub fn spanner_length(
        &self,
        owner: ObjectId,
        spanner: &Spanner,
    ) -> Result<Mm, ScoreflowError> {
        let offset = self.spanner_end_offset(owner, spanner)?;
        Ok(Spanner::length_of_offset(offset))
    }

    fn root_page(&self, parent: Parent) -> Option<usize> {
        let mut parent = parent;
        loop {
            match parent {
                Parent::Page(i) => return Some(i),
                Parent::Frame(_) => return None,
                Parent::Object(o) => parent = self.objects[o.0].common.parent,
            }
        }
    }

    fn ensure_pages(&mut self) {
        let mut last: Option<usize> = None;
        let paper = *self.doc.paper();
        for frame in &self.frames {
            last = Some(last.unwrap_or(0).max(frame.last_page_index(&paper)));
        }
        for i in 0..self.objects.len() {
            if let Some(page) = self.root_page(self.objects[i].common.parent) {
                last = Some(last.unwrap_or(0).max(page));
            }
        }
        if let Some(last) = last {
            self.doc.page_at(last);
        }
    }

    /// Renders the whole tree into `canvas` in one synchronous pass:
    /// pages are created for every reachable index, then objects are
    /// dispatched in z order (ties broken by insertion order). Errors
    /// abort the pass with no partial-render recovery.
    pub fn render(&mut self, canvas: &mut Canvas) -> Result<(), ScoreflowError> {
        self.ensure_pages();
        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        order.sort_by_key(|&i| (self.objects[i].common.z_index, i));
        for i in order {
            self.render_object(ObjectId(i), canvas)?;
        }
        Ok(())
    }

    fn render_object(&self, id: ObjectId, canvas: &mut Canvas) -> Result<(), ScoreflowError> {
        let node = &self.objects[id.0];
        match node.common.frame {
            None => node
                .content
                .render_complete(&node.common, self.doc_pos(id), canvas),
            Some(frame) => self.render_flowable(id, frame, canvas),
        }
    }

    /// Drives the up-to-four-piece flowable protocol for one object.
    fn render_flowable(
        &self,
        id: ObjectId,
        frame_id: FrameId,
        canvas: &mut Canvas,
    ) -> Result<(), ScoreflowError> {
        let node = &self.objects[id.0];
        let frame = &self.frames[frame_id.0];
        let paper = self.doc.paper();
        let local = self.local_in_frame(node.common.parent, node.common.pos);
        let width = node.common.breakable_width;
        let dist_to_end = frame.dist_to_line_end(paper, local.x);
        let controller_count = frame.controllers(paper).len();
        // Objects that stop short of their line's end never split; a
        // width reaching exactly to the boundary does (the boundary
        // belongs to the break). A frame with no breaks has nowhere to
        // continue, so overrunning content is drawn whole.
        if width <= Mm::ZERO || width < dist_to_end || controller_count == 0 {
            let pos = frame.local_to_doc(&self.doc, local);
            return node.content.render_complete(&node.common, pos, canvas);
        }
        let start = frame.local_to_doc(&self.doc, local);
        let stop = Point::new(start.x + dist_to_end, start.y);
        node.content
            .render_before_break(&node.common, start, stop, canvas)?;
        let mut remaining = width - dist_to_end;
        let mut local_start_x = dist_to_end;
        let mut line = frame
            .last_break_index_at(paper, local.x)
            .map_or(0, |i| i + 1);
        loop {
            let (line_x, line_length) = {
                let controllers = frame.controllers(paper);
                let idx = line.min(controller_count - 1);
                (controllers[idx].x, controllers[idx].length)
            };
            if line + 1 < controller_count && remaining > line_length {
                let slice_start = frame.local_to_doc(&self.doc, Point::new(line_x, local.y));
                let slice_stop = Point::new(slice_start.x + line_length, slice_start.y);
                node.content.render_spanning_continuation(
                    &node.common,
                    local_start_x,
                    slice_start,
                    slice_stop,
                    canvas,
                )?;
                remaining -= line_length;
                local_start_x += line_length;
                line += 1;
            } else {
                let slice_start = frame.local_to_doc(&self.doc, Point::new(line_x, local.y));
                let slice_stop = Point::new(slice_start.x + remaining, slice_start.y);
                return node.content.render_after_break(
                    &node.common,
                    local_start_x,
                    slice_start,
                    slice_stop,
                    canvas,
                );
            }
        }
    }
}
