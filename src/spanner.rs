use crate::object::ObjectId;
use crate::types::{Mm, Point};

/// An independent end anchor for objects that stretch between two
/// points: lines, hairpins, pedal markings, octave lines.
///
/// The start anchor is the owning object's own position and parent; the
/// end anchor is `end_pos` relative to `end_parent`, or relative to the
/// owner itself when `end_parent` is `None`. Held by composition in
/// concrete graphic types; resolution and validation go through
/// [`Scene`](crate::scene::Scene), which rejects anchors whose parent
/// chains resolve into different flowable frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanner {
    pub end_pos: Point,
    pub end_parent: Option<ObjectId>,
}

impl Spanner {
    pub fn new(end_pos: Point, end_parent: Option<ObjectId>) -> Self {
        Self {
            end_pos,
            end_parent,
        }
    }

    /// Euclidean length of a resolved start-to-end offset. Coincident
    /// anchors yield exactly zero, not a numerical near-zero.
    pub(crate) fn length_of_offset(offset: Point) -> Mm {
        if offset.x == Mm::ZERO && offset.y == Mm::ZERO {
            return Mm::ZERO;
        }
        let dx = offset.x.to_milli_i64() as f64;
        let dy = offset.y.to_milli_i64() as f64;
        Mm::from_milli_i64(libm::sqrt(dx * dx + dy * dy).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::ScoreflowError;
    use crate::flowable::FlowableFrame;
    use crate::object::{ObjectSpec, Parent};
    use crate::paper::Paper;
    use crate::scene::Scene;
    use crate::text::Text;
    use crate::types::ORIGIN;

    fn mm(v: f32) -> Mm {
        Mm::from_f32(v)
    }

    fn scene_with_frame() -> (Scene, crate::flowable::FrameId) {
        let mut scene = Scene::new(Document::new(Paper::a4()));
        let frame = scene.add_frame(FlowableFrame::new(ORIGIN, mm(600.0), mm(5.0), mm(2.0)));
        (scene, frame)
    }

    #[test]
    fn self_relative_end_needs_no_mapping() {
        let (scene, frame) = scene_with_frame();
        let spanner = Spanner::new(Point::from_f32(3.0, 4.0), None);
        let length = scene
            .spanner_length_at(Parent::Frame(frame), ORIGIN, &spanner)
            .unwrap();
        assert_eq!(length, mm(5.0));
    }

    #[test]
    fn coincident_anchors_have_exactly_zero_length() {
        let (mut scene, frame) = scene_with_frame();
        let anchor = scene
            .add(
                ObjectSpec::new(Point::from_f32(40.0, 10.0), Parent::Frame(frame)),
                Box::new(Text::plain("f", mm(3.0))),
            )
            .unwrap();
        let spanner = Spanner::new(ORIGIN, Some(anchor));
        let length = scene
            .spanner_length_at(Parent::Frame(frame), Point::from_f32(40.0, 10.0), &spanner)
            .unwrap();
        assert_eq!(length, Mm::ZERO);
    }

    #[test]
    fn length_maps_through_the_end_parent_chain() {
        let (mut scene, frame) = scene_with_frame();
        let anchor = scene
            .add(
                ObjectSpec::new(Point::from_f32(30.0, 0.0), Parent::Frame(frame)),
                Box::new(Text::plain("p", mm(3.0))),
            )
            .unwrap();
        // End anchor at local (30 + 30, 40): a 30/40/50 triangle from the owner.
        let spanner = Spanner::new(Point::from_f32(30.0, 40.0), Some(anchor));
        let length = scene
            .spanner_length_at(Parent::Frame(frame), Point::from_f32(30.0, 0.0), &spanner)
            .unwrap();
        assert_eq!(length, mm(50.0));
    }

    #[test]
    fn mixed_flowable_membership_is_rejected() {
        let (mut scene, frame) = scene_with_frame();
        let page_object = scene
            .add(
                ObjectSpec::new(ORIGIN, Parent::Page(0)),
                Box::new(Text::plain("title", mm(7.0))),
            )
            .unwrap();
        let spanner = Spanner::new(ORIGIN, Some(page_object));
        let err = scene
            .spanner_length_at(Parent::Frame(frame), ORIGIN, &spanner)
            .unwrap_err();
        assert!(matches!(err, ScoreflowError::SpannerAnchorMismatch(_)));
    }

    #[test]
    fn backwards_flowable_spanners_are_rejected_at_construction() {
        let (scene, frame) = scene_with_frame();
        let spanner = Spanner::new(Point::from_f32(-10.0, 0.0), None);
        let err = scene
            .spanner_end_offset_at(Parent::Frame(frame), Point::from_f32(50.0, 0.0), &spanner)
            .unwrap_err();
        assert!(matches!(err, ScoreflowError::InvalidConfiguration(_)));
    }

    #[test]
    fn non_flowable_spanners_resolve_in_document_space() {
        let mut scene = Scene::new(Document::new(Paper::a4()));
        let anchor = scene
            .add(
                ObjectSpec::new(Point::from_f32(100.0, 50.0), Parent::Page(1)),
                Box::new(Text::plain("fine", mm(3.0))),
            )
            .unwrap();
        // Owner on page 1 at (100, 10); end 40mm below it via the anchor.
        let spanner = Spanner::new(ORIGIN, Some(anchor));
        let length = scene
            .spanner_length_at(Parent::Page(1), Point::from_f32(100.0, 10.0), &spanner)
            .unwrap();
        assert_eq!(length, mm(40.0));
    }
}
