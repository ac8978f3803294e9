mod canvas;
mod document;
mod error;
mod flowable;
mod object;
mod page;
mod paper;
mod path;
mod scene;
mod spanner;
mod style;
mod text;
mod types;

pub use canvas::{Canvas, ClipWindow, Command, DisplayList, PathElement};
pub use document::Document;
pub use error::ScoreflowError;
pub use flowable::{BreakController, BreakKind, FlowableFrame, FrameId};
pub use object::{Drawable, ObjectCommon, ObjectId, ObjectSpec, Parent, RenderPhase};
pub use page::Page;
pub use paper::Paper;
pub use path::Path;
pub use scene::Scene;
pub use spanner::Spanner;
pub use style::{Brush, Pen, PenPattern};
pub use text::{FixedAdvanceMetrics, Text, TextMetrics};
pub use types::{Color, Margins, Mm, ORIGIN, Point, Rect};
