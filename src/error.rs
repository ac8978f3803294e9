use crate::object::RenderPhase;
use std::fmt;

#[derive(Debug)]
pub enum ScoreflowError {
    /// A spanner's start and end anchors do not resolve into the same
    /// flowable frame (or one is flowable and the other is not).
    SpannerAnchorMismatch(String),
    /// A concrete graphic type was asked to render a break phase it does
    /// not implement.
    UnimplementedRenderPhase {
        type_name: &'static str,
        phase: RenderPhase,
    },
    InvalidConfiguration(String),
}

impl fmt::Display for ScoreflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreflowError::SpannerAnchorMismatch(message) => {
                write!(f, "spanner anchors straddle flowable frames: {}", message)
            }
            ScoreflowError::UnimplementedRenderPhase { type_name, phase } => {
                write!(
                    f,
                    "{} does not implement the {} render phase",
                    type_name, phase
                )
            }
            ScoreflowError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for ScoreflowError {}
