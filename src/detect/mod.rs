mod adapter;
mod filter;
mod state;

pub use adapter::{
    BoundingBox, Classifier, Detection, Frame, FrameSource, StubClassifier, StubFrameSource,
};
pub use filter::{filter, FilterResult};
pub use state::{AlertEvent, AlertStateMachine};
