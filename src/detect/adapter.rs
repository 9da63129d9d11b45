use serde::{Deserialize, Serialize};

/// A single decoded video frame handed to the classifier.
///
/// The buffer layout is whatever the frame source and the classifier agree
/// on; the alert pipeline never inspects the pixels itself.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// One object reported by the classifier for a single frame. Not retained
/// past the frame that produced it.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Detection {
        Detection {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// Supplies frames to the pipeline at its own pace. Returning `None` ends
/// the frame loop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// The object-detection model boundary. Implementations own their model
/// handle; the pipeline constructs one instance up front and drives it per
/// frame rather than reaching for a process-wide singleton.
pub trait Classifier {
    fn classify(&mut self, frame: &Frame) -> Vec<Detection>;
}

/// Placeholder source producing empty frames forever. Lets the binary run
/// end to end before a camera integration is wired in.
pub struct StubFrameSource {
    width: u32,
    height: u32,
}

impl StubFrameSource {
    pub fn new(width: u32, height: u32) -> StubFrameSource {
        StubFrameSource { width, height }
    }
}

impl FrameSource for StubFrameSource {
    fn next_frame(&mut self) -> Option<Frame> {
        Some(Frame {
            width: self.width,
            height: self.height,
            data: vec![0; (self.width * self.height * 3) as usize],
        })
    }
}

/// Placeholder classifier that never detects anything.
pub struct StubClassifier;

impl Classifier for StubClassifier {
    fn classify(&mut self, _frame: &Frame) -> Vec<Detection> {
        Vec::new()
    }
}
