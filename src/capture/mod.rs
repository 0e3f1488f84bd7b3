pub mod controller;
pub mod loop_worker;
pub mod source;

pub use controller::CaptureController;
pub use loop_worker::CaptureContext;
pub use source::{FrameSample, MediaSource, SyntheticCamera};
