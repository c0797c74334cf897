//! Adapters implementing the presenter port.

pub mod recording;
pub mod text;

pub use recording::{RecordedStep, RecordingPresenter};
pub use text::TextPresenter;
