use std::time::Duration;

use sculpture_shared::Action;

use crate::{
    animation::frame::{Frame, FrameEffect},
    config::StatusAnimationConfig,
};

pub type AnimationId = u64;

/// A named sequence of frames, played one action per frame, with an
/// optional action dispatched once the last frame has run.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelAnimation {
    name: String,
    frames: Vec<Frame>,
    on_complete: Option<Action>,
    id: Option<AnimationId>,
    next_frame: usize,
    running: bool,
}

impl PanelAnimation {
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            name: name.into(),
            frames,
            on_complete: None,
            id: None,
            next_frame: 0,
            running: false,
        }
    }

    pub fn on_complete(mut self, action: Action) -> Self {
        self.on_complete = Some(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigned when the animation starts playing
    pub fn id(&self) -> Option<AnimationId> {
        self.id
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Index of the frame that runs next
    pub fn next_frame(&self) -> usize {
        self.next_frame
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_stopped(&self) -> bool {
        !self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn start(&mut self, id: AnimationId) {
        self.id = Some(id);
        self.next_frame = 0;
        self.running = true;
    }

    /// Wait before frame `index` runs; the terminal step runs immediately
    pub(crate) fn delay_before(&self, index: usize) -> Duration {
        self.frames
            .get(index)
            .map(|frame| frame.delay)
            .unwrap_or(Duration::ZERO)
    }

    pub(crate) fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub(crate) fn advance(&mut self) {
        self.next_frame += 1;
    }

    pub(crate) fn take_on_complete(&mut self) -> Option<Action> {
        self.on_complete.take()
    }
}

pub const STATUS_ANIMATION: &str = "status";

/// Blinks the status strip in `color`, then dispatches `finish-status-animation`
pub fn status_animation(
    config: &StatusAnimationConfig,
    color: &str,
    off_color: &str,
) -> PanelAnimation {
    let mut frames = Vec::with_capacity(config.blinks * 2);
    for _ in 0..config.blinks {
        frames.push(Frame::new(config.frame_delay).with(FrameEffect::NormalizeStrip {
            strip_id: config.strip_id.clone(),
            color: color.to_string(),
            intensity: config.intensity,
        }));
        frames.push(Frame::new(config.frame_delay).with(FrameEffect::NormalizeStrip {
            strip_id: config.strip_id.clone(),
            color: off_color.to_string(),
            intensity: 0,
        }));
    }

    PanelAnimation::new(STATUS_ANIMATION, frames).on_complete(Action::FinishStatusAnimation)
}
