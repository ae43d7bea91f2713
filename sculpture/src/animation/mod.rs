mod frame;
mod panel_animation;

pub use frame::{Frame, FrameEffect, DEFAULT_FRAME_DELAY};
pub use panel_animation::{status_animation, AnimationId, PanelAnimation};
