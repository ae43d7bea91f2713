use std::time::Duration;

use sculpture_shared::{LightArray, StoreError};

pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(1000);

/// A single light change applied when a frame runs
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEffect {
    /// Every panel of the strip to one color and intensity
    NormalizeStrip {
        strip_id: String,
        color: String,
        intensity: u32,
    },
    /// Only the listed panels of the strip
    LightPanels {
        strip_id: String,
        panel_ids: Vec<String>,
        color: String,
        intensity: u32,
    },
    /// Every panel of every strip to intensity zero
    ZeroAllStrips,
}

impl FrameEffect {
    pub fn apply(&self, lights: &mut LightArray) -> Result<(), StoreError> {
        match self {
            FrameEffect::NormalizeStrip {
                strip_id,
                color,
                intensity,
            } => {
                lights.set_color(strip_id, None, color)?;
                lights.set_intensity(strip_id, None, *intensity)
            }
            FrameEffect::LightPanels {
                strip_id,
                panel_ids,
                color,
                intensity,
            } => {
                for panel_id in panel_ids {
                    lights.set_color(strip_id, Some(panel_id), color)?;
                    lights.set_intensity(strip_id, Some(panel_id), *intensity)?;
                }
                Ok(())
            }
            FrameEffect::ZeroAllStrips => {
                let strip_ids = lights.strip_ids().to_vec();
                for strip_id in &strip_ids {
                    lights.set_intensity(strip_id, None, 0)?;
                }
                Ok(())
            }
        }
    }
}

/// Effects applied together once `delay` has elapsed since the previous frame
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub delay: Duration,
    pub effects: Vec<FrameEffect>,
}

impl Frame {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            effects: Vec::new(),
        }
    }

    pub fn with(mut self, effect: FrameEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn run(&self, lights: &mut LightArray) -> Result<(), StoreError> {
        for effect in &self.effects {
            effect.apply(lights)?;
        }
        Ok(())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_DELAY)
    }
}
