use crate::store::{
    error::StoreError,
    schema::Schema,
    tracked::Tracked,
    tracked_store::{Diff, TrackedStore},
};

pub const MAX_INTENSITY: &str = "maxIntensity";
pub const PANELS: &str = "panels";
pub const INTENSITY: &str = "intensity";
pub const COLOR: &str = "color";
pub const ACTIVE: &str = "active";

pub const DEFAULT_MAX_INTENSITY: u32 = 100;

/// Strips of light panels, each panel carrying an intensity, a color and an
/// `active` (pressed) flag.
///
/// Tracked layout: `{strip: {maxIntensity, panels: {panel: {intensity, color, active}}}}`.
/// Panel ids are the panel's index within its strip.
#[derive(Clone, Debug, PartialEq)]
pub struct LightArray {
    data: TrackedStore,
    strip_ids: Vec<String>,
    default_intensity: u32,
    default_color: String,
}

impl LightArray {
    pub fn new<I, S>(strip_lengths: I, default_intensity: u32, default_color: &str) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut schema = Schema::new();
        let mut strip_ids = Vec::new();

        for (strip_id, length) in strip_lengths {
            let strip_id = strip_id.into();

            let mut panels = Schema::new();
            for panel_index in 0..length {
                panels = panels.store(
                    panel_index.to_string(),
                    TrackedStore::new(
                        Schema::new()
                            .value(INTENSITY, default_intensity)
                            .value(COLOR, default_color)
                            .value(ACTIVE, false),
                    ),
                );
            }

            schema = schema.store(
                strip_id.clone(),
                TrackedStore::new(
                    Schema::new()
                        .value(MAX_INTENSITY, DEFAULT_MAX_INTENSITY)
                        .store(PANELS, TrackedStore::new(panels)),
                ),
            );
            strip_ids.push(strip_id);
        }

        Self {
            data: TrackedStore::new(schema),
            strip_ids,
            default_intensity,
            default_color: default_color.to_string(),
        }
    }

    pub fn data(&self) -> &TrackedStore {
        &self.data
    }

    pub fn strip_ids(&self) -> &[String] {
        &self.strip_ids
    }

    pub fn has_strip(&self, strip_id: &str) -> bool {
        self.data.contains(strip_id)
    }

    pub fn panel_ids(&self, strip_id: &str) -> Result<Vec<&str>, StoreError> {
        Ok(self.panels(strip_id)?.names().collect())
    }

    pub fn default_intensity(&self) -> u32 {
        self.default_intensity
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    pub fn max_intensity(&self, strip_id: &str) -> Result<u32, StoreError> {
        self.strip(strip_id)?.get_u32(MAX_INTENSITY)
    }

    /// Set the intensity cap of one strip, or of every strip when `strip_id` is `None`
    pub fn set_max_intensity(
        &mut self,
        intensity: u32,
        strip_id: Option<&str>,
    ) -> Result<(), StoreError> {
        for strip_id in self.selected_strips(strip_id) {
            self.strip_mut(&strip_id)?.set(MAX_INTENSITY, intensity)?;
        }
        Ok(())
    }

    pub fn intensity(&self, strip_id: &str, panel_id: &str) -> Result<u32, StoreError> {
        self.panel(strip_id, panel_id)?.get_u32(INTENSITY)
    }

    /// Set one panel's intensity, or every panel of the strip when `panel_id` is `None`
    pub fn set_intensity(
        &mut self,
        strip_id: &str,
        panel_id: Option<&str>,
        intensity: u32,
    ) -> Result<(), StoreError> {
        self.update_panels(strip_id, panel_id, |panel| panel.set(INTENSITY, intensity))
    }

    pub fn set_default_intensity(
        &mut self,
        strip_id: &str,
        panel_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let intensity = self.default_intensity;
        self.set_intensity(strip_id, panel_id, intensity)
    }

    pub fn color(&self, strip_id: &str, panel_id: &str) -> Result<&str, StoreError> {
        self.panel(strip_id, panel_id)?.get_str(COLOR)
    }

    /// Set one panel's color, or every panel of the strip when `panel_id` is `None`
    pub fn set_color(
        &mut self,
        strip_id: &str,
        panel_id: Option<&str>,
        color: &str,
    ) -> Result<(), StoreError> {
        self.update_panels(strip_id, panel_id, |panel| panel.set(COLOR, color))
    }

    pub fn set_default_color(
        &mut self,
        strip_id: &str,
        panel_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let color = self.default_color.clone();
        self.set_color(strip_id, panel_id, &color)
    }

    pub fn is_active(&self, strip_id: &str, panel_id: &str) -> Result<bool, StoreError> {
        self.panel(strip_id, panel_id)?.get_bool(ACTIVE)
    }

    pub fn activate(
        &mut self,
        strip_id: &str,
        panel_id: &str,
        active: bool,
    ) -> Result<(), StoreError> {
        self.panel_mut(strip_id, panel_id)?.set(ACTIVE, active)
    }

    pub fn deactivate(&mut self, strip_id: &str, panel_id: &str) -> Result<(), StoreError> {
        self.activate(strip_id, panel_id, false)
    }

    /// Clear the `active` flag on one strip, or on every strip when `strip_id` is `None`
    pub fn deactivate_all(&mut self, strip_id: Option<&str>) -> Result<(), StoreError> {
        for strip_id in self.selected_strips(strip_id) {
            self.update_panels(&strip_id, None, |panel| panel.set(ACTIVE, false))?;
        }
        Ok(())
    }

    pub fn panel(&self, strip_id: &str, panel_id: &str) -> Result<&TrackedStore, StoreError> {
        let panels = self.panels(strip_id)?;
        if !panels.has(panel_id) {
            return Err(unknown_panel(strip_id, panel_id));
        }
        panels.get_store(panel_id)
    }

    fn panel_mut(
        &mut self,
        strip_id: &str,
        panel_id: &str,
    ) -> Result<&mut TrackedStore, StoreError> {
        let panels = self.panels_mut(strip_id)?;
        if !panels.has(panel_id) {
            return Err(unknown_panel(strip_id, panel_id));
        }
        panels.get_store_mut(panel_id)
    }

    fn strip(&self, strip_id: &str) -> Result<&TrackedStore, StoreError> {
        if !self.data.has(strip_id) {
            return Err(unknown_strip(strip_id));
        }
        self.data.get_store(strip_id)
    }

    fn strip_mut(&mut self, strip_id: &str) -> Result<&mut TrackedStore, StoreError> {
        if !self.data.has(strip_id) {
            return Err(unknown_strip(strip_id));
        }
        self.data.get_store_mut(strip_id)
    }

    fn panels(&self, strip_id: &str) -> Result<&TrackedStore, StoreError> {
        self.strip(strip_id)?.get_store(PANELS)
    }

    fn panels_mut(&mut self, strip_id: &str) -> Result<&mut TrackedStore, StoreError> {
        self.strip_mut(strip_id)?.get_store_mut(PANELS)
    }

    fn selected_strips(&self, strip_id: Option<&str>) -> Vec<String> {
        match strip_id {
            Some(strip_id) => vec![strip_id.to_string()],
            None => self.strip_ids.clone(),
        }
    }

    fn update_panels<F>(
        &mut self,
        strip_id: &str,
        panel_id: Option<&str>,
        mut update: F,
    ) -> Result<(), StoreError>
    where
        F: FnMut(&mut TrackedStore) -> Result<(), StoreError>,
    {
        match panel_id {
            Some(panel_id) => update(self.panel_mut(strip_id, panel_id)?),
            None => {
                for panel in self.panels_mut(strip_id)?.stores_mut() {
                    update(panel)?;
                }
                Ok(())
            }
        }
    }
}

impl Tracked for LightArray {
    fn has_changes(&self) -> bool {
        self.data.has_changes()
    }

    fn changed_current_values(&self) -> Diff {
        self.data.changed_current_values()
    }

    fn changed_old_values(&self) -> Diff {
        self.data.changed_old_values()
    }

    fn clear_changes(&mut self) {
        self.data.clear_changes();
    }
}

fn unknown_strip(strip_id: &str) -> StoreError {
    StoreError::UnknownStrip {
        strip_id: strip_id.to_string(),
    }
}

fn unknown_panel(strip_id: &str, panel_id: &str) -> StoreError {
    StoreError::UnknownPanel {
        strip_id: strip_id.to_string(),
        panel_id: panel_id.to_string(),
    }
}
