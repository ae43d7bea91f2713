use std::time::Duration;

use sculpture_shared::PanelRef;

use super::{ART_LIGHTS_STRIP, PERIMETER_STRIP, STRIP_A, STRIP_B, STRIP_C};

#[derive(Clone, Debug)]
pub struct HandshakeGameConfig {
    /// Time between a completed handshake and the next game
    pub transition_out_time: Duration,
}

impl Default for HandshakeGameConfig {
    fn default() -> Self {
        Self {
            transition_out_time: Duration::from_millis(4000),
        }
    }
}

/// Range of lifetimes a mole panel gets once `count` panels were found.
/// Lifetimes for counts between breakpoints are linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct LifetimeBreakpoint {
    pub count: u32,
    pub min: Duration,
    pub max: Duration,
}

impl LifetimeBreakpoint {
    pub fn new(count: u32, min_secs: f64, max_secs: f64) -> Self {
        Self {
            count,
            min: Duration::from_secs_f64(min_secs),
            max: Duration::from_secs_f64(max_secs),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MoleGameConfig {
    /// Panels found to win
    pub game_end: u32,
    /// Panels lit, in order, before random selection starts
    pub initial_panels: Vec<PanelRef>,
    /// Found-count -> change in the number of simultaneously lit panels
    pub active_panel_deltas: Vec<(u32, i32)>,
    pub panel_lifetimes: Vec<LifetimeBreakpoint>,
    /// Wait before lighting a replacement for a found panel
    pub panel_success_delay: Duration,
    /// Wait before lighting a replacement for an expired panel
    pub panel_move_delay: Duration,
    pub active_panel_intensity: u32,
    pub inactive_panel_intensity: u32,
    /// Intensity of a found panel, shown in the finder's color
    pub colored_panel_intensity: u32,
}

impl Default for MoleGameConfig {
    fn default() -> Self {
        Self {
            game_end: 30,
            initial_panels: vec![
                PanelRef::new(STRIP_A, "3"),
                PanelRef::new(STRIP_A, "7"),
                PanelRef::new(STRIP_C, "6"),
                PanelRef::new(STRIP_B, "5"),
            ],
            active_panel_deltas: vec![(10, 1), (20, 1), (25, -1), (27, -1)],
            panel_lifetimes: vec![
                LifetimeBreakpoint::new(0, 10.0, 10.0),
                LifetimeBreakpoint::new(4, 4.0, 6.0),
                LifetimeBreakpoint::new(20, 2.0, 3.0),
                LifetimeBreakpoint::new(30, 1.5, 2.0),
            ],
            panel_success_delay: Duration::from_millis(1000),
            panel_move_delay: Duration::from_millis(200),
            active_panel_intensity: 100,
            inactive_panel_intensity: 0,
            colored_panel_intensity: 75,
        }
    }
}

/// Targets of one disk game level
#[derive(Clone, Debug)]
pub struct DiskLevel {
    /// Disk id -> target position in degrees, in checking order
    pub targets: Vec<(String, f64)>,
    /// Perimeter panels lit while this level is played
    pub perimeter: Vec<String>,
}

impl DiskLevel {
    pub fn new(targets: [(&str, f64); 3], perimeter: [&str; 2]) -> Self {
        Self {
            targets: targets
                .iter()
                .map(|(disk_id, target)| (disk_id.to_string(), *target))
                .collect(),
            perimeter: perimeter.iter().map(|panel| panel.to_string()).collect(),
        }
    }
}

/// Which control panels pull which disk
#[derive(Clone, Debug)]
pub struct ControlMapping {
    pub disk_id: String,
    pub panels: Vec<String>,
}

impl ControlMapping {
    pub fn new(disk_id: &str, panels: &[&str]) -> Self {
        Self {
            disk_id: disk_id.to_string(),
            panels: panels.iter().map(|panel| panel.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DiskGameConfig {
    /// Max degrees a disk may be off of its target relative to the previous disk
    pub relative_tolerance: f64,
    /// Max degrees a disk may be off of its target
    pub absolute_tolerance: f64,
    pub check_relative_tolerance: bool,
    pub control_panel_intensity: u32,
    pub active_control_panel_intensity: u32,
    pub active_perimeter_intensity: u32,
    pub inactive_perimeter_intensity: u32,
    pub perimeter_color: String,
    pub perimeter_strip: String,
    pub shadow_lights: Vec<PanelRef>,
    pub shadow_light_intensity: u32,
    pub levels: Vec<DiskLevel>,
    pub clockwise_strip: String,
    pub counterclockwise_strip: String,
    pub controls: Vec<ControlMapping>,
}

impl DiskGameConfig {
    /// The disk controlled by `panel_id`, if any
    pub fn disk_for_panel(&self, panel_id: &str) -> Option<&ControlMapping> {
        self.controls
            .iter()
            .find(|mapping| mapping.panels.iter().any(|panel| panel == panel_id))
    }
}

impl Default for DiskGameConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: 5.0,
            absolute_tolerance: 8.0,
            check_relative_tolerance: false,
            control_panel_intensity: 20,
            active_control_panel_intensity: 100,
            active_perimeter_intensity: 100,
            inactive_perimeter_intensity: 50,
            perimeter_color: "white".to_string(),
            perimeter_strip: PERIMETER_STRIP.to_string(),
            shadow_lights: vec![
                PanelRef::new(ART_LIGHTS_STRIP, "0"),
                PanelRef::new(ART_LIGHTS_STRIP, "1"),
                PanelRef::new(ART_LIGHTS_STRIP, "2"),
            ],
            shadow_light_intensity: 100,
            levels: vec![
                DiskLevel::new([("disk2", 52.0), ("disk1", 317.0), ("disk0", 316.0)], ["0", "4"]),
                DiskLevel::new([("disk2", 66.0), ("disk1", 287.0), ("disk0", 308.0)], ["1", "3"]),
                DiskLevel::new([("disk2", 286.0), ("disk1", 335.0), ("disk0", 240.0)], ["2", "5"]),
            ],
            clockwise_strip: STRIP_C.to_string(),
            counterclockwise_strip: STRIP_A.to_string(),
            controls: vec![
                ControlMapping::new("disk0", &["1"]),
                ControlMapping::new("disk1", &["3"]),
                ControlMapping::new("disk2", &["5"]),
            ],
        }
    }
}

/// One Simon level: the strip it is played on and the steps of its pattern
#[derive(Clone, Debug)]
pub struct SimonLevel {
    pub strip_id: String,
    /// Each step is the set of panels that must all be pressed before the
    /// next step
    pub panel_sequence: Vec<Vec<String>>,
    /// Overrides the default sequence frame delay
    pub frame_delay: Option<Duration>,
}

impl SimonLevel {
    pub fn new(strip_id: &str, panel_sequence: &[&[&str]], frame_delay: Option<Duration>) -> Self {
        Self {
            strip_id: strip_id.to_string(),
            panel_sequence: panel_sequence
                .iter()
                .map(|step| step.iter().map(|panel| panel.to_string()).collect())
                .collect(),
            frame_delay,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimonGameConfig {
    pub levels: Vec<SimonLevel>,
    pub target_panel_intensity: u32,
    pub available_panel_intensity: u32,
    pub sequence_frame_delay: Duration,
    /// Idle time before the pattern is shown again
    pub delay_between_plays: Duration,
    /// Time without completing the pattern, once started, before it is shown again
    pub input_timeout: Duration,
    pub default_panel_color: String,
    pub transition_out_time: Duration,
}

impl Default for SimonGameConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                SimonLevel::new(
                    STRIP_A,
                    &[&["3"], &["5"], &["7"]],
                    Some(Duration::from_millis(750)),
                ),
                SimonLevel::new(STRIP_B, &[&["1"], &["8"], &["5"]], None),
                SimonLevel::new(STRIP_C, &[&["3"], &["6"], &["2"], &["9"]], None),
            ],
            target_panel_intensity: 100,
            available_panel_intensity: 1,
            sequence_frame_delay: Duration::from_millis(500),
            delay_between_plays: Duration::from_millis(5000),
            input_timeout: Duration::from_millis(10000),
            default_panel_color: "white".to_string(),
            transition_out_time: Duration::from_millis(10000),
        }
    }
}
