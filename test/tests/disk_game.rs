/// End-to-end tests for the disk game
/// Disks are rotated through disk-update actions and controlled through the
/// clockwise (strip 2) and counterclockwise (strip 0) control panels

use proptest::prelude::*;
use sculpture::SculptureConfig;
use sculpture_shared::{Action, Direction, DiskUpdate, Game, Status};
use sculpture_test::{assert_color, assert_intensity, assert_status, merge_from, TestSculpture};
use serde_json::json;

const LEVEL_ZERO: [(&str, f64); 3] = [("disk2", 52.0), ("disk1", 317.0), ("disk0", 316.0)];

fn disk_game_with(config: SculptureConfig) -> TestSculpture {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sculpture = TestSculpture::with_config(config);
    sculpture.start_game(Game::Disk);
    sculpture
}

fn disk_game() -> TestSculpture {
    disk_game_with(SculptureConfig::for_user("sculpture0"))
}

fn relative_disk_game() -> TestSculpture {
    let mut config = SculptureConfig::for_user("sculpture0");
    config.disk_game.check_relative_tolerance = true;
    disk_game_with(config)
}

fn level(sculpture: &TestSculpture) -> usize {
    sculpture
        .state()
        .game_data(Game::Disk)
        .unwrap()
        .get_usize("level")
        .unwrap()
}

fn direction(sculpture: &TestSculpture, disk_id: &str) -> Direction {
    sculpture.state().disk(disk_id).unwrap().direction().unwrap()
}

#[test]
fn start_lights_controls_and_first_perimeter() {
    let sculpture = disk_game();

    assert_eq!(level(&sculpture), 0);
    for panel_id in ["1", "3", "5"] {
        assert_intensity!(sculpture, "0", panel_id, 20);
        assert_intensity!(sculpture, "2", panel_id, 20);
    }
    assert_intensity!(sculpture, "3", "0", 100);
    assert_intensity!(sculpture, "3", "4", 100);
    assert_intensity!(sculpture, "3", "1", 0);
    assert_intensity!(sculpture, "6", "2", 100);
}

#[test]
fn solving_a_level_advances_and_blinks_success() {
    let mut sculpture = disk_game();

    sculpture.rotate_disk("disk2", 52.0);
    sculpture.rotate_disk("disk1", 317.0);
    assert_status!(sculpture, Status::Ready);

    sculpture.rotate_disk("disk0", 316.0);

    assert_status!(sculpture, Status::Success);
    assert_eq!(level(&sculpture), 1);
    assert_color!(sculpture, "3", "0", "user0");
    assert_intensity!(sculpture, "3", "0", 50);
    assert_color!(sculpture, "3", "1", "white");
    assert_intensity!(sculpture, "3", "1", 100);
    assert_intensity!(sculpture, "3", "3", 100);

    sculpture.advance_ms(250);
    assert_color!(sculpture, "5", "0", "user0");
    assert_intensity!(sculpture, "5", "0", 100);

    sculpture.finish_status_animation();
    assert_status!(sculpture, Status::Ready);
    assert_intensity!(sculpture, "5", "0", 0);
    assert_eq!(sculpture.current_game(), Some(Game::Disk));
}

#[test]
fn positions_within_tolerance_and_across_zero_solve() {
    let mut sculpture = disk_game();

    sculpture.rotate_disk("disk2", 52.0 + 360.0);
    sculpture.rotate_disk("disk1", 317.0 - 7.5);
    sculpture.rotate_disk("disk0", 316.0 + 6.0);

    assert_status!(sculpture, Status::Success);
}

#[test]
fn positions_outside_tolerance_do_not_solve() {
    let mut sculpture = disk_game();

    sculpture.rotate_disk("disk2", 52.0);
    sculpture.rotate_disk("disk1", 317.0);
    sculpture.rotate_disk("disk0", 316.0 + 9.0);

    assert_status!(sculpture, Status::Ready);
    assert_eq!(level(&sculpture), 0);
}

#[test]
fn winning_stops_every_disk() {
    let mut sculpture = disk_game();
    sculpture.press("2", "3");
    assert_eq!(direction(&sculpture, "disk1"), Direction::Clockwise);

    sculpture.rotate_disk("disk2", 52.0);
    sculpture.rotate_disk("disk1", 317.0);
    sculpture.rotate_disk("disk0", 316.0);

    assert_eq!(direction(&sculpture, "disk1"), Direction::Stopped);
    assert!(!sculpture.lights().is_active("2", "3").unwrap());
}

#[test]
fn solving_every_level_moves_to_the_next_game() {
    let mut sculpture = disk_game();

    for (disk2, disk1, disk0) in [(52.0, 317.0, 316.0), (66.0, 287.0, 308.0), (286.0, 335.0, 240.0)] {
        sculpture.rotate_disk("disk2", disk2);
        sculpture.rotate_disk("disk1", disk1);
        sculpture.rotate_disk("disk0", disk0);
        assert_status!(sculpture, Status::Success);
        sculpture.finish_status_animation();
    }

    assert_eq!(sculpture.current_game(), Some(Game::Simon));
    assert_intensity!(sculpture, "3", "2", 0);
    assert_intensity!(sculpture, "6", "0", 0);
}

#[test]
fn control_panels_pull_their_disk() {
    let mut sculpture = disk_game();

    sculpture.press("2", "1");
    assert_eq!(direction(&sculpture, "disk0"), Direction::Clockwise);
    assert_intensity!(sculpture, "2", "1", 100);
    assert_color!(sculpture, "2", "1", "user0");

    sculpture.release("2", "1");
    assert_eq!(direction(&sculpture, "disk0"), Direction::Stopped);
    assert_intensity!(sculpture, "2", "1", 20);
    assert_color!(sculpture, "2", "1", "white");
}

#[test]
fn opposing_controls_conflict() {
    let mut sculpture = disk_game();

    sculpture.press("2", "1");
    sculpture.press("0", "1");

    assert_eq!(direction(&sculpture, "disk0"), Direction::Conflict);
    assert_color!(sculpture, "0", "1", "error");
    assert_color!(sculpture, "2", "1", "error");

    sculpture.release("2", "1");
    assert_eq!(direction(&sculpture, "disk0"), Direction::Counterclockwise);
    assert_color!(sculpture, "2", "1", "white");
}

#[test]
fn unmapped_control_panels_stay_dark() {
    let mut sculpture = disk_game();

    sculpture.press("2", "2");

    assert_intensity!(sculpture, "2", "2", 0);
    assert_eq!(direction(&sculpture, "disk0"), Direction::Stopped);
}

#[test]
fn merged_pulls_are_arbitrated_locally() {
    let mut sculpture = disk_game();
    sculpture.press("2", "5");

    sculpture
        .dispatch(merge_from(
            "sculpture1",
            json!({"disks": {"disk2": {"counterclockwisePull": 1}}}),
        ))
        .unwrap();

    assert_eq!(direction(&sculpture, "disk2"), Direction::Conflict);
    let disk = sculpture.state().disk("disk2").unwrap();
    assert_eq!(disk.clockwise_pull().unwrap(), 1);
    assert_eq!(disk.counterclockwise_pull().unwrap(), 1);
}

#[test]
fn relative_misalignment_does_not_solve() {
    let mut sculpture = relative_disk_game();

    // each disk is within 8 degrees, but disk1 is 14 degrees off relative to disk2
    sculpture.rotate_disk("disk2", 52.0 + 7.0);
    sculpture.rotate_disk("disk1", 317.0 - 7.0);
    sculpture.rotate_disk("disk0", 316.0);

    assert_status!(sculpture, Status::Ready);
    assert_eq!(level(&sculpture), 0);
}

#[test]
fn relative_alignment_solves_when_shifted_together() {
    let mut sculpture = relative_disk_game();

    for (disk_id, target) in LEVEL_ZERO {
        sculpture.rotate_disk(disk_id, target + 7.0);
    }

    assert_status!(sculpture, Status::Success);
    assert_eq!(level(&sculpture), 1);
}

#[test]
fn merged_final_level_completes_the_game() {
    let mut sculpture = disk_game();

    sculpture
        .dispatch(merge_from("sculpture1", json!({"disk": {"level": 3}})))
        .unwrap();
    let update = DiskUpdate {
        position: Some(10.0),
        ..DiskUpdate::default()
    };
    let result = sculpture.dispatch(Action::disk_update("disk0", update).unwrap());

    assert_eq!(result, Ok(()));
    assert!(sculpture.store().active_game().unwrap().logic().is_complete());
    assert_eq!(level(&sculpture), 3);
    assert_status!(sculpture, Status::Ready);

    sculpture.press("2", "1");
    assert_eq!(direction(&sculpture, "disk0"), Direction::Stopped);
}

proptest! {
    #[test]
    fn prop_level_zero_solves_within_tolerance(offsets in prop::array::uniform3(-7.5f64..7.5)) {
        let mut sculpture = disk_game();

        for ((disk_id, target), offset) in LEVEL_ZERO.into_iter().zip(offsets) {
            sculpture.rotate_disk(disk_id, target + offset);
        }

        prop_assert_eq!(sculpture.status(), Status::Success);
        prop_assert_eq!(level(&sculpture), 1);
    }
}
