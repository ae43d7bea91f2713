/// End-to-end tests for the Simon game
/// The first level is played on strip 0 with the pattern 3, 5, 7 shown at
/// 750ms per frame

use std::time::Duration;

use sculpture::{SculptureConfig, SimonLevel};
use sculpture_shared::{Action, Game, Status};
use sculpture_test::{assert_color, assert_intensity, assert_status, merge_from, TestSculpture};
use serde_json::json;

const SEQUENCE_TIME: u64 = 4 * 750;

fn simon_game_with(config: SculptureConfig) -> TestSculpture {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sculpture = TestSculpture::with_config(config);
    sculpture.start_game(Game::Simon);
    sculpture
}

fn simon_game() -> TestSculpture {
    simon_game_with(SculptureConfig::for_user("sculpture2"))
}

fn level(sculpture: &TestSculpture) -> usize {
    sculpture
        .state()
        .game_data(Game::Simon)
        .unwrap()
        .get_usize("level")
        .unwrap()
}

fn is_animating(sculpture: &TestSculpture) -> bool {
    sculpture.state().is_animation_running()
}

#[test]
fn pattern_is_shown_one_step_per_frame() {
    let mut sculpture = simon_game();
    assert!(is_animating(&sculpture));

    sculpture.advance_ms(750);
    assert_intensity!(sculpture, "0", "3", 100);
    assert_intensity!(sculpture, "0", "5", 1);

    sculpture.advance_ms(750);
    assert_intensity!(sculpture, "0", "3", 1);
    assert_intensity!(sculpture, "0", "5", 100);

    sculpture.advance_ms(1500);
    assert_intensity!(sculpture, "0", "7", 1);
    assert!(!is_animating(&sculpture));
}

#[test]
fn repeating_the_pattern_wins_the_level() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.tap("0", "3");
    sculpture.tap("0", "5");
    assert_status!(sculpture, Status::Ready);
    sculpture.tap("0", "7");

    assert_status!(sculpture, Status::Success);
    assert_eq!(level(&sculpture), 1);
    assert_intensity!(sculpture, "0", "7", 0);

    sculpture.advance_ms(250);
    assert_color!(sculpture, "5", "0", "user2");

    sculpture.finish_status_animation();
    assert_status!(sculpture, Status::Ready);
    assert!(is_animating(&sculpture));

    // level 1 is shown on strip 1 at the default 500ms per frame
    sculpture.advance_ms(500);
    assert_intensity!(sculpture, "1", "1", 100);
}

#[test]
fn pressed_panels_show_the_players_color() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.press("0", "3");
    assert_color!(sculpture, "0", "3", "user2");
    assert_intensity!(sculpture, "0", "3", 100);

    sculpture.release("0", "3");
    assert_color!(sculpture, "0", "3", "white");
    assert_intensity!(sculpture, "0", "3", 0);
}

#[test]
fn a_wrong_panel_fails_and_shows_the_pattern_again() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.tap("0", "5");

    assert_status!(sculpture, Status::Failure);
    sculpture.advance_ms(250);
    assert_color!(sculpture, "5", "0", "error");

    sculpture.advance(Duration::from_millis(1250));
    assert_status!(sculpture, Status::Ready);
    assert!(is_animating(&sculpture));
    assert_eq!(level(&sculpture), 0);
}

#[test]
fn input_during_the_pattern_is_ignored() {
    let mut sculpture = simon_game();

    sculpture.tap("0", "5");

    assert_status!(sculpture, Status::Ready);
    sculpture.advance_ms(SEQUENCE_TIME);
    sculpture.tap("0", "3");
    sculpture.tap("0", "5");
    sculpture.tap("0", "7");
    assert_status!(sculpture, Status::Success);
}

#[test]
fn presses_on_other_strips_do_not_count() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.tap("1", "2");

    assert_status!(sculpture, Status::Ready);
}

#[test]
fn idle_players_see_the_pattern_again() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.advance_ms(4999);
    assert!(!is_animating(&sculpture));
    sculpture.advance_ms(1);
    assert!(is_animating(&sculpture));
}

#[test]
fn started_input_times_out_into_a_replay() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture.tap("0", "3");
    // the idle replay is cancelled once input starts
    sculpture.advance_ms(5000);
    assert!(!is_animating(&sculpture));

    sculpture.advance_ms(5000);
    assert!(is_animating(&sculpture));

    // progress was discarded: the pattern starts over
    sculpture.advance_ms(SEQUENCE_TIME);
    sculpture.tap("0", "5");
    assert_status!(sculpture, Status::Failure);
}

#[test]
fn steps_with_several_panels_need_all_of_them() {
    let mut config = SculptureConfig::for_user("sculpture0");
    config.simon_game.levels = vec![SimonLevel::new("2", &[&["1", "4"], &["8"]], None)];
    let mut sculpture = simon_game_with(config);
    sculpture.advance_ms(3 * 500);

    sculpture.tap("2", "4");
    sculpture.tap("2", "1");
    assert_status!(sculpture, Status::Ready);
    sculpture.tap("2", "8");

    assert_status!(sculpture, Status::Success);
}

#[test]
fn the_last_level_moves_to_the_next_game() {
    let mut config = SculptureConfig::for_user("sculpture0");
    config.simon_game.levels = vec![SimonLevel::new("0", &[&["3"]], None)];
    let mut sculpture = simon_game_with(config);
    sculpture.advance_ms(2 * 500);

    sculpture.tap("0", "3");
    let game = sculpture.store().active_game().unwrap();
    assert!(game.logic().is_complete());

    sculpture.finish_status_animation();
    assert_status!(sculpture, Status::Ready);
    assert!(!is_animating(&sculpture));

    sculpture.advance_ms(9999);
    assert!(sculpture.store().is_playing(Game::Simon));
    sculpture.advance_ms(1);
    assert_eq!(sculpture.current_game(), Some(Game::Handshake));
    assert!(!sculpture.store().active_game().unwrap().logic().is_complete());
}

#[test]
fn merged_final_level_completes_the_game() {
    let mut sculpture = simon_game();
    sculpture.advance_ms(SEQUENCE_TIME);

    sculpture
        .dispatch(merge_from("sculpture1", json!({"simon": {"level": 3}})))
        .unwrap();
    assert!(sculpture.store().active_game().unwrap().logic().is_complete());

    assert_eq!(
        sculpture.dispatch(Action::panel_pressed("0", "4", true)),
        Ok(())
    );
    sculpture.release("0", "4");
    assert_status!(sculpture, Status::Ready);

    // no replays once complete; the peer that won moves everyone on
    sculpture.advance_ms(10_000);
    assert!(!is_animating(&sculpture));
    assert_eq!(sculpture.current_game(), Some(Game::Simon));
}
