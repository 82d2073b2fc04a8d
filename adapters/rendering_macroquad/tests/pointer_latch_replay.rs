use sky_dash_rendering_macroquad::PointerInputState;

fn run_click_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = PointerInputState::default();
    let mut clicks = Vec::new();
    for &pressed in sequence {
        clicks.push(state.take_click());
        if pressed {
            state.register_click();
        }
    }

    // Flush the trailing latch so the harness observes the final click.
    clicks.push(state.take_click());
    clicks
}

fn run_level_sequence(sequence: &[Option<u32>]) -> Vec<Option<u32>> {
    let mut state = PointerInputState::default();
    let mut levels = Vec::new();
    for &choice in sequence {
        levels.push(state.take_level());
        if let Some(level) = choice {
            state.register_level(level);
        }
    }
    levels.push(state.take_level());
    levels
}

#[test]
fn click_sequence_is_deterministic() {
    let click_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_click_sequence(&click_sequence);
    let second_run = run_click_sequence(&click_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn level_clicks_fire_once_on_the_following_frame() {
    let sequence = [Some(2), None, Some(0), Some(1)];
    let expected = vec![None, Some(2), None, Some(0), Some(1)];

    assert_eq!(run_level_sequence(&sequence), expected);
}
