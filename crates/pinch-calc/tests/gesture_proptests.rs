//! Property-based tests for the button grid and the pinch debouncer

use pinch_calc::grid::{COLS, ROWS};
use pinch_calc::prelude::*;
use proptest::prelude::*;

// ===== Strategy definitions =====

fn cell() -> impl Strategy<Value = (usize, usize)> {
    (0..ROWS, 0..COLS)
}

fn real_label() -> impl Strategy<Value = &'static str> {
    let labels: Vec<&'static str> = ButtonGrid::new()
        .iter()
        .filter(|b| !b.is_placeholder())
        .map(|b| b.label)
        .collect();
    proptest::sample::select(labels)
}

/// What the hand does in one frame
#[derive(Debug, Clone)]
enum Gesture {
    NoHand,
    Open(&'static str),
    Pinch(&'static str),
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        1 => Just(Gesture::NoHand),
        2 => real_label().prop_map(Gesture::Open),
        4 => real_label().prop_map(Gesture::Pinch),
    ]
}

fn hands_for(grid: &ButtonGrid, gesture: &Gesture) -> Vec<HandLandmarks> {
    match gesture {
        Gesture::NoHand => vec![],
        Gesture::Open(label) => {
            vec![HandLandmarks::open_at(grid.find(label).unwrap().rect.center(), 120.0)]
        }
        Gesture::Pinch(label) => {
            vec![HandLandmarks::pinched_at(grid.find(label).unwrap().rect.center())]
        }
    }
}

// ===== Grid geometry =====

proptest! {
    #[test]
    fn prop_interior_points_hit_their_cell(
        (row, col) in cell(),
        fx in 0.001f64..0.999,
        fy in 0.001f64..0.999,
    ) {
        let grid = ButtonGrid::new();
        let rect = grid.button_rect(row, col).unwrap();
        let point = Point::new(rect.x + fx * rect.width, rect.y + fy * rect.height);
        let hit = grid.hit_test(point).unwrap();
        prop_assert_eq!((hit.row, hit.col), (row, col));
    }

    #[test]
    fn prop_vertical_gutters_miss((row, col) in cell(), t in 0.0f64..=1.0, fy in 0.0f64..=1.0) {
        let grid = ButtonGrid::new();
        let rect = grid.button_rect(row, col).unwrap();
        let padding = grid.geometry().padding_x;
        let point = Point::new(rect.right() + t * padding, rect.y + fy * rect.height);
        prop_assert!(grid.hit_test(point).is_none());
    }

    #[test]
    fn prop_horizontal_gutters_miss((row, col) in cell(), t in 0.0f64..=1.0, fx in 0.0f64..=1.0) {
        let grid = ButtonGrid::new();
        let rect = grid.button_rect(row, col).unwrap();
        let padding = grid.geometry().padding_y;
        let point = Point::new(rect.x + fx * rect.width, rect.bottom() + t * padding);
        prop_assert!(grid.hit_test(point).is_none());
    }

    #[test]
    fn prop_points_outside_bounds_miss(x in -500.0f64..1500.0, y in -500.0f64..1500.0) {
        let grid = ButtonGrid::new();
        let b = grid.bounds();
        prop_assume!(x <= b.x || x >= b.right() || y <= b.y || y >= b.bottom());
        prop_assert!(grid.hit_test(Point::new(x, y)).is_none());
    }

    #[test]
    fn prop_hit_is_within_returned_rect(x in 0.0f64..900.0, y in 0.0f64..700.0) {
        let grid = ButtonGrid::new();
        if let Some(button) = grid.hit_test(Point::new(x, y)) {
            prop_assert!(button.rect.contains(Point::new(x, y)));
        }
    }
}

// ===== Debouncing =====

proptest! {
    #[test]
    fn prop_held_pinch_dispatches_once(label in real_label(), frames in 1usize..200) {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        let hands = hands_for(bridge.grid(), &Gesture::Pinch(label));
        let dispatched = (0..frames)
            .filter(|_| bridge.process_frame(&hands, &mut state).dispatched.is_some())
            .count();
        prop_assert_eq!(dispatched, 1);
    }

    #[test]
    fn prop_dispatches_respect_cooldown_and_release(
        cooldown in 0u32..30,
        script in prop::collection::vec(gesture(), 1..300),
    ) {
        let mut bridge = GestureBridge::new(
            ButtonGrid::new(),
            GestureConfig::default().with_cooldown_frames(cooldown),
        );
        let grid = bridge.grid().clone();
        let mut state = CalculatorState::new();

        let mut last: Option<(usize, &str)> = None;
        let mut released_since_last = false;
        for (frame, gesture) in script.iter().enumerate() {
            let outcome = bridge.process_frame(&hands_for(&grid, gesture), &mut state);
            prop_assert!(bridge.debouncer().cooldown() < cooldown.max(1));

            if matches!(gesture, Gesture::Open(_)) {
                released_since_last = true;
            }
            let Some(label) = outcome.dispatched_label() else {
                continue;
            };
            prop_assert!(matches!(gesture, Gesture::Pinch(l) if *l == label));
            if let Some((prev_frame, prev_label)) = last {
                prop_assert!(frame - prev_frame >= cooldown.max(1) as usize);
                prop_assert!(released_since_last || prev_label != label);
            }
            last = Some((frame, label));
            released_since_last = false;
        }
    }

    #[test]
    fn prop_every_pinch_dispatches_without_cooldown(
        labels in prop::collection::vec(real_label(), 1..50),
    ) {
        let mut bridge = GestureBridge::new(
            ButtonGrid::new(),
            GestureConfig::default().with_cooldown_frames(0),
        );
        let grid = bridge.grid().clone();
        let mut state = CalculatorState::new();
        let mut count = 0;
        for &label in &labels {
            if bridge
                .process_frame(&hands_for(&grid, &Gesture::Pinch(label)), &mut state)
                .dispatched
                .is_some()
            {
                count += 1;
            }
            bridge.process_frame(&hands_for(&grid, &Gesture::Open(label)), &mut state);
        }
        prop_assert_eq!(count, labels.len());
    }

    #[test]
    fn prop_phase_tracks_debouncer_fields(script in prop::collection::vec(gesture(), 1..100)) {
        let mut bridge = GestureBridge::default();
        let grid = bridge.grid().clone();
        let mut state = CalculatorState::new();
        for gesture in &script {
            bridge.process_frame(&hands_for(&grid, gesture), &mut state);
            let d = bridge.debouncer();
            let expected = if d.cooldown() > 0 {
                DebouncePhase::Cooldown
            } else if d.previous_label().is_some() {
                DebouncePhase::Held
            } else {
                DebouncePhase::Idle
            };
            prop_assert_eq!(d.phase(), expected);
        }
    }
}
