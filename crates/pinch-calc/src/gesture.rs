//! Gesture-to-click bridge
//!
//! Turns per-frame hand landmarks into button presses. A press fires when
//! the thumb and index tips come closer than the pinch threshold over a
//! real button, and is debounced two ways: holding the pinch on the same
//! button never repeats, and after any press the bridge ignores new presses
//! for a fixed number of frames.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::grid::{ButtonGrid, ButtonSpec, Point};
use crate::state::{Action, CalculatorState};

/// Hand landmark indices
pub mod landmarks {
    #![allow(missing_docs)]

    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Points per hand
    pub const COUNT: usize = 21;
}

/// Landmark construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandmarkError {
    /// A hand must have exactly 21 points
    #[error("expected {expected} hand landmarks, got {actual}")]
    WrongCount {
        /// Required count
        expected: usize,
        /// Count supplied
        actual: usize,
    },
}

/// The 21 landmarks of one detected hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Point; landmarks::COUNT],
}

impl HandLandmarks {
    /// Builds a hand from exactly 21 points
    pub fn from_points(points: &[Point]) -> Result<Self, LandmarkError> {
        let points: [Point; landmarks::COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongCount {
                expected: landmarks::COUNT,
                actual: points.len(),
            })?;
        Ok(Self { points })
    }

    /// Builds a hand whose only meaningful points are the thumb and index
    /// tips; the rest sit at the wrist halfway between them.
    #[must_use]
    pub fn from_tips(thumb_tip: Point, index_tip: Point) -> Self {
        let wrist = Point::new(
            (thumb_tip.x + index_tip.x) / 2.0,
            (thumb_tip.y + index_tip.y) / 2.0,
        );
        let mut points = [wrist; landmarks::COUNT];
        points[landmarks::THUMB_TIP] = thumb_tip;
        points[landmarks::INDEX_FINGER_TIP] = index_tip;
        Self { points }
    }

    /// A closed pinch with both tips on `point`
    #[must_use]
    pub fn pinched_at(point: Point) -> Self {
        Self::from_tips(point, point)
    }

    /// An open hand with the index tip on `point` and the thumb `spread`
    /// pixels below it
    #[must_use]
    pub fn open_at(point: Point, spread: f64) -> Self {
        Self::from_tips(Point::new(point.x, point.y + spread), point)
    }

    /// Returns the landmark at `index`, if in range
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// All points in landmark order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Thumb tip (landmark 4)
    #[must_use]
    pub fn thumb_tip(&self) -> Point {
        self.points[landmarks::THUMB_TIP]
    }

    /// Index finger tip (landmark 8)
    #[must_use]
    pub fn index_tip(&self) -> Point {
        self.points[landmarks::INDEX_FINGER_TIP]
    }

    /// Scales normalized `0..1` coordinates to whole frame pixels
    #[must_use]
    pub fn to_pixels(&self, width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let mut points = self.points;
        for p in &mut points {
            *p = Point::new((p.x * w).trunc(), (p.y * h).trunc());
        }
        Self { points }
    }
}

impl TryFrom<Vec<Point>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::from_points(&points)
    }
}

/// Thumb/index measurement for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PinchEvent {
    /// Thumb tip position
    pub thumb: Point,
    /// Index tip position, the interaction point
    pub index: Point,
    /// Distance between the two tips
    pub distance: f64,
    /// Whether the distance is under the threshold
    pub is_pinching: bool,
}

impl PinchEvent {
    /// Measures a hand against a pinch threshold
    #[must_use]
    pub fn measure(hand: &HandLandmarks, threshold: f64) -> Self {
        let thumb = hand.thumb_tip();
        let index = hand.index_tip();
        let distance = thumb.distance(index);
        Self {
            thumb,
            index,
            distance,
            is_pinching: distance < threshold,
        }
    }
}

/// Tunables for pinch detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Tip distance, in pixels, under which the hand counts as pinching
    pub pinch_threshold: f64,
    /// Frames to ignore new presses after a press
    pub cooldown_frames: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 50.0,
            cooldown_frames: 20,
        }
    }
}

impl GestureConfig {
    /// Sets the pinch threshold
    #[must_use]
    pub const fn with_pinch_threshold(mut self, threshold: f64) -> Self {
        self.pinch_threshold = threshold;
        self
    }

    /// Sets the cooldown length
    #[must_use]
    pub const fn with_cooldown_frames(mut self, frames: u32) -> Self {
        self.cooldown_frames = frames;
        self
    }
}

/// Where the debouncer is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebouncePhase {
    /// Ready for any button
    Idle,
    /// Ready, but the last pressed button is still held
    Held,
    /// Waiting out the cooldown
    Cooldown,
}

/// Same-label and cooldown suppression, ticked once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    previous_label: Option<String>,
    cooldown: u32,
    cooldown_frames: u32,
}

impl Debouncer {
    /// Creates an idle debouncer
    #[must_use]
    pub const fn new(cooldown_frames: u32) -> Self {
        Self {
            previous_label: None,
            cooldown: 0,
            cooldown_frames,
        }
    }

    /// The label of the last accepted press, until the pinch is released
    #[must_use]
    pub fn previous_label(&self) -> Option<&str> {
        self.previous_label.as_deref()
    }

    /// Frames remaining before another press can be accepted
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> DebouncePhase {
        if self.cooldown > 0 {
            DebouncePhase::Cooldown
        } else if self.previous_label.is_some() {
            DebouncePhase::Held
        } else {
            DebouncePhase::Idle
        }
    }

    /// Accepts a press of `label` if it differs from the held label and the
    /// cooldown has elapsed; an accepted press restarts the cooldown.
    pub fn try_accept(&mut self, label: &str) -> bool {
        if self.cooldown > 0 || self.previous_label.as_deref() == Some(label) {
            return false;
        }
        self.previous_label = Some(label.to_string());
        self.cooldown = self.cooldown_frames;
        true
    }

    /// Forgets the held label (the pinch opened)
    pub fn release(&mut self) {
        self.previous_label = None;
    }

    /// Advances one frame
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

/// What the bridge saw and did in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameOutcome {
    /// Measurement of the first hand, if a hand was detected
    pub pinch: Option<PinchEvent>,
    /// Button under a pinching index tip
    pub hovered: Option<ButtonSpec>,
    /// Action performed this frame
    pub dispatched: Option<Action>,
}

impl FrameOutcome {
    /// Label of the dispatched button
    #[must_use]
    pub fn dispatched_label(&self) -> Option<&'static str> {
        self.dispatched.as_ref()?;
        self.hovered.as_ref().map(|b| b.label)
    }
}

/// Feeds hand landmarks into a calculator
#[derive(Debug, Clone)]
pub struct GestureBridge {
    grid: ButtonGrid,
    config: GestureConfig,
    debouncer: Debouncer,
}

impl Default for GestureBridge {
    fn default() -> Self {
        Self::new(ButtonGrid::new(), GestureConfig::default())
    }
}

impl GestureBridge {
    /// Creates a bridge over `grid`
    #[must_use]
    pub fn new(grid: ButtonGrid, config: GestureConfig) -> Self {
        Self {
            grid,
            debouncer: Debouncer::new(config.cooldown_frames),
            config,
        }
    }

    /// Returns the button grid
    #[must_use]
    pub fn grid(&self) -> &ButtonGrid {
        &self.grid
    }

    /// Returns the gesture configuration
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Returns the debouncer
    #[must_use]
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Processes one frame of detected hands (pixel coordinates).
    ///
    /// Only the first hand is considered. A frame without hands leaves the
    /// held label alone; the cooldown ticks on every frame regardless.
    pub fn process_frame(
        &mut self,
        hands: &[HandLandmarks],
        state: &mut CalculatorState,
    ) -> FrameOutcome {
        let outcome = hands
            .first()
            .map(|hand| self.process_hand(hand, state))
            .unwrap_or_default();
        self.debouncer.tick();
        outcome
    }

    fn process_hand(&mut self, hand: &HandLandmarks, state: &mut CalculatorState) -> FrameOutcome {
        let pinch = PinchEvent::measure(hand, self.config.pinch_threshold);
        if !pinch.is_pinching {
            self.debouncer.release();
            return FrameOutcome {
                pinch: Some(pinch),
                ..FrameOutcome::default()
            };
        }

        let Some(button) = self
            .grid
            .hit_test(pinch.index)
            .filter(|b| !b.is_placeholder())
            .cloned()
        else {
            return FrameOutcome {
                pinch: Some(pinch),
                ..FrameOutcome::default()
            };
        };

        let dispatched = if self.debouncer.try_accept(button.label) {
            let action = state.press(button.label);
            debug!(label = button.label, expression = state.expression(), "pinch dispatched");
            action
        } else {
            None
        };

        FrameOutcome {
            pinch: Some(pinch),
            hovered: Some(button),
            dispatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_of(bridge: &GestureBridge, label: &str) -> Point {
        bridge.grid().find(label).unwrap().rect.center()
    }

    fn pinch(bridge: &GestureBridge, label: &str) -> Vec<HandLandmarks> {
        vec![HandLandmarks::pinched_at(center_of(bridge, label))]
    }

    fn open(bridge: &GestureBridge, label: &str) -> Vec<HandLandmarks> {
        vec![HandLandmarks::open_at(center_of(bridge, label), 200.0)]
    }

    // ===== Landmarks =====

    #[test]
    fn test_from_points_requires_21() {
        let err = HandLandmarks::from_points(&[Point::default(); 20]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::WrongCount {
                expected: 21,
                actual: 20
            }
        );
        assert_eq!(err.to_string(), "expected 21 hand landmarks, got 20");
        assert!(HandLandmarks::try_from(vec![Point::default(); 21]).is_ok());
    }

    #[test]
    fn test_tips() {
        let mut points = vec![Point::default(); 21];
        points[4] = Point::new(1.0, 2.0);
        points[8] = Point::new(3.0, 4.0);
        let hand = HandLandmarks::from_points(&points).unwrap();
        assert_eq!(hand.thumb_tip(), Point::new(1.0, 2.0));
        assert_eq!(hand.index_tip(), Point::new(3.0, 4.0));
        assert_eq!(hand.get(landmarks::PINKY_TIP), Some(Point::default()));
        assert_eq!(hand.get(21), None);
    }

    #[test]
    fn test_to_pixels_truncates() {
        let hand = HandLandmarks::from_tips(Point::new(0.5, 0.25), Point::new(0.1119, 0.999));
        let px = hand.to_pixels(900, 700);
        assert_eq!(px.thumb_tip(), Point::new(450.0, 175.0));
        assert_eq!(px.index_tip(), Point::new(100.0, 699.0));
    }

    // ===== Pinch measurement =====

    #[test]
    fn test_pinch_threshold_is_strict() {
        let hand = HandLandmarks::from_tips(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert!(!PinchEvent::measure(&hand, 50.0).is_pinching);
        assert!(PinchEvent::measure(&hand, 50.1).is_pinching);
        assert_eq!(PinchEvent::measure(&hand, 50.0).distance, 50.0);
    }

    // ===== Debouncer =====

    #[test]
    fn test_debouncer_phases() {
        let mut d = Debouncer::new(2);
        assert_eq!(d.phase(), DebouncePhase::Idle);
        assert!(d.try_accept("1"));
        assert_eq!(d.phase(), DebouncePhase::Cooldown);
        d.tick();
        d.tick();
        assert_eq!(d.phase(), DebouncePhase::Held);
        assert!(!d.try_accept("1"));
        d.release();
        assert_eq!(d.phase(), DebouncePhase::Idle);
        assert!(d.try_accept("1"));
    }

    #[test]
    fn test_debouncer_cooldown_blocks_other_labels() {
        let mut d = Debouncer::new(1);
        assert!(d.try_accept("1"));
        assert!(!d.try_accept("2"));
        d.tick();
        assert!(d.try_accept("2"));
        assert_eq!(d.previous_label(), Some("2"));
    }

    #[test]
    fn test_debouncer_tick_floors_at_zero() {
        let mut d = Debouncer::new(0);
        d.tick();
        assert_eq!(d.cooldown(), 0);
        assert!(d.try_accept("x"));
        assert_eq!(d.cooldown(), 0);
    }

    // ===== Bridge =====

    #[test]
    fn test_pinch_dispatches() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        let hands = pinch(&bridge, "7");
        let outcome = bridge.process_frame(&hands, &mut state);
        assert_eq!(outcome.dispatched, Some(Action::Insert("7".into())));
        assert_eq!(outcome.dispatched_label(), Some("7"));
        assert_eq!(state.expression(), "7");
        assert_eq!(bridge.debouncer().cooldown(), 19);
    }

    #[test]
    fn test_held_pinch_dispatches_once() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        let hands = pinch(&bridge, "7");
        for _ in 0..100 {
            bridge.process_frame(&hands, &mut state);
        }
        assert_eq!(state.expression(), "7");
    }

    #[test]
    fn test_release_then_repinch_after_cooldown() {
        let mut bridge = GestureBridge::new(
            ButtonGrid::new(),
            GestureConfig::default().with_cooldown_frames(3),
        );
        let mut state = CalculatorState::new();
        let down = pinch(&bridge, "7");
        let up = open(&bridge, "7");

        bridge.process_frame(&down, &mut state);
        bridge.process_frame(&up, &mut state);
        // cooldown still running: 3 -> 2 -> 1
        let outcome = bridge.process_frame(&down, &mut state);
        assert!(outcome.dispatched.is_none());
        assert!(outcome.hovered.is_some());
        bridge.process_frame(&up, &mut state);
        bridge.process_frame(&down, &mut state);
        assert_eq!(state.expression(), "77");
    }

    #[test]
    fn test_sliding_to_new_button_after_cooldown() {
        let mut bridge = GestureBridge::new(
            ButtonGrid::new(),
            GestureConfig::default().with_cooldown_frames(1),
        );
        let mut state = CalculatorState::new();
        bridge.process_frame(&pinch(&bridge, "1"), &mut state);
        bridge.process_frame(&pinch(&bridge, "+"), &mut state);
        bridge.process_frame(&pinch(&bridge, "2"), &mut state);
        bridge.process_frame(&pinch(&bridge, "="), &mut state);
        assert_eq!(state.expression(), "3");
    }

    #[test]
    fn test_no_hand_keeps_previous_label() {
        let mut bridge = GestureBridge::new(
            ButtonGrid::new(),
            GestureConfig::default().with_cooldown_frames(1),
        );
        let mut state = CalculatorState::new();
        let down = pinch(&bridge, "5");
        bridge.process_frame(&down, &mut state);
        let outcome = bridge.process_frame(&[], &mut state);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(bridge.debouncer().previous_label(), Some("5"));
        bridge.process_frame(&down, &mut state);
        assert_eq!(state.expression(), "5");
    }

    #[test]
    fn test_open_hand_releases() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        bridge.process_frame(&pinch(&bridge, "5"), &mut state);
        let outcome = bridge.process_frame(&open(&bridge, "5"), &mut state);
        assert!(outcome.pinch.is_some_and(|p| !p.is_pinching));
        assert!(outcome.hovered.is_none());
        assert_eq!(bridge.debouncer().previous_label(), None);
    }

    #[test]
    fn test_pinch_over_placeholder_or_gap_does_nothing() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        let placeholder = bridge.grid().geometry().cell(5, 7).center();
        let outcome =
            bridge.process_frame(&[HandLandmarks::pinched_at(placeholder)], &mut state);
        assert!(outcome.hovered.is_none());
        assert!(outcome.dispatched.is_none());

        let gap = Point::new(115.0, 180.0);
        bridge.process_frame(&[HandLandmarks::pinched_at(gap)], &mut state);
        assert_eq!(state.expression(), "");
        assert_eq!(bridge.debouncer().phase(), DebouncePhase::Idle);
    }

    #[test]
    fn test_only_first_hand_counts() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        let hands = vec![
            HandLandmarks::open_at(center_of(&bridge, "1"), 200.0),
            HandLandmarks::pinched_at(center_of(&bridge, "2")),
        ];
        let outcome = bridge.process_frame(&hands, &mut state);
        assert!(outcome.dispatched.is_none());
        assert_eq!(state.expression(), "");
    }

    #[test]
    fn test_cooldown_ticks_without_hands() {
        let mut bridge = GestureBridge::default();
        let mut state = CalculatorState::new();
        bridge.process_frame(&pinch(&bridge, "9"), &mut state);
        for _ in 0..19 {
            bridge.process_frame(&[], &mut state);
        }
        assert_eq!(bridge.debouncer().cooldown(), 0);
        assert_eq!(bridge.debouncer().phase(), DebouncePhase::Held);
    }
}
