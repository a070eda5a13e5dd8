//! Unified calculator driver
//!
//! The same button sequence can be pushed straight into the calculator or
//! played through the gesture bridge as synthetic pinches; the `verify_*`
//! checks below run against either and must agree.

use thiserror::Error;

use crate::core::AngleMode;
use crate::gesture::{GestureBridge, GestureConfig, HandLandmarks};
use crate::grid::ButtonGrid;
use crate::state::CalculatorState;

/// Result type for drivers
pub type DriverResult<T> = Result<T, DriverError>;

/// Driver failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// No button carries this label
    #[error("no button labelled {0:?}")]
    UnknownLabel(String),

    /// A synthetic pinch did not produce a press
    #[error("pinch on {0:?} was not dispatched")]
    NotDispatched(String),
}

/// Abstract calculator interaction
pub trait CalculatorDriver {
    /// Presses one button
    fn press(&mut self, label: &str) -> DriverResult<()>;

    /// Presses buttons in order
    fn press_all(&mut self, labels: &[&str]) -> DriverResult<()> {
        labels.iter().try_for_each(|label| self.press(label))
    }

    /// Current display text
    fn display(&self) -> String;

    /// Current memory value
    fn memory(&self) -> f64;

    /// Current angle mode
    fn angle_mode(&self) -> AngleMode;
}

/// Presses buttons by calling the calculator directly
#[derive(Debug, Clone, Default)]
pub struct DirectDriver {
    grid: ButtonGrid,
    state: CalculatorState,
}

impl DirectDriver {
    /// Creates a driver over a fresh calculator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the underlying calculator
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }
}

impl CalculatorDriver for DirectDriver {
    fn press(&mut self, label: &str) -> DriverResult<()> {
        let button = self
            .grid
            .find(label)
            .ok_or_else(|| DriverError::UnknownLabel(label.to_string()))?;
        self.state.press(button.label);
        Ok(())
    }

    fn display(&self) -> String {
        self.state.expression().to_string()
    }

    fn memory(&self) -> f64 {
        self.state.memory()
    }

    fn angle_mode(&self) -> AngleMode {
        self.state.angle_mode()
    }
}

/// Presses buttons with synthetic pinch frames through a [`GestureBridge`]
#[derive(Debug, Clone)]
pub struct GestureDriver {
    bridge: GestureBridge,
    state: CalculatorState,
    frames: usize,
}

impl Default for GestureDriver {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureDriver {
    /// Creates a driver with the given gesture tunables
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            bridge: GestureBridge::new(ButtonGrid::new(), config),
            state: CalculatorState::new(),
            frames: 0,
        }
    }

    /// Frames fed to the bridge so far
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    fn frame(&mut self, hands: &[HandLandmarks]) -> bool {
        self.frames += 1;
        self.bridge
            .process_frame(hands, &mut self.state)
            .dispatched
            .is_some()
    }
}

impl CalculatorDriver for GestureDriver {
    /// Pinch on the button, open the hand, then idle out the cooldown
    fn press(&mut self, label: &str) -> DriverResult<()> {
        let target = self
            .bridge
            .grid()
            .find(label)
            .map(|b| b.rect.center())
            .ok_or_else(|| DriverError::UnknownLabel(label.to_string()))?;
        let spread = self.bridge.config().pinch_threshold * 2.0;

        let dispatched = self.frame(&[HandLandmarks::pinched_at(target)]);
        self.frame(&[HandLandmarks::open_at(target, spread)]);
        while self.bridge.debouncer().cooldown() > 0 {
            self.frame(&[]);
        }

        if dispatched {
            Ok(())
        } else {
            Err(DriverError::NotDispatched(label.to_string()))
        }
    }

    fn display(&self) -> String {
        self.state.expression().to_string()
    }

    fn memory(&self) -> f64 {
        self.state.memory()
    }

    fn angle_mode(&self) -> AngleMode {
        self.state.angle_mode()
    }
}

// ===== Shared checks =====
// These run against ANY CalculatorDriver implementation

fn enter<D: CalculatorDriver>(driver: &mut D, labels: &[&str]) -> String {
    assert_eq!(driver.press("C"), Ok(()));
    assert_eq!(driver.press_all(labels), Ok(()));
    driver.display()
}

/// Verifies arithmetic and precedence
pub fn verify_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    assert_eq!(enter(driver, &["2", "+", "3", "*", "4", "="]), "14");
    assert_eq!(enter(driver, &["(", "2", "+", "3", ")", "*", "4", "="]), "20");
    assert_eq!(enter(driver, &["2", "0", "/", "4", "="]), "5.0");
    assert_eq!(enter(driver, &["2", "x^y", "1", "0", "="]), "1024");
    assert_eq!(enter(driver, &["3", "x^2", "="]), "9");
    assert_eq!(enter(driver, &["5", "0", "%", "="]), "0.5");
}

/// Verifies scientific functions in both angle modes
pub fn verify_scientific<D: CalculatorDriver>(driver: &mut D) {
    assert_eq!(enter(driver, &["fact(", "5", ")", "="]), "120");
    assert_eq!(enter(driver, &["sqrt(", "1", "6", ")", "="]), "4.0");
    assert_eq!(enter(driver, &["sin(", "pi", "/", "2", ")", "="]), "1.0");

    assert_eq!(driver.press("DEG/RAD"), Ok(()));
    assert_eq!(driver.angle_mode(), AngleMode::Degrees);
    assert_eq!(enter(driver, &["sin(", "9", "0", ")", "="]), "1.0");
    assert_eq!(enter(driver, &["asin(", "2", ")", "="]), "nan");
    assert_eq!(driver.press("DEG/RAD"), Ok(()));
    assert_eq!(driver.angle_mode(), AngleMode::Radians);
}

/// Verifies error sentinels and recovery from them
pub fn verify_errors<D: CalculatorDriver>(driver: &mut D) {
    assert_eq!(enter(driver, &["1", "/", "0", "="]), "Div by Zero");
    assert_eq!(driver.press("7"), Ok(()));
    assert_eq!(driver.display(), "7");

    assert_eq!(enter(driver, &["sqrt(", "-", "1", ")", "="]), "Domain Error");
    assert_eq!(driver.press("CE"), Ok(()));
    assert_eq!(driver.display(), "");

    assert_eq!(enter(driver, &["ln(", "2", ")", "="]), "Error");
    assert_eq!(enter(driver, &["fact(", "2", ".", "5", ")", "="]), "Error");
}

/// Verifies the memory register
pub fn verify_memory<D: CalculatorDriver>(driver: &mut D) {
    assert_eq!(driver.press_all(&["MC", "1", "2", "M+", "2", "M-"]), Ok(()));
    assert_eq!(driver.memory(), 10.0);
    assert_eq!(driver.display(), "");

    assert_eq!(driver.press("MR"), Ok(()));
    assert_eq!(driver.display(), "10.0");

    assert_eq!(driver.press_all(&["C", "M+"]), Ok(()));
    assert_eq!(driver.display(), "Error");
    assert_eq!(driver.memory(), 10.0);

    assert_eq!(driver.press("MC"), Ok(()));
    assert_eq!(driver.memory(), 0.0);
}

/// Runs every check
pub fn run_full_suite<D: CalculatorDriver>(driver: &mut D) {
    verify_arithmetic(driver);
    verify_scientific(driver);
    verify_errors(driver);
    verify_memory(driver);
}
