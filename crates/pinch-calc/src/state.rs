//! Calculator state and the label dispatch table
//!
//! The expression field holds either in-progress input or one of the
//! [`Sentinel`] strings; every mutation below keeps it that way.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{evaluate, format_float, parse_float, AngleMode, Sentinel};

/// What pressing a button does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "token", rename_all = "snake_case")]
pub enum Action {
    /// Append the label text to the expression
    Insert(String),
    /// Evaluate the expression in place
    Equals,
    /// Empty the expression (`C` and `CLR`)
    Clear,
    /// Remove the last character (`CE`)
    Backspace,
    /// Add the displayed number to memory (`M+`)
    MemoryAdd,
    /// Subtract the displayed number from memory (`M-`)
    MemorySubtract,
    /// Show the memory value (`MR`)
    MemoryRecall,
    /// Zero the memory (`MC`)
    MemoryClear,
    /// Switch between radians and degrees (`DEG/RAD`)
    ToggleAngleMode,
}

impl Action {
    /// Maps a button label to its action. Empty labels map to nothing.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let action = match label {
            "" => return None,
            "=" => Self::Equals,
            "C" | "CLR" => Self::Clear,
            "CE" => Self::Backspace,
            "M+" => Self::MemoryAdd,
            "M-" => Self::MemorySubtract,
            "MR" => Self::MemoryRecall,
            "MC" => Self::MemoryClear,
            "DEG/RAD" => Self::ToggleAngleMode,
            token => Self::Insert(token.to_string()),
        };
        Some(action)
    }

    /// Returns true if this action only appends text
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }
}

/// Calculator application state
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// Current display text
    expression: String,
    /// Memory register, kept across clears
    memory: f64,
    /// Trig interpretation
    angle_mode: AngleMode,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Creates a calculator with an empty display, zero memory, radians
    #[must_use]
    pub fn new() -> Self {
        Self {
            expression: String::new(),
            memory: 0.0,
            angle_mode: AngleMode::Radians,
        }
    }

    /// Returns the display text
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the memory register
    #[must_use]
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Returns the angle mode
    #[must_use]
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Returns the sentinel currently on display, if any
    #[must_use]
    pub fn error_state(&self) -> Option<Sentinel> {
        Sentinel::from_display(&self.expression)
    }

    /// Returns true if the display holds an error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_state().is_some()
    }

    /// Sets the display text directly (for testing)
    pub fn set_expression(&mut self, expression: &str) {
        self.expression = expression.to_string();
    }

    /// Appends a token, or replaces the display if it holds an error
    pub fn insert(&mut self, token: &str) {
        if self.is_error() {
            self.expression = token.to_string();
        } else {
            self.expression.push_str(token);
        }
    }

    /// Empties the display
    pub fn clear(&mut self) {
        self.expression.clear();
    }

    /// Removes the last character; an error display is cleared outright
    pub fn backspace(&mut self) {
        if self.is_error() {
            self.clear();
        } else {
            self.expression.pop();
        }
    }

    /// Replaces the display with its evaluated result
    pub fn equals(&mut self) {
        self.expression = evaluate(&self.expression, self.angle_mode);
    }

    /// Adds the displayed number to memory
    pub fn memory_add(&mut self) {
        self.update_memory(1.0);
    }

    /// Subtracts the displayed number from memory
    pub fn memory_subtract(&mut self) {
        self.update_memory(-1.0);
    }

    fn update_memory(&mut self, sign: f64) {
        match parse_float(&self.expression) {
            Some(value) => {
                self.memory += sign * value;
                self.expression.clear();
            }
            None => self.expression = Sentinel::Error.as_str().to_string(),
        }
    }

    /// Shows the memory value
    pub fn memory_recall(&mut self) {
        self.expression = format_float(self.memory);
    }

    /// Zeroes memory and empties the display
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
        self.expression.clear();
    }

    /// Flips the angle mode; pending input is discarded
    pub fn toggle_angle_mode(&mut self) {
        self.angle_mode = self.angle_mode.toggled();
        self.expression.clear();
    }

    /// Performs an action
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Insert(token) => self.insert(token),
            Action::Equals => self.equals(),
            Action::Clear => self.clear(),
            Action::Backspace => self.backspace(),
            Action::MemoryAdd => self.memory_add(),
            Action::MemorySubtract => self.memory_subtract(),
            Action::MemoryRecall => self.memory_recall(),
            Action::MemoryClear => self.memory_clear(),
            Action::ToggleAngleMode => self.toggle_angle_mode(),
        }
        debug!(
            ?action,
            expression = %self.expression,
            memory = self.memory,
            mode = %self.angle_mode,
            "calculator updated"
        );
    }

    /// Presses the button with this label; returns the action taken
    pub fn press(&mut self, label: &str) -> Option<Action> {
        let action = Action::from_label(label)?;
        self.apply(&action);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(expression: &str) -> CalculatorState {
        let mut state = CalculatorState::new();
        state.set_expression(expression);
        state
    }

    // ===== Dispatch table =====

    #[test]
    fn test_action_from_label() {
        assert_eq!(Action::from_label("="), Some(Action::Equals));
        assert_eq!(Action::from_label("C"), Some(Action::Clear));
        assert_eq!(Action::from_label("CLR"), Some(Action::Clear));
        assert_eq!(Action::from_label("CE"), Some(Action::Backspace));
        assert_eq!(Action::from_label("M+"), Some(Action::MemoryAdd));
        assert_eq!(Action::from_label("M-"), Some(Action::MemorySubtract));
        assert_eq!(Action::from_label("MR"), Some(Action::MemoryRecall));
        assert_eq!(Action::from_label("MC"), Some(Action::MemoryClear));
        assert_eq!(
            Action::from_label("DEG/RAD"),
            Some(Action::ToggleAngleMode)
        );
        assert_eq!(Action::from_label(""), None);
    }

    #[test]
    fn test_action_inserts() {
        for label in ["7", ".", "+", "(", "sqrt(", "pi", "2pi", "x^y", "%"] {
            let action = Action::from_label(label).unwrap();
            assert!(action.is_insert());
            assert_eq!(action, Action::Insert(label.to_string()));
        }
    }

    #[test]
    fn test_action_serde_shape() {
        let json = serde_json::to_string(&Action::Insert("7".into())).unwrap();
        assert_eq!(json, r#"{"action":"insert","token":"7"}"#);
        let json = serde_json::to_string(&Action::MemoryAdd).unwrap();
        assert_eq!(json, r#"{"action":"memory_add"}"#);
    }

    // ===== Lifecycle =====

    #[test]
    fn test_new_state() {
        let state = CalculatorState::default();
        assert_eq!(state.expression(), "");
        assert_eq!(state.memory(), 0.0);
        assert_eq!(state.angle_mode(), AngleMode::Radians);
        assert!(!state.is_error());
    }

    // ===== insert =====

    #[test]
    fn test_insert_appends() {
        let mut state = CalculatorState::new();
        state.insert("1");
        state.insert("+");
        state.insert("sqrt(");
        assert_eq!(state.expression(), "1+sqrt(");
    }

    #[test]
    fn test_insert_replaces_every_sentinel() {
        for sentinel in Sentinel::ALL {
            let mut state = state_with(sentinel.as_str());
            assert_eq!(state.error_state(), Some(sentinel));
            state.insert("7");
            assert_eq!(state.expression(), "7");
        }
    }

    #[test]
    fn test_insert_appends_after_inf() {
        let mut state = state_with("inf");
        state.insert("5");
        assert_eq!(state.expression(), "inf5");
    }

    // ===== clear / backspace =====

    #[test]
    fn test_clear() {
        let mut state = state_with("12+3");
        state.clear();
        assert_eq!(state.expression(), "");
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let mut state = state_with("12");
        state.backspace();
        assert_eq!(state.expression(), "1");
    }

    #[test]
    fn test_backspace_on_empty() {
        let mut state = CalculatorState::new();
        state.backspace();
        assert_eq!(state.expression(), "");
    }

    #[test]
    fn test_backspace_clears_sentinels() {
        for sentinel in Sentinel::ALL {
            let mut state = state_with(sentinel.as_str());
            state.backspace();
            assert_eq!(state.expression(), "", "backspace on {sentinel}");
        }
    }

    #[test]
    fn test_backspace_strips_one_char_of_function_prefix() {
        let mut state = state_with("sin(");
        state.backspace();
        assert_eq!(state.expression(), "sin");
    }

    // ===== equals =====

    #[test]
    fn test_equals_evaluates() {
        let mut state = state_with("6*7");
        state.equals();
        assert_eq!(state.expression(), "42");
    }

    #[test]
    fn test_equals_uses_angle_mode() {
        let mut state = CalculatorState::new();
        state.toggle_angle_mode();
        state.set_expression("sin(90)");
        state.equals();
        assert_eq!(state.expression(), "1.0");
    }

    #[test]
    fn test_equals_error_then_insert_replaces() {
        let mut state = state_with("1/0");
        state.equals();
        assert_eq!(state.expression(), "Div by Zero");
        state.insert("3");
        assert_eq!(state.expression(), "3");
    }

    // ===== memory =====

    #[test]
    fn test_memory_add_and_recall() {
        let mut state = state_with("12.5");
        state.memory_add();
        assert_eq!(state.expression(), "");
        assert_eq!(state.memory(), 12.5);

        state.set_expression("2");
        state.memory_add();
        assert_eq!(state.memory(), 14.5);

        state.memory_recall();
        assert_eq!(state.expression(), "14.5");
    }

    #[test]
    fn test_memory_subtract() {
        let mut state = state_with("4");
        state.memory_subtract();
        assert_eq!(state.memory(), -4.0);
        state.memory_recall();
        assert_eq!(state.expression(), "-4.0");
    }

    #[test]
    fn test_memory_add_unparsable_sets_error() {
        let mut state = state_with("1+2");
        state.memory_add();
        assert_eq!(state.expression(), "Error");
        assert_eq!(state.memory(), 0.0);

        let mut state = CalculatorState::new();
        state.memory_subtract();
        assert_eq!(state.expression(), "Error");
    }

    #[test]
    fn test_memory_recall_initial() {
        let mut state = CalculatorState::new();
        state.memory_recall();
        assert_eq!(state.expression(), "0.0");
    }

    #[test]
    fn test_memory_survives_clear() {
        let mut state = state_with("3");
        state.memory_add();
        state.set_expression("99");
        state.clear();
        assert_eq!(state.memory(), 3.0);
    }

    #[test]
    fn test_memory_clear() {
        let mut state = state_with("3");
        state.memory_add();
        state.set_expression("5");
        state.memory_clear();
        assert_eq!(state.memory(), 0.0);
        assert_eq!(state.expression(), "");
    }

    #[test]
    fn test_memory_accepts_nan_display() {
        let mut state = state_with("nan");
        state.memory_add();
        assert!(state.memory().is_nan());
        state.memory_recall();
        assert_eq!(state.expression(), "nan");
        assert!(state.is_error());
    }

    // ===== angle mode =====

    #[test]
    fn test_toggle_angle_mode_clears() {
        let mut state = state_with("sin(30");
        state.toggle_angle_mode();
        assert_eq!(state.angle_mode(), AngleMode::Degrees);
        assert_eq!(state.expression(), "");
        state.toggle_angle_mode();
        assert_eq!(state.angle_mode(), AngleMode::Radians);
    }

    #[test]
    fn test_toggle_angle_mode_clears_sentinels() {
        for sentinel in Sentinel::ALL {
            let mut state = state_with(sentinel.as_str());
            state.toggle_angle_mode();
            assert_eq!(state.expression(), "");
        }
    }

    // ===== press =====

    #[test]
    fn test_press_sequence() {
        let mut state = CalculatorState::new();
        for label in ["fact(", "5", ")", "="] {
            state.press(label);
        }
        assert_eq!(state.expression(), "120");
    }

    #[test]
    fn test_press_empty_label_is_ignored() {
        let mut state = state_with("1");
        assert_eq!(state.press(""), None);
        assert_eq!(state.expression(), "1");
    }

    #[test]
    fn test_press_returns_action() {
        let mut state = CalculatorState::new();
        assert_eq!(state.press("MC"), Some(Action::MemoryClear));
        assert_eq!(state.press("9"), Some(Action::Insert("9".into())));
    }
}
