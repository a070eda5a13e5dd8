//! On-screen button grid
//!
//! Forty-eight fixed labels laid out row-major. Each button's rectangle is
//! `origin + index * (size + padding)`; hit testing is strict on all edges,
//! so a point on a border or inside the padding gutter hits nothing.

use serde::{Deserialize, Serialize};

/// Number of grid rows
pub const ROWS: usize = 6;
/// Number of grid columns
pub const COLS: usize = 8;

/// Button labels, row-major. Empty strings are placeholder cells.
pub const LABELS: [[&str; COLS]; ROWS] = [
    ["C", "CE", "sqrt(", "+", "pi", "cos(", "tan(", "sin("],
    ["1", "2", "3", "-", "2pi", "cosh(", "tanh(", "sinh("],
    ["4", "5", "6", "*", "ln(", "asin(", "acos(", "atan("],
    ["7", "8", "9", "/", "log10(", "(", ")", "fact("],
    ["0", ".", "%", "=", "CLR", "x^y", "x^2", "x^3"],
    ["M+", "M-", "MR", "MC", "DEG/RAD", "", "", ""],
];

/// A point in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, growing rightwards
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
}

impl Point {
    /// Creates a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Centre point
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict containment: points on an edge are outside
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.x < point.x && point.x < self.right() && self.y < point.y && point.y < self.bottom()
    }
}

/// Placement and sizing of the grid, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// Left edge of the first column
    pub origin_x: f64,
    /// Top edge of the first row
    pub origin_y: f64,
    /// Button width
    pub button_width: f64,
    /// Button height
    pub button_height: f64,
    /// Horizontal gap between buttons
    pub padding_x: f64,
    /// Vertical gap between buttons
    pub padding_y: f64,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            origin_x: 10.0,
            origin_y: 150.0,
            button_width: 100.0,
            button_height: 60.0,
            padding_x: 10.0,
            padding_y: 10.0,
        }
    }
}

impl GridGeometry {
    /// Sets the top-left corner of the grid
    #[must_use]
    pub const fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Sets the button size
    #[must_use]
    pub const fn with_button_size(mut self, width: f64, height: f64) -> Self {
        self.button_width = width;
        self.button_height = height;
        self
    }

    /// Sets the gap between buttons
    #[must_use]
    pub const fn with_padding(mut self, x: f64, y: f64) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    /// Rectangle of the cell at (row, col); does not check bounds
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.origin_x + col as f64 * (self.button_width + self.padding_x),
            self.origin_y + row as f64 * (self.button_height + self.padding_y),
            self.button_width,
            self.button_height,
        )
    }
}

/// One cell of the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonSpec {
    /// Text shown on the button and dispatched when it is pinched
    pub label: &'static str,
    /// Zero-based row
    pub row: usize,
    /// Zero-based column
    pub col: usize,
    /// Screen rectangle
    pub rect: Rect,
}

impl ButtonSpec {
    /// Placeholder cells carry no action
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.label.is_empty()
    }
}

/// The button grid with resolved rectangles
#[derive(Debug, Clone)]
pub struct ButtonGrid {
    /// Buttons in row-major order
    buttons: Vec<ButtonSpec>,
    geometry: GridGeometry,
}

impl Default for ButtonGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonGrid {
    /// Creates the grid with default geometry
    #[must_use]
    pub fn new() -> Self {
        Self::with_geometry(GridGeometry::default())
    }

    /// Creates the grid with the given geometry
    #[must_use]
    pub fn with_geometry(geometry: GridGeometry) -> Self {
        let buttons = LABELS
            .iter()
            .enumerate()
            .flat_map(|(row, labels)| {
                labels.iter().enumerate().map(move |(col, label)| ButtonSpec {
                    label,
                    row,
                    col,
                    rect: geometry.cell(row, col),
                })
            })
            .collect();
        Self { buttons, geometry }
    }

    /// Returns the geometry in use
    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (ROWS, COLS)
    }

    /// Returns the number of cells, placeholders included
    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Always false; the grid has a fixed set of cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Returns the first button, in row-major order, whose rectangle strictly
    /// contains the point
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&ButtonSpec> {
        self.buttons.iter().find(|b| b.rect.contains(point))
    }

    /// Gets a button by row and column
    #[must_use]
    pub fn button_at(&self, row: usize, col: usize) -> Option<&ButtonSpec> {
        if row < ROWS && col < COLS {
            self.buttons.get(row * COLS + col)
        } else {
            None
        }
    }

    /// Rectangle of the button at (row, col)
    #[must_use]
    pub fn button_rect(&self, row: usize, col: usize) -> Option<Rect> {
        self.button_at(row, col).map(|b| b.rect)
    }

    /// Finds a non-placeholder button by label
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&ButtonSpec> {
        if label.is_empty() {
            return None;
        }
        self.buttons.iter().find(|b| b.label == label)
    }

    /// Iterates over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &ButtonSpec> {
        self.buttons.iter()
    }

    /// Rectangle enclosing every button
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let last = self.geometry.cell(ROWS - 1, COLS - 1);
        Rect::new(
            self.geometry.origin_x,
            self.geometry.origin_y,
            last.right() - self.geometry.origin_x,
            last.bottom() - self.geometry.origin_y,
        )
    }
}

impl<'a> IntoIterator for &'a ButtonGrid {
    type Item = &'a ButtonSpec;
    type IntoIter = std::slice::Iter<'a, ButtonSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.buttons.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Rect tests =====

    #[test]
    fn test_rect_contains_interior() {
        let rect = Rect::new(10.0, 150.0, 100.0, 60.0);
        assert!(rect.contains(Point::new(11.0, 151.0)));
        assert!(rect.contains(rect.center()));
        assert!(rect.contains(Point::new(109.0, 209.0)));
    }

    #[test]
    fn test_rect_edges_are_outside() {
        let rect = Rect::new(10.0, 150.0, 100.0, 60.0);
        assert!(!rect.contains(Point::new(10.0, 180.0)));
        assert!(!rect.contains(Point::new(110.0, 180.0)));
        assert!(!rect.contains(Point::new(60.0, 150.0)));
        assert!(!rect.contains(Point::new(60.0, 210.0)));
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    // ===== Geometry tests =====

    #[test]
    fn test_default_geometry() {
        let g = GridGeometry::default();
        assert_eq!((g.origin_x, g.origin_y), (10.0, 150.0));
        assert_eq!((g.button_width, g.button_height), (100.0, 60.0));
        assert_eq!((g.padding_x, g.padding_y), (10.0, 10.0));
    }

    #[test]
    fn test_geometry_builders() {
        let g = GridGeometry::default()
            .with_origin(0.0, 0.0)
            .with_button_size(50.0, 40.0)
            .with_padding(5.0, 2.0);
        assert_eq!(g.cell(1, 2), Rect::new(110.0, 42.0, 50.0, 40.0));
    }

    #[test]
    fn test_geometry_partial_yaml() {
        let g: GridGeometry = serde_yaml_ng::from_str("button_width: 80\n").unwrap();
        assert_eq!(g.button_width, 80.0);
        assert_eq!(g.origin_y, 150.0);
    }

    // ===== Grid layout =====

    #[test]
    fn test_grid_dimensions() {
        let grid = ButtonGrid::new();
        assert_eq!(grid.dimensions(), (6, 8));
        assert_eq!(grid.len(), 48);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_grid_row_major_order() {
        let grid = ButtonGrid::new();
        let labels: Vec<_> = grid.iter().take(9).map(|b| b.label).collect();
        assert_eq!(
            labels,
            ["C", "CE", "sqrt(", "+", "pi", "cos(", "tan(", "sin(", "1"]
        );
    }

    #[test]
    fn test_button_rect() {
        let grid = ButtonGrid::new();
        assert_eq!(
            grid.button_rect(0, 0),
            Some(Rect::new(10.0, 150.0, 100.0, 60.0))
        );
        assert_eq!(
            grid.button_rect(4, 3),
            Some(Rect::new(340.0, 430.0, 100.0, 60.0))
        );
        assert_eq!(grid.button_rect(6, 0), None);
        assert_eq!(grid.button_rect(0, 8), None);
    }

    #[test]
    fn test_find() {
        let grid = ButtonGrid::new();
        let eq = grid.find("=").unwrap();
        assert_eq!((eq.row, eq.col), (4, 3));
        assert_eq!(grid.find("DEG/RAD").map(|b| (b.row, b.col)), Some((5, 4)));
        assert!(grid.find("").is_none());
        assert!(grid.find("sec(").is_none());
    }

    #[test]
    fn test_placeholders() {
        let grid = ButtonGrid::new();
        let placeholders: Vec<_> = grid
            .iter()
            .filter(|b| b.is_placeholder())
            .map(|b| (b.row, b.col))
            .collect();
        assert_eq!(placeholders, [(5, 5), (5, 6), (5, 7)]);
    }

    #[test]
    fn test_bounds() {
        let grid = ButtonGrid::new();
        assert_eq!(grid.bounds(), Rect::new(10.0, 150.0, 870.0, 410.0));
    }

    // ===== Hit testing =====

    #[test]
    fn test_hit_test_interior() {
        let grid = ButtonGrid::new();
        assert_eq!(grid.hit_test(Point::new(60.0, 180.0)).map(|b| b.label), Some("C"));
        assert_eq!(grid.hit_test(Point::new(390.0, 460.0)).map(|b| b.label), Some("="));
    }

    #[test]
    fn test_hit_test_misses() {
        let grid = ButtonGrid::new();
        // edge
        assert!(grid.hit_test(Point::new(10.0, 180.0)).is_none());
        // gutter between C and CE
        assert!(grid.hit_test(Point::new(115.0, 180.0)).is_none());
        // display area
        assert!(grid.hit_test(Point::new(60.0, 50.0)).is_none());
        // beyond the last column
        assert!(grid.hit_test(Point::new(895.0, 180.0)).is_none());
    }

    #[test]
    fn test_hit_test_placeholder_is_returned() {
        let grid = ButtonGrid::new();
        let cell = grid.hit_test(grid.geometry().cell(5, 6).center()).unwrap();
        assert!(cell.is_placeholder());
    }

    #[test]
    fn test_hit_test_every_center() {
        let grid = ButtonGrid::new();
        for button in &grid {
            let hit = grid.hit_test(button.rect.center()).unwrap();
            assert_eq!((hit.row, hit.col), (button.row, button.col));
        }
    }

    #[test]
    fn test_custom_geometry_hit_test() {
        let grid = ButtonGrid::with_geometry(GridGeometry::default().with_origin(0.0, 0.0));
        assert_eq!(grid.hit_test(Point::new(50.0, 30.0)).map(|b| b.label), Some("C"));
    }
}
