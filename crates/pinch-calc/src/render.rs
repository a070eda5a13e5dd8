//! Frame rendering onto an abstract drawing surface
//!
//! Draw order: background, calculator icon, display box, expression,
//! angle-mode badge, buttons, hover highlight, pinch guides.

use serde::Serialize;
use thiserror::Error;

use crate::grid::{ButtonGrid, ButtonSpec, Point, Rect};
use crate::gesture::FrameOutcome;
use crate::state::CalculatorState;

/// Height of the band above the grid holding the icon and display
pub const DISPLAY_HEIGHT: f64 = 120.0;

/// Approximate advance of one glyph at text scale 1.0
pub const GLYPH_WIDTH: f64 = 20.0;

const MARGIN: f64 = 20.0;
const ICON_SIZE: f64 = 80.0;
const BUTTON_TEXT_SCALE: f64 = 0.8;
const DISPLAY_TEXT_SCALE: f64 = 1.0;
const BADGE_TEXT_SCALE: f64 = 0.7;
const INDEX_MARKER_RADIUS: f64 = 10.0;

/// Surface failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend refused a primitive
    #[error("surface error: {0}")]
    Surface(String),
}

/// Result type for drawing
pub type RenderResult<T> = Result<T, RenderError>;

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Button face
    pub const BUTTON: Self = Self::rgb(30, 30, 30);
    /// Button face under a pinch
    pub const BUTTON_HOVER: Self = Self::rgb(50, 50, 50);
    /// Button and display borders
    pub const BORDER: Self = Self::rgb(100, 100, 100);
    /// Expression text
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Angle-mode badge and index marker
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Thumb-index line
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Creates a colour from components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a text position is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Position is the start of the baseline
    Left,
    /// Position is the centre of the text box
    Center,
}

/// Drawing backend
pub trait Surface {
    /// Called before the first primitive of each frame
    fn begin_frame(&mut self) {}

    /// Outlines a rectangle
    fn rect(&mut self, rect: Rect, color: Color, thickness: f64) -> RenderResult<()>;

    /// Fills a rectangle
    fn filled_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()>;

    /// Draws text
    fn text(
        &mut self,
        text: &str,
        at: Point,
        anchor: Anchor,
        scale: f64,
        color: Color,
    ) -> RenderResult<()>;

    /// Draws a line segment
    fn line(&mut self, from: Point, to: Point, color: Color, thickness: f64) -> RenderResult<()>;

    /// Draws a filled circle
    fn circle(&mut self, center: Point, radius: f64, color: Color) -> RenderResult<()>;

    /// Width of `text` at `scale`
    fn measure_text(&self, text: &str, scale: f64) -> f64 {
        text.chars().count() as f64 * GLYPH_WIDTH * scale
    }
}

/// One recorded drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Outlined rectangle
    Rect {
        /// Bounds
        rect: Rect,
        /// Stroke colour
        color: Color,
        /// Stroke width
        thickness: f64,
    },
    /// Filled rectangle
    FilledRect {
        /// Bounds
        rect: Rect,
        /// Fill colour
        color: Color,
    },
    /// Text run
    Text {
        /// Content
        text: String,
        /// Position
        at: Point,
        /// Position interpretation
        anchor: Anchor,
        /// Font scale
        scale: f64,
        /// Colour
        color: Color,
    },
    /// Line segment
    Line {
        /// Start
        from: Point,
        /// End
        to: Point,
        /// Colour
        color: Color,
        /// Stroke width
        thickness: f64,
    },
    /// Filled circle
    Circle {
        /// Centre
        center: Point,
        /// Radius
        radius: f64,
        /// Colour
        color: Color,
    },
}

/// Surface that keeps the primitives of the latest frame
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recording
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded primitives in draw order
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded primitives, leaving the surface empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Texts drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn rect(&mut self, rect: Rect, color: Color, thickness: f64) -> RenderResult<()> {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            thickness,
        });
        Ok(())
    }

    fn filled_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        self.commands.push(DrawCommand::FilledRect { rect, color });
        Ok(())
    }

    fn text(
        &mut self,
        text: &str,
        at: Point,
        anchor: Anchor,
        scale: f64,
        color: Color,
    ) -> RenderResult<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            anchor,
            scale,
            color,
        });
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, color: Color, thickness: f64) -> RenderResult<()> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f64, color: Color) -> RenderResult<()> {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }
}

/// Everything one frame shows
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Calculator to display
    pub state: &'a CalculatorState,
    /// Grid to draw
    pub grid: &'a ButtonGrid,
    /// What the bridge saw this frame
    pub outcome: &'a FrameOutcome,
    /// Frame width in pixels
    pub width: f64,
    /// Frame height in pixels
    pub height: f64,
}

/// Draws one frame
pub fn render_frame<S: Surface + ?Sized>(surface: &mut S, view: &FrameView<'_>) -> RenderResult<()> {
    surface.begin_frame();
    surface.filled_rect(Rect::new(0.0, 0.0, view.width, view.height), Color::BLACK)?;
    draw_icon(surface)?;
    draw_display(surface, view)?;
    surface.text(
        view.state.angle_mode().label(),
        Point::new(view.width - 100.0, 40.0),
        Anchor::Left,
        BADGE_TEXT_SCALE,
        Color::YELLOW,
    )?;

    for button in view.grid {
        draw_button(surface, button, Color::BUTTON, Color::BORDER)?;
    }
    if let Some(button) = &view.outcome.hovered {
        draw_button(surface, button, Color::BUTTON_HOVER, Color::WHITE)?;
    }

    if let Some(pinch) = &view.outcome.pinch {
        surface.circle(pinch.index, INDEX_MARKER_RADIUS, Color::YELLOW)?;
        surface.line(pinch.thumb, pinch.index, Color::BLUE, 3.0)?;
    }
    Ok(())
}

fn draw_icon<S: Surface + ?Sized>(surface: &mut S) -> RenderResult<()> {
    let (x, y) = (MARGIN, MARGIN);
    surface.rect(Rect::new(x, y, ICON_SIZE, ICON_SIZE), Color::WHITE, 2.0)?;
    surface.filled_rect(
        Rect::new(x + 10.0, y + 10.0, ICON_SIZE - 20.0, 20.0),
        Color::WHITE,
    )?;
    for k in 0..3 {
        for l in 0..3 {
            let key = Rect::new(
                x + 10.0 + f64::from(l) * 20.0,
                y + 40.0 + f64::from(k) * 15.0,
                10.0,
                5.0,
            );
            surface.filled_rect(key, Color::WHITE)?;
        }
    }
    Ok(())
}

/// Rectangle of the expression display for a frame of `width`
#[must_use]
pub fn display_rect(width: f64) -> Rect {
    let left = MARGIN + ICON_SIZE + MARGIN;
    Rect::new(left, MARGIN, width - MARGIN - left, DISPLAY_HEIGHT - 2.0 * MARGIN)
}

fn draw_display<S: Surface + ?Sized>(surface: &mut S, view: &FrameView<'_>) -> RenderResult<()> {
    let display = display_rect(view.width);
    surface.filled_rect(display, Color::BLACK)?;
    surface.rect(display, Color::BORDER, 2.0)?;

    let expression = view.state.expression();
    let available = display.width - 20.0;
    let natural = surface.measure_text(expression, DISPLAY_TEXT_SCALE);
    let scale = if natural > available {
        available / natural * DISPLAY_TEXT_SCALE * 0.9
    } else {
        DISPLAY_TEXT_SCALE
    };
    surface.text(
        expression,
        Point::new(display.x + 10.0, display.center().y + 10.0),
        Anchor::Left,
        scale,
        Color::GREEN,
    )
}

fn draw_button<S: Surface + ?Sized>(
    surface: &mut S,
    button: &ButtonSpec,
    face: Color,
    border: Color,
) -> RenderResult<()> {
    surface.filled_rect(button.rect, face)?;
    surface.rect(button.rect, border, 2.0)?;
    surface.text(
        button.label,
        button.rect.center(),
        Anchor::Center,
        BUTTON_TEXT_SCALE,
        Color::WHITE,
    )
}
