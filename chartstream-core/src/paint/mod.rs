//! # Paint state machine
//!
//! Replays decoded instructions, in order, onto a [`Surface`]. The painter owns the mutable
//! paint state for exactly one pass: the current point, color, stroke width and clip, plus a
//! LIFO of snapshots pushed by `PushClip` and restored by `PopClip`.
//!
//! | Instruction | State | Surface |
//! |-------------|-------|---------|
//! | SetColor | color | `set_color` |
//! | SetStrokeWidth | stroke width | `set_stroke_width` |
//! | MoveTo | current point | - |
//! | LineTo | current point | `draw_line` |
//! | Polyline, Polygon, StrokeRect, FillRect, DrawText | - | matching draw call |
//! | PushClip | push snapshot, replace clip | `push_clip` |
//! | PopClip | restore snapshot | `pop_clip`, only if a snapshot existed |

mod surface;

pub use surface::Surface;

use crate::{
    color::Argb,
    stream::Instruction,
    util::{Point, Rect},
};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PaintState {
    pub current_point: Point,
    /// Used for strokes, fills and text alike.
    pub color: Argb,
    pub stroke_width: f32,
    /// `None` is unclipped.
    pub clip: Option<Rect>,
}
impl Default for PaintState {
    fn default() -> Self {
        Self {
            current_point: Point::ORIGIN,
            color: Argb::WHITE,
            stroke_width: 1.0,
            clip: None,
        }
    }
}

/// Snapshots pushed by `PushClip`. Charts rarely nest more than a couple deep.
type ClipStack = smallvec::SmallVec<[PaintState; 4]>;

/// Executes instructions against a surface, starting from the default [`PaintState`].
pub struct Painter<S> {
    surface: S,
    state: PaintState,
    stack: ClipStack,
    executed: usize,
}
impl<S: Surface> Painter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: PaintState::default(),
            stack: ClipStack::new(),
            executed: 0,
        }
    }
    #[must_use]
    pub fn state(&self) -> &PaintState {
        &self.state
    }
    /// Number of outstanding `PushClip`s.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
    /// Instructions applied so far.
    #[must_use]
    pub fn executed(&self) -> usize {
        self.executed
    }
    pub fn surface(&self) -> &S {
        &self.surface
    }
    pub fn into_surface(self) -> S {
        if !self.stack.is_empty() {
            log::debug!("pass ended with {} unpopped clips", self.stack.len());
        }
        self.surface
    }
    /// Apply a single instruction.
    pub fn apply(&mut self, instruction: &Instruction) {
        log::trace!("{}: {instruction:?}", instruction.opcode().as_ref());
        let state = &mut self.state;
        match instruction {
            Instruction::SetColor(color) => {
                state.color = *color;
                self.surface.set_color(*color);
            }
            Instruction::SetStrokeWidth(width) => {
                state.stroke_width = *width;
                self.surface.set_stroke_width(*width);
            }
            Instruction::MoveTo(to) => state.current_point = *to,
            Instruction::LineTo(to) => {
                let from = std::mem::replace(&mut state.current_point, *to);
                self.surface.draw_line(from, *to, state);
            }
            Instruction::Polyline(points) => self.surface.draw_polyline(points, state),
            Instruction::StrokeRect(rect) => self.surface.stroke_rect(*rect, state),
            Instruction::FillRect(rect) => self.surface.fill_rect(*rect, state),
            Instruction::Polygon(points) => self.surface.draw_polygon(points, state),
            Instruction::PushClip(rect) => {
                self.stack.push(*state);
                state.clip = Some(*rect);
                self.surface.push_clip(*rect);
            }
            Instruction::PopClip => {
                // Empty stack: defined as a no-op, the surface never sees an unmatched pop.
                if let Some(restored) = self.stack.pop() {
                    *state = restored;
                    self.surface.pop_clip(state);
                }
            }
            Instruction::DrawText { at, text } => self.surface.draw_text(*at, text, state),
        }
        self.executed += 1;
    }
}

/// Replay `instructions` onto `surface` from a fresh paint state, returning how many executed.
pub fn execute<I, S>(instructions: I, surface: S) -> usize
where
    I: IntoIterator<Item = Instruction>,
    S: Surface,
{
    let mut painter = Painter::new(surface);
    for instruction in instructions {
        painter.apply(&instruction);
    }
    let executed = painter.executed();
    painter.into_surface();
    executed
}
