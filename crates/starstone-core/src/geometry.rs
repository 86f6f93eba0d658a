use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward).
///
/// Width and height are never negative: constructors clamp them to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RectFields")]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    w: f32,
    h: f32,
}

/// Serialized form of [`Rect`]; deserializing goes through `Rect::new`.
#[derive(Deserialize)]
struct RectFields {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl From<RectFields> for Rect {
    fn from(f: RectFields) -> Self {
        Rect::new(f.x, f.y, f.w, f.h)
    }
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Rectangle whose top-left corner sits at `origin`.
    pub fn at(origin: Vec2, w: f32, h: f32) -> Self {
        Self::new(origin.x, origin.y, w, h)
    }

    pub fn width(&self) -> f32 {
        self.w
    }

    pub fn height(&self) -> f32 {
        self.h
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Grow the rectangle by independent amounts on each side.
    pub fn expanded(&self, left: f32, right: f32, up: f32, down: f32) -> Rect {
        Rect::new(
            self.x - left,
            self.y - up,
            self.w + left + right,
            self.h + up + down,
        )
    }
}

/// Contact side of a collision, seen from the moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Dispatch order used when reporting a frame's contacts.
    pub const DISPATCH_ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Pixel position of the top-left corner of tile `(x, y)`.
pub fn tile_point(x: u32, y: u32, tile_size: f32) -> Vec2 {
    Vec2::new(x as f32 * tile_size, y as f32 * tile_size)
}
