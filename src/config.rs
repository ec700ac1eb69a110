use speedy2d::color::Color;
use std::path::PathBuf;

use crate::chaos::Point;

/// How many midpoints a single frame appends, given how many already exist.
///
/// Only affects how fast the fractal fills in on screen; the resulting point
/// set does not depend on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// `count / 2 + 1` per frame.
    HalfPlusOne,
    /// `count + 1` per frame, so the total roughly doubles every frame.
    Doubling,
    /// A constant number per frame (treated as 1 when zero).
    Fixed(usize),
}

impl Pacing {
    pub fn batch(self, count: usize) -> usize {
        match self {
            Pacing::HalfPlusOne => count / 2 + 1,
            Pacing::Doubling => count.saturating_add(1),
            Pacing::Fixed(n) => n.max(1),
        }
    }
}

/// Everything the run loop needs, handed over once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
    /// Upper bound on generated points (the seed point is not counted).
    pub max_points: usize,
    pub vertex_radius: f32,
    pub point_size: f32,
    pub font_size: f32,
    pub font_path: PathBuf,
    pub label_position: Point,
    pub background_color: Color,
    pub vertex_color: Color,
    pub point_color: Color,
    pub label_color: Color,
    pub pacing: Pacing,
    /// `None` seeds the generator from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            window_width: 1920,
            window_height: 1080,
            title: "Chaos Game!!".to_string(),
            max_points: 100_000,
            vertex_radius: 5.0,
            point_size: 1.0,
            font_size: 20.0,
            font_path: PathBuf::from("KOMIKAP_.ttf"),
            label_position: Point::new(20.0, 20.0),
            background_color: Color::BLACK,
            vertex_color: Color::BLUE,
            point_color: Color::YELLOW,
            label_color: Color::WHITE,
            pacing: Pacing::HalfPlusOne,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}
