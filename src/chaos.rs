//! Simulation state for the chaos game: the triangle, the seed point and every
//! midpoint generated from them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use speedy2d::dimen::Vector2;

use crate::config::{Config, Pacing};

pub const NUM_VERTICES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

impl From<Vector2<f32>> for Point {
    fn from(v: Vector2<f32>) -> Self {
        Point { x: v.x, y: v.y }
    }
}

impl From<Point> for Vector2<f32> {
    fn from(p: Point) -> Self {
        Vector2::new(p.x, p.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    CollectingVertices,
    CollectingFirstPoint,
    Generating,
    Complete,
}

impl Phase {
    pub fn instructions(self) -> &'static str {
        match self {
            Phase::CollectingVertices => {
                "Click on any three points on the screen to create the vertices for the triangle."
            }
            Phase::CollectingFirstPoint => "Click on a fourth point to start the algorithm.",
            Phase::Generating => "Drawing midpoints...",
            Phase::Complete => "Simulation complete!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Close,
    LeftClick(Point),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct Simulation {
    vertices: Vec<Point>,
    seed_point: Option<Point>,
    points: Vec<Point>,
    max_points: usize,
    pacing: Pacing,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(config: &Config) -> Simulation {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Simulation {
            vertices: Vec::with_capacity(NUM_VERTICES),
            seed_point: None,
            points: Vec::new(),
            max_points: config.max_points,
            pacing: config.pacing,
            rng,
        }
    }

    /// Derived from counts alone, so it can never move backwards.
    pub fn phase(&self) -> Phase {
        if self.vertices.len() < NUM_VERTICES {
            Phase::CollectingVertices
        } else if self.seed_point.is_none() {
            Phase::CollectingFirstPoint
        } else if self.points.len() < self.max_points {
            Phase::Generating
        } else {
            Phase::Complete
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn seed_point(&self) -> Option<Point> {
        self.seed_point
    }

    /// Generated midpoints, oldest first. Does not include the seed point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn generated(&self) -> usize {
        self.points.len()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn handle(&mut self, input: Input) -> Control {
        match input {
            Input::Close => Control::Exit,
            Input::LeftClick(pos) => {
                self.click(pos);
                Control::Continue
            }
        }
    }

    /// Drains a batch of inputs, stopping at the first one that asks to exit.
    pub fn handle_all<I>(&mut self, inputs: I) -> Control
    where
        I: IntoIterator<Item = Input>,
    {
        for input in inputs {
            if self.handle(input) == Control::Exit {
                return Control::Exit;
            }
        }
        Control::Continue
    }

    fn click(&mut self, pos: Point) {
        match self.phase() {
            Phase::CollectingVertices => {
                self.vertices.push(pos);
                log::info!("vertex {} placed at ({}, {})", self.vertices.len(), pos.x, pos.y);
            }
            Phase::CollectingFirstPoint => {
                self.seed_point = Some(pos);
                log::info!("seed point placed at ({}, {}), generating", pos.x, pos.y);
            }
            Phase::Generating | Phase::Complete => {}
        }
    }

    fn last_point(&self) -> Option<Point> {
        self.points.last().copied().or(self.seed_point)
    }

    /// Appends the midpoint between the last point and `vertices[vertex_index]`.
    pub fn advance_toward(&mut self, vertex_index: usize) -> Option<Point> {
        if self.phase() != Phase::Generating {
            return None;
        }
        let vertex = *self.vertices.get(vertex_index)?;
        let next = vertex.midpoint(self.last_point()?);
        self.points.push(next);
        if self.points.len() == self.max_points {
            log::info!("simulation complete with {} points", self.points.len());
        }
        Some(next)
    }

    /// One chaos-game move toward a uniformly chosen vertex.
    pub fn step(&mut self) -> Option<Point> {
        if self.phase() != Phase::Generating {
            return None;
        }
        let vertex_index = self.rng.gen_range(0..NUM_VERTICES);
        self.advance_toward(vertex_index)
    }

    /// Runs one frame's worth of steps and returns how many points were added.
    pub fn update(&mut self) -> usize {
        if self.phase() != Phase::Generating {
            return 0;
        }
        let remaining = self.max_points - self.points.len();
        let batch = self.pacing.batch(self.points.len()).min(remaining);
        let mut added = 0;
        for _ in 0..batch {
            if self.step().is_none() {
                break;
            }
            added += 1;
        }
        log::debug!("{} total points rendered", self.points.len());
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_sim(config: &Config) -> Simulation {
        let mut sim = Simulation::new(config);
        sim.handle_all([
            Input::LeftClick(Point::new(0.0, 0.0)),
            Input::LeftClick(Point::new(100.0, 0.0)),
            Input::LeftClick(Point::new(50.0, 100.0)),
        ]);
        sim
    }

    #[test]
    fn phases_advance_with_clicks() {
        let config = Config::default().with_seed(1);
        let mut sim = Simulation::new(&config);
        assert_eq!(sim.phase(), Phase::CollectingVertices);

        sim.handle(Input::LeftClick(Point::new(0.0, 0.0)));
        sim.handle(Input::LeftClick(Point::new(100.0, 0.0)));
        assert_eq!(sim.phase(), Phase::CollectingVertices);

        sim.handle(Input::LeftClick(Point::new(50.0, 100.0)));
        assert_eq!(sim.phase(), Phase::CollectingFirstPoint);
        assert_eq!(sim.vertices().len(), 3);

        sim.handle(Input::LeftClick(Point::new(10.0, 10.0)));
        assert_eq!(sim.phase(), Phase::Generating);
        assert_eq!(sim.seed_point(), Some(Point::new(10.0, 10.0)));

        assert!(sim.update() > 0);
        assert!(sim.generated() > 0);
    }

    #[test]
    fn clicks_after_seed_are_ignored() {
        let config = Config::default().with_seed(1);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(10.0, 10.0)));
        sim.handle(Input::LeftClick(Point::new(500.0, 500.0)));
        sim.handle(Input::LeftClick(Point::new(600.0, 600.0)));

        assert_eq!(sim.vertices().len(), 3);
        assert_eq!(sim.seed_point(), Some(Point::new(10.0, 10.0)));
        assert!(sim.points().is_empty());
    }

    #[test]
    fn nothing_generated_before_seed() {
        let config = Config::default().with_seed(1);
        let mut sim = triangle_sim(&config);
        assert_eq!(sim.step(), None);
        assert_eq!(sim.update(), 0);
        assert_eq!(sim.advance_toward(0), None);
    }

    #[test]
    fn close_stops_processing() {
        let config = Config::default().with_seed(1);
        let mut sim = Simulation::new(&config);
        let control = sim.handle_all([
            Input::LeftClick(Point::new(1.0, 1.0)),
            Input::Close,
            Input::LeftClick(Point::new(2.0, 2.0)),
        ]);
        assert_eq!(control, Control::Exit);
        assert_eq!(sim.vertices(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn forced_vertex_gives_exact_midpoint() {
        let config = Config::default().with_seed(1);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(0.0, 0.0)));

        assert_eq!(sim.advance_toward(1), Some(Point::new(50.0, 0.0)));
        assert_eq!(sim.points(), &[Point::new(50.0, 0.0)]);
        assert_eq!(sim.advance_toward(3), None);
    }

    #[test]
    fn every_point_is_a_midpoint_toward_a_vertex() {
        let config = Config::default().with_seed(42).with_max_points(2_000);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(13.0, 37.0)));
        while sim.update() > 0 {}

        let mut last = sim.seed_point().unwrap();
        for &p in sim.points() {
            assert!(
                sim.vertices().iter().any(|&v| v.midpoint(last) == p),
                "{:?} is not a midpoint from {:?}",
                p,
                last
            );
            last = p;
        }
    }

    #[test]
    fn cap_is_never_exceeded() {
        let config = Config::default().with_seed(7).with_max_points(5);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(0.0, 0.0)));

        for _ in 0..5 {
            assert!(sim.step().is_some());
        }
        assert_eq!(sim.step(), None);
        assert_eq!(sim.generated(), sim.max_points());
        assert_eq!(sim.phase(), Phase::Complete);
        assert_eq!(sim.update(), 0);
    }

    #[test]
    fn completes_on_the_step_that_fills_the_cap() {
        let config = Config::default().with_seed(7).with_max_points(3);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(0.0, 0.0)));

        assert!(sim.advance_toward(0).is_some());
        assert!(sim.advance_toward(1).is_some());
        assert_eq!(sim.phase(), Phase::Generating);
        assert!(sim.advance_toward(2).is_some());
        assert_eq!(sim.phase(), Phase::Complete);
        assert_eq!(sim.advance_toward(0), None);
        assert_eq!(sim.generated(), 3);
    }

    #[test]
    fn vertex_choice_is_uniform() {
        const STEPS: usize = 6_000;
        let config = Config::default().with_seed(2024);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(13.0, 37.0)));

        let mut hits = [0usize; NUM_VERTICES];
        let mut last = sim.seed_point().unwrap();
        for _ in 0..STEPS {
            let p = sim.step().unwrap();
            let chosen = sim
                .vertices()
                .iter()
                .position(|&v| v.midpoint(last) == p)
                .expect("point is not a midpoint toward any vertex");
            hits[chosen] += 1;
            last = p;
        }

        for (i, &count) in hits.iter().enumerate() {
            let share = count as f64 / STEPS as f64;
            assert!(
                (share - 1.0 / 3.0).abs() < 0.05,
                "vertex {} chosen {} of {} times",
                i,
                count,
                STEPS
            );
        }
    }

    #[test]
    fn batches_clamp_to_cap() {
        let config = Config::default()
            .with_seed(7)
            .with_max_points(1_000)
            .with_pacing(Pacing::Doubling);
        let mut sim = triangle_sim(&config);
        sim.handle(Input::LeftClick(Point::new(0.0, 0.0)));

        let mut frames = 0;
        while sim.phase() == Phase::Generating {
            sim.update();
            assert!(sim.generated() <= 1_000);
            frames += 1;
        }
        assert_eq!(sim.generated(), 1_000);
        assert_eq!(frames, 10);
        sim.handle(Input::LeftClick(Point::new(1.0, 1.0)));
        assert_eq!(sim.generated(), 1_000);
    }

    #[test]
    fn same_seed_same_sequence() {
        let config = Config::default().with_seed(99).with_max_points(500);
        let run = || {
            let mut sim = triangle_sim(&config);
            sim.handle(Input::LeftClick(Point::new(20.0, 30.0)));
            while sim.update() > 0 {}
            sim.points().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn labels_follow_phase() {
        assert!(Phase::CollectingVertices.instructions().contains("three points"));
        assert!(Phase::CollectingFirstPoint.instructions().contains("fourth point"));
        assert_eq!(Phase::Generating.instructions(), "Drawing midpoints...");
        assert_eq!(Phase::Complete.instructions(), "Simulation complete!");
    }
}
