use crate::{Grid2, Vec2};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrowthLaw {
    PerStep { increment: f32 },
    WallClock { rate_per_second: f32 },
}

impl GrowthLaw {
    fn scaled(self, factor: f32) -> Self {
        match self {
            GrowthLaw::PerStep { increment } => GrowthLaw::PerStep {
                increment: increment * factor,
            },
            GrowthLaw::WallClock { rate_per_second } => GrowthLaw::WallClock {
                rate_per_second: rate_per_second * factor,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatConfig {
    pub center: Vec2,
    pub initial_radius: f32,
    pub growth: GrowthLaw,
    pub viscosity_rate: f32,
    pub segments: usize,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.8, 0.8),
            initial_radius: 0.01,
            growth: GrowthLaw::PerStep { increment: 0.0005 },
            viscosity_rate: 0.25,
            segments: 100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeatZone {
    config: HeatConfig,
    radius: f32,
    last_advance: Option<Instant>,
}

impl HeatZone {
    pub fn new(config: HeatConfig) -> Self {
        Self {
            config,
            radius: config.initial_radius,
            last_advance: None,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn center(&self) -> Vec2 {
        self.config.center
    }

    pub fn set_growth(&mut self, growth: GrowthLaw) {
        self.config.growth = growth;
        self.last_advance = None;
    }

    pub fn increase_rate(&mut self) {
        self.config.growth = self.config.growth.scaled(2.0);
    }

    pub fn decrease_rate(&mut self) {
        self.config.growth = self.config.growth.scaled(0.5);
    }

    pub fn reset(&mut self) {
        self.radius = self.config.initial_radius;
        self.last_advance = None;
    }

    pub fn advance(&mut self) {
        match self.config.growth {
            GrowthLaw::PerStep { increment } => self.radius += increment,
            GrowthLaw::WallClock { .. } => {
                let now = Instant::now();
                let elapsed = self
                    .last_advance
                    .map(|last| now.duration_since(last))
                    .unwrap_or_default();
                self.last_advance = Some(now);
                self.advance_by(elapsed);
            }
        }
    }

    pub fn advance_by(&mut self, elapsed: Duration) {
        match self.config.growth {
            GrowthLaw::PerStep { increment } => self.radius += increment,
            GrowthLaw::WallClock { rate_per_second } => {
                self.radius += rate_per_second * elapsed.as_secs_f32();
            }
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.sub(self.config.center).length() < self.radius
    }

    pub fn apply(&self, viscosity: &mut Grid2<f32>) {
        let n = viscosity.n() as f32;
        let rate = self.config.viscosity_rate;
        viscosity.update_interior_with_index(|i, j, value| {
            let point = Vec2::new(i as f32 / n * 2.0 - 1.0, j as f32 / n * 2.0 - 1.0);
            if self.contains(point) {
                (value - rate).max(0.0)
            } else {
                value
            }
        });
    }

    /// Closed loop of `segments + 1` points around the current circle.
    /// Does not advance the zone.
    pub fn boundary_polygon(&self) -> Vec<Vec2> {
        let segments = self.config.segments.max(3);
        (0..=segments)
            .map(|k| {
                let angle = k as f32 * TAU / segments as f32;
                self.config.center.add(Vec2::from_angle(angle, self.radius))
            })
            .collect()
    }
}
