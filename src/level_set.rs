use crate::{BoundaryKind, Grid2, Vec2};
use std::ops::RangeInclusive;
use tracing::trace;

pub const OUTSIDE: f32 = 1.0;
pub const INSIDE: f32 = -1.0;

#[derive(Clone, Debug)]
pub struct LevelSet {
    phi: Grid2<f32>,
    volume: f32,
    volume_prev: f32,
}

impl LevelSet {
    pub fn new(n: usize) -> Self {
        let mut phi = Grid2::new(n, BoundaryKind::Untyped);
        phi.fill(OUTSIDE);
        Self {
            phi,
            volume: 0.0,
            volume_prev: 0.0,
        }
    }

    pub fn n(&self) -> usize {
        self.phi.n()
    }

    pub fn phi(&self) -> &Grid2<f32> {
        &self.phi
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn volume_prev(&self) -> f32 {
        self.volume_prev
    }

    pub fn volume_drift(&self) -> f32 {
        self.volume - self.volume_prev
    }

    pub fn is_liquid(&self, row: usize, col: usize) -> bool {
        self.phi.get(row, col) < 0.0
    }

    pub fn reset(&mut self) {
        self.phi.fill(OUTSIDE);
        self.volume = 0.0;
        self.volume_prev = 0.0;
    }

    pub fn resize(&mut self, n: usize) -> crate::Result<()> {
        self.phi.resize(n)?;
        self.reset();
        Ok(())
    }

    pub fn add_object(&mut self, width: usize, height: usize) {
        let n = self.n();
        let span = |extent: usize| {
            let extent = extent.clamp(1, n);
            let begin = ((n - extent) / 2).max(1);
            begin..=(begin + extent - 1).min(n)
        };
        self.add_region(span(height), span(width));
    }

    pub fn add_region(&mut self, rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) {
        let n = self.n();
        let rows = (*rows.start()).max(1)..=(*rows.end()).min(n);
        for row in rows {
            for col in (*cols.start()).max(1)..=(*cols.end()).min(n) {
                self.phi.set(row, col, INSIDE);
            }
        }
    }

    pub fn marching_squares(&self, row: usize, col: usize) -> Vec<Vec2> {
        let mut vertices = Vec::with_capacity(8);
        self.marching_squares_into(row, col, &mut vertices);
        vertices
    }

    /// Walks the corners `(row, col)`, `(row+1, col)`, `(row+1, col+1)`,
    /// `(row, col+1)` and appends liquid corners and edge zero crossings to
    /// `out`, in order. Vertices are in `[-1, 1]` with `x` along columns and
    /// `y` along rows. Returns the number of vertices written.
    pub fn marching_squares_into(&self, row: usize, col: usize, out: &mut Vec<Vec2>) -> usize {
        out.clear();
        let corners = [(row, col), (row + 1, col), (row + 1, col + 1), (row, col + 1)];
        let dist = corners.map(|(r, c)| self.phi.get(r, c));
        for k in 0..4 {
            let next = (k + 1) % 4;
            if dist[k] < 0.0 {
                out.push(self.corner_position(corners[k]));
            }
            if dist[k] * dist[next] < 0.0 {
                let weight = dist[k] / (dist[k] - dist[next]);
                let p0 = self.corner_position(corners[k]);
                let p1 = self.corner_position(corners[next]);
                out.push(p0.lerp(p1, weight));
            }
        }
        out.len()
    }

    pub fn extract_surface(&mut self) -> f32 {
        self.extract_surface_with(|_, _, _| {})
    }

    pub fn extract_surface_with(&mut self, mut visit: impl FnMut(usize, usize, &[Vec2])) -> f32 {
        let n = self.n();
        let mut vertices = Vec::with_capacity(8);
        let mut volume = 0.0;
        for row in 1..=n {
            for col in 1..=n {
                if self.marching_squares_into(row, col, &mut vertices) == 0 {
                    continue;
                }
                visit(row, col, &vertices);
                volume += polygon_area(&vertices);
            }
        }
        self.volume_prev = self.volume;
        self.volume = volume;
        trace!(volume, drift = self.volume_drift(), "extracted liquid surface");
        volume
    }

    fn corner_position(&self, (row, col): (usize, usize)) -> Vec2 {
        let n = self.n() as f32;
        Vec2::new(col as f32 / n * 2.0 - 1.0, row as f32 / n * 2.0 - 1.0)
    }
}

pub fn polygon_area(vertices: &[Vec2]) -> f32 {
    let count = vertices.len();
    if count < 3 {
        return 0.0;
    }
    let twice: f32 = (0..count)
        .map(|k| {
            let a = vertices[k];
            let b = vertices[(k + 1) % count];
            a.y * b.x - a.x * b.y
        })
        .sum();
    0.5 * twice
}
