use crate::error::{Result, SimError};
use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 262_144;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SIM_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

pub(crate) fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    Density,
    VelocityX,
    VelocityY,
    Untyped,
}

/// A square `N x N` field surrounded by a one-cell ghost border.
///
/// Storage is `(N+2)^2` elements, row-major with stride `N+2`; cell `(i, j)`
/// lives at `i + (N+2) * j`. Valid indices are `0..=N+1` on both axes and any
/// access outside that range panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2<T> {
    n: usize,
    kind: BoundaryKind,
    data: Vec<T>,
}

impl<T: Copy + Default> Grid2<T> {
    pub fn new(n: usize, kind: BoundaryKind) -> Self {
        assert!(n > 0, "resolution must be > 0");
        let data = vec![T::default(); (n + 2) * (n + 2)];
        Self { n, kind, data }
    }

    pub fn from_fn(n: usize, kind: BoundaryKind, f: impl Fn(usize, usize) -> T) -> Self {
        let mut grid = Self::new(n, kind);
        let stride = grid.stride();
        for (idx, value) in grid.data.iter_mut().enumerate() {
            *value = f(idx % stride, idx / stride);
        }
        grid
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn stride(&self) -> usize {
        self.n + 2
    }

    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn idx(&self, i: usize, j: usize) -> usize {
        let last = self.n + 1;
        assert!(
            i <= last && j <= last,
            "cell ({i}, {j}) outside grid of resolution {}",
            self.n
        );
        i + self.stride() * j
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.idx(i, j);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn reset(&mut self) {
        self.fill(T::default());
    }

    pub fn resize(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(SimError::InvalidResolution(n));
        }
        self.n = n;
        self.data = vec![T::default(); (n + 2) * (n + 2)];
        Ok(())
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.assert_same_shape(other);
        assert_eq!(self.kind, other.kind, "grid boundary kind mismatch");
        std::mem::swap(&mut self.data, &mut other.data);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn interior(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let n = self.n;
        (1..=n).flat_map(move |j| (1..=n).map(move |i| (i, j, self.get(i, j))))
    }

    pub fn assert_same_shape<U>(&self, other: &Grid2<U>) {
        assert_eq!(self.n, other.n, "grid resolution mismatch");
    }
}

impl<T: Copy + Default + Send + Sync> Grid2<T> {
    pub fn fill_interior_with_index(&mut self, f: impl Fn(usize, usize) -> T + Sync) {
        self.update_interior_with_index(|i, j, _| f(i, j));
    }

    pub fn update_interior_with_index(&mut self, f: impl Fn(usize, usize, T) -> T + Sync) {
        let n = self.n;
        let stride = self.stride();
        let rows = &mut self.data[stride..stride * (n + 1)];
        let update_row = |(offset, row): (usize, &mut [T])| {
            let j = offset + 1;
            for i in 1..=n {
                row[i] = f(i, j, row[i]);
            }
        };
        if should_parallel(n * n) {
            rows.par_chunks_mut(stride).enumerate().for_each(update_row);
        } else {
            rows.chunks_mut(stride).enumerate().for_each(update_row);
        }
    }
}

impl Grid2<f32> {
    pub fn add_scaled_in_place(&mut self, other: &Self, scale: f32) {
        self.assert_same_shape(other);
        if should_parallel(self.data.len()) {
            self.data
                .par_iter_mut()
                .zip(other.data.par_iter())
                .for_each(|(value, other_value)| *value += other_value * scale);
        } else {
            for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
                *value += other_value * scale;
            }
        }
    }

    pub fn interior_sum(&self) -> f32 {
        self.interior().map(|(_, _, value)| value).sum()
    }

    pub fn interior_abs_sum(&self) -> f32 {
        self.interior().map(|(_, _, value)| value.abs()).sum()
    }

    pub fn interior_max_abs(&self) -> f32 {
        self.interior()
            .map(|(_, _, value)| value.abs())
            .fold(0.0_f32, f32::max)
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self
            .interior()
            .map(|(_, _, value)| value)
            .filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn storage_includes_ghost_border() {
        let grid: Grid2<f32> = Grid2::new(4, BoundaryKind::Density);
        assert_eq!(grid.len(), 36);
        assert_eq!(grid.stride(), 6);
        assert_eq!(grid.idx(0, 0), 0);
        assert_eq!(grid.idx(5, 5), 35);
        assert_eq!(grid.idx(2, 1), 8);
    }

    #[test]
    fn generic_over_element_type() {
        let mut flags: Grid2<bool> = Grid2::new(3, BoundaryKind::Untyped);
        flags.set(2, 3, true);
        assert!(flags.get(2, 3));
        assert!(!flags.get(3, 2));
        let counts = Grid2::from_fn(2, BoundaryKind::Untyped, |i, j| (i * 10 + j) as i32);
        assert_eq!(counts.get(3, 1), 31);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn access_past_border_panics() {
        let grid: Grid2<f32> = Grid2::new(4, BoundaryKind::Density);
        grid.get(6, 0);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn access_does_not_wrap_into_next_row() {
        let grid: Grid2<f32> = Grid2::new(4, BoundaryKind::Density);
        grid.get(6, 1);
    }

    #[test]
    fn reset_zero_fills() {
        let mut grid = Grid2::from_fn(3, BoundaryKind::Density, |i, j| (i + j) as f32);
        grid.reset();
        assert!(grid.as_slice().iter().all(|value| *value == 0.0));
    }

    #[test]
    fn resize_reallocates_and_zeroes() {
        let mut grid: Grid2<f32> = Grid2::new(2, BoundaryKind::VelocityX);
        grid.fill(3.0);
        grid.resize(5).unwrap();
        assert_eq!(grid.n(), 5);
        assert_eq!(grid.len(), 49);
        assert_eq!(grid.kind(), BoundaryKind::VelocityX);
        assert!(grid.as_slice().iter().all(|value| *value == 0.0));
    }

    #[test]
    fn resize_rejects_zero_before_touching_state() {
        let mut grid: Grid2<f32> = Grid2::new(2, BoundaryKind::Density);
        grid.fill(1.5);
        assert_eq!(grid.resize(0), Err(SimError::InvalidResolution(0)));
        assert_eq!(grid.n(), 2);
        assert_close(grid.get(1, 1), 1.5, 0.0);
    }

    #[test]
    fn swap_exchanges_buffers() {
        let mut a: Grid2<f32> = Grid2::new(3, BoundaryKind::Density);
        let mut b: Grid2<f32> = Grid2::new(3, BoundaryKind::Density);
        a.set(1, 1, 7.0);
        b.set(2, 2, 9.0);
        a.swap(&mut b);
        assert_close(a.get(2, 2), 9.0, 0.0);
        assert_close(a.get(1, 1), 0.0, 0.0);
        assert_close(b.get(1, 1), 7.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "resolution mismatch")]
    fn swap_rejects_other_resolution() {
        let mut a: Grid2<f32> = Grid2::new(3, BoundaryKind::Density);
        let mut b: Grid2<f32> = Grid2::new(4, BoundaryKind::Density);
        a.swap(&mut b);
    }

    #[test]
    fn fill_interior_leaves_border_alone() {
        let mut grid: Grid2<f32> = Grid2::new(3, BoundaryKind::Density);
        grid.fill(-1.0);
        grid.fill_interior_with_index(|i, j| (i * 10 + j) as f32);
        assert_close(grid.get(2, 3), 23.0, 0.0);
        assert_close(grid.get(0, 2), -1.0, 0.0);
        assert_close(grid.get(4, 4), -1.0, 0.0);
    }

    #[test]
    fn add_scaled_in_place_covers_border() {
        let mut target: Grid2<f32> = Grid2::new(2, BoundaryKind::Density);
        let mut source: Grid2<f32> = Grid2::new(2, BoundaryKind::Density);
        source.fill(2.0);
        target.add_scaled_in_place(&source, 0.25);
        assert_close(target.get(0, 0), 0.5, 1e-6);
        assert_close(target.get(1, 2), 0.5, 1e-6);
    }

    #[test]
    fn interior_stats_skip_border() {
        let mut grid: Grid2<f32> = Grid2::new(2, BoundaryKind::Density);
        grid.fill(100.0);
        grid.fill_interior_with_index(|i, j| if i == 1 && j == 1 { -3.0 } else { 1.0 });
        assert_close(grid.interior_sum(), 0.0, 1e-6);
        assert_close(grid.interior_abs_sum(), 6.0, 1e-6);
        assert_close(grid.interior_max_abs(), 3.0, 1e-6);
        assert_eq!(grid.min_max(), (-3.0, 1.0));
    }
}
