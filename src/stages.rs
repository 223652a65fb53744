use crate::{
    boundary::enforce_boundary,
    relax::{relax, relax_variable},
    Grid2,
};

pub fn add_external_forces(target: &mut Grid2<f32>, source: &Grid2<f32>, dt: f32) {
    target.add_scaled_in_place(source, dt);
}

pub fn add_uniform_impulse(target: &mut Grid2<f32>, acceleration: f32, dt: f32) {
    if acceleration == 0.0 || dt == 0.0 {
        return;
    }
    let impulse = acceleration * dt;
    target.update_interior_with_index(|_, _, value| value + impulse);
}

pub fn diffuse(grid: &mut Grid2<f32>, prev: &Grid2<f32>, rate: f32, dt: f32, iterations: usize) {
    let n = grid.n() as f32;
    let a = dt * rate * n * n;
    relax(grid, prev, a, 1.0 + 4.0 * a, iterations);
}

pub fn diffuse_variable(
    grid: &mut Grid2<f32>,
    prev: &Grid2<f32>,
    viscosity: &Grid2<f32>,
    dt: f32,
    iterations: usize,
) {
    let n = grid.n() as f32;
    relax_variable(grid, prev, viscosity, dt * n * n, iterations);
}

pub fn divergence_into(out: &mut Grid2<f32>, x: &Grid2<f32>, y: &Grid2<f32>) {
    out.assert_same_shape(x);
    out.assert_same_shape(y);
    let h = 1.0 / out.n() as f32;
    out.fill_interior_with_index(|i, j| {
        -0.5 * h * (x.get(i + 1, j) - x.get(i - 1, j) + y.get(i, j + 1) - y.get(i, j - 1))
    });
}

pub fn project(
    x: &mut Grid2<f32>,
    y: &mut Grid2<f32>,
    pressure: &mut Grid2<f32>,
    divergence: &mut Grid2<f32>,
    iterations: usize,
) {
    pressure.assert_same_shape(x);
    divergence_into(divergence, x, y);
    pressure.reset();
    enforce_boundary(divergence);
    enforce_boundary(pressure);
    relax(pressure, divergence, 1.0, 4.0, iterations);
    let scale = 0.5 * x.n() as f32;
    let p = &*pressure;
    x.update_interior_with_index(|i, j, value| {
        value - scale * (p.get(i + 1, j) - p.get(i - 1, j))
    });
    y.update_interior_with_index(|i, j, value| {
        value - scale * (p.get(i, j + 1) - p.get(i, j - 1))
    });
    enforce_boundary(x);
    enforce_boundary(y);
}

/// Semi-Lagrangian transport of `prev` through `(xv, yv)` into `grid`.
///
/// Backtraced positions are clamped to `[0.5, N + 0.5]` so the bilinear
/// stencil never leaves the ghost border.
pub fn advect(
    grid: &mut Grid2<f32>,
    prev: &Grid2<f32>,
    xv: &Grid2<f32>,
    yv: &Grid2<f32>,
    dt: f32,
) {
    grid.assert_same_shape(prev);
    grid.assert_same_shape(xv);
    grid.assert_same_shape(yv);
    let n = grid.n() as f32;
    let dt0 = dt * n;
    grid.fill_interior_with_index(|i, j| {
        let x = (i as f32 - dt0 * xv.get(i, j)).clamp(0.5, n + 0.5);
        let y = (j as f32 - dt0 * yv.get(i, j)).clamp(0.5, n + 0.5);
        sample_bilinear(prev, x, y)
    });
    enforce_boundary(grid);
}

pub fn sample_bilinear(grid: &Grid2<f32>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let sx = x - x0 as f32;
    let sy = y - y0 as f32;
    let v00 = grid.get(x0, y0);
    let v10 = grid.get(x0 + 1, y0);
    let v01 = grid.get(x0, y0 + 1);
    let v11 = grid.get(x0 + 1, y0 + 1);
    let vx0 = v00 + (v10 - v00) * sx;
    let vx1 = v01 + (v11 - v01) * sx;
    vx0 + (vx1 - vx0) * sy
}
