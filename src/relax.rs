use crate::{boundary::enforce_boundary, Grid2};

/// Gauss–Seidel relaxation of `(I - a L) x = prev`.
///
/// Each sweep updates interior cells in place, so later cells in a sweep see
/// the values already written by earlier ones. The border is enforced once,
/// after the last sweep.
pub fn relax(grid: &mut Grid2<f32>, prev: &Grid2<f32>, a: f32, c: f32, iterations: usize) {
    grid.assert_same_shape(prev);
    let n = grid.n();
    let stride = grid.stride();
    let source = prev.as_slice();
    let data = grid.as_mut_slice();
    for _ in 0..iterations {
        for j in 1..=n {
            for i in 1..=n {
                let idx = i + stride * j;
                let neighbors =
                    data[idx - 1] + data[idx + 1] + data[idx - stride] + data[idx + stride];
                data[idx] = (source[idx] + a * neighbors) / c;
            }
        }
    }
    enforce_boundary(grid);
}

pub fn relax_variable(
    grid: &mut Grid2<f32>,
    prev: &Grid2<f32>,
    coefficients: &Grid2<f32>,
    scale: f32,
    iterations: usize,
) {
    grid.assert_same_shape(prev);
    grid.assert_same_shape(coefficients);
    let n = grid.n();
    let stride = grid.stride();
    let source = prev.as_slice();
    let coefficients = coefficients.as_slice();
    let data = grid.as_mut_slice();
    for _ in 0..iterations {
        for j in 1..=n {
            for i in 1..=n {
                let idx = i + stride * j;
                let a = scale * coefficients[idx];
                let neighbors =
                    data[idx - 1] + data[idx + 1] + data[idx - stride] + data[idx + stride];
                data[idx] = (source[idx] + a * neighbors) / (1.0 + 4.0 * a);
            }
        }
    }
    enforce_boundary(grid);
}
