use crate::{BoundaryKind, Grid2};

pub fn enforce_boundary(grid: &mut Grid2<f32>) {
    let n = grid.n();
    let stride = grid.stride();
    let (flip_x, flip_y) = match grid.kind() {
        BoundaryKind::VelocityX => (-1.0, 1.0),
        BoundaryKind::VelocityY => (1.0, -1.0),
        BoundaryKind::Density | BoundaryKind::Untyped => (1.0, 1.0),
    };
    let data = grid.as_mut_slice();
    let at = |i: usize, j: usize| i + stride * j;
    for k in 1..=n {
        data[at(0, k)] = flip_x * data[at(1, k)];
        data[at(n + 1, k)] = flip_x * data[at(n, k)];
        data[at(k, 0)] = flip_y * data[at(k, 1)];
        data[at(k, n + 1)] = flip_y * data[at(k, n)];
    }
    data[at(0, 0)] = 0.5 * (data[at(1, 0)] + data[at(0, 1)]);
    data[at(0, n + 1)] = 0.5 * (data[at(1, n + 1)] + data[at(0, n)]);
    data[at(n + 1, 0)] = 0.5 * (data[at(n, 0)] + data[at(n + 1, 1)]);
    data[at(n + 1, n + 1)] = 0.5 * (data[at(n, n + 1)] + data[at(n + 1, n)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize, kind: BoundaryKind) -> Grid2<f32> {
        let mut grid = Grid2::new(n, kind);
        grid.fill(99.0);
        grid.fill_interior_with_index(|i, j| (i * 7 + j * 3) as f32 - 10.0);
        grid
    }

    #[test]
    fn velocity_x_reflects_at_side_walls() {
        let mut grid = sample(5, BoundaryKind::VelocityX);
        enforce_boundary(&mut grid);
        for j in 1..=5 {
            assert_eq!(grid.get(0, j), -grid.get(1, j));
            assert_eq!(grid.get(6, j), -grid.get(5, j));
        }
        for i in 1..=5 {
            assert_eq!(grid.get(i, 0), grid.get(i, 1));
            assert_eq!(grid.get(i, 6), grid.get(i, 5));
        }
    }

    #[test]
    fn velocity_y_reflects_at_top_and_bottom() {
        let mut grid = sample(4, BoundaryKind::VelocityY);
        enforce_boundary(&mut grid);
        for i in 1..=4 {
            assert_eq!(grid.get(i, 0), -grid.get(i, 1));
            assert_eq!(grid.get(i, 5), -grid.get(i, 4));
        }
        for j in 1..=4 {
            assert_eq!(grid.get(0, j), grid.get(1, j));
            assert_eq!(grid.get(5, j), grid.get(4, j));
        }
    }

    #[test]
    fn density_and_untyped_copy_everywhere() {
        for kind in [BoundaryKind::Density, BoundaryKind::Untyped] {
            let mut grid = sample(3, kind);
            enforce_boundary(&mut grid);
            for k in 1..=3 {
                assert_eq!(grid.get(0, k), grid.get(1, k));
                assert_eq!(grid.get(4, k), grid.get(3, k));
                assert_eq!(grid.get(k, 0), grid.get(k, 1));
                assert_eq!(grid.get(k, 4), grid.get(k, 3));
            }
        }
    }

    #[test]
    fn corners_average_adjacent_edges() {
        let mut grid = sample(4, BoundaryKind::VelocityX);
        enforce_boundary(&mut grid);
        assert_eq!(grid.get(0, 0), 0.5 * (grid.get(1, 0) + grid.get(0, 1)));
        assert_eq!(grid.get(0, 5), 0.5 * (grid.get(1, 5) + grid.get(0, 4)));
        assert_eq!(grid.get(5, 0), 0.5 * (grid.get(4, 0) + grid.get(5, 1)));
        assert_eq!(grid.get(5, 5), 0.5 * (grid.get(4, 5) + grid.get(5, 4)));
    }

    #[test]
    fn interior_is_untouched() {
        let before = sample(4, BoundaryKind::VelocityY);
        let mut after = before.clone();
        enforce_boundary(&mut after);
        for (i, j, value) in before.interior() {
            assert_eq!(after.get(i, j), value);
        }
    }
}
