use crate::{Grid2, Vec2};

pub fn density_to_rgba(density: &Grid2<f32>, out: &mut Vec<u8>) {
    let n = density.n();
    out.resize(n * n * 4, 0);
    for (i, j, value) in density.interior() {
        let c = value.clamp(0.0, 255.0) as u8;
        let idx = ((j - 1) * n + (i - 1)) * 4;
        out[idx..idx + 4].copy_from_slice(&[c, c, c, 255]);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocitySample {
    pub position: Vec2,
    pub velocity: Vec2,
}

pub fn sample_velocity(x: &Grid2<f32>, y: &Grid2<f32>, step: usize) -> Vec<VelocitySample> {
    x.assert_same_shape(y);
    let n = x.n();
    let step = step.max(1);
    let scale = 2.0 / n as f32;
    (1..=n)
        .step_by(step)
        .flat_map(|j| (1..=n).step_by(step).map(move |i| (i, j)))
        .map(|(i, j)| VelocitySample {
            position: Vec2::new(
                (i as f32 - 0.5) * scale - 1.0,
                (j as f32 - 0.5) * scale - 1.0,
            ),
            velocity: Vec2::new(x.get(i, j), y.get(i, j)),
        })
        .collect()
}
