use crate::config::{non_negative, positive, SimConfig};
use crate::error::{Result, SimError};
use crate::heat::HeatZone;
use crate::stages::{
    add_external_forces, add_uniform_impulse, advect, diffuse, diffuse_variable, project,
};
use crate::{BoundaryKind, Grid2, Vec2};
use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub struct FluidSim {
    config: SimConfig,
    x: Grid2<f32>,
    x_old: Grid2<f32>,
    y: Grid2<f32>,
    y_old: Grid2<f32>,
    density: Grid2<f32>,
    density_old: Grid2<f32>,
    viscosity: Grid2<f32>,
    pressure: Grid2<f32>,
    divergence: Grid2<f32>,
    heat: HeatZone,
    steps: u64,
}

impl FluidSim {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let n = config.resolution;
        let mut sim = Self {
            config,
            x: Grid2::new(n, BoundaryKind::VelocityX),
            x_old: Grid2::new(n, BoundaryKind::VelocityX),
            y: Grid2::new(n, BoundaryKind::VelocityY),
            y_old: Grid2::new(n, BoundaryKind::VelocityY),
            density: Grid2::new(n, BoundaryKind::Density),
            density_old: Grid2::new(n, BoundaryKind::Density),
            viscosity: Grid2::new(n, BoundaryKind::Untyped),
            pressure: Grid2::new(n, BoundaryKind::Untyped),
            divergence: Grid2::new(n, BoundaryKind::Untyped),
            heat: HeatZone::new(config.heat),
            steps: 0,
        };
        sim.viscosity.fill(config.viscosity);
        debug!(
            n,
            viscosity = config.viscosity,
            diffusion = config.diffusion,
            dt = config.time_step,
            "created fluid simulation"
        );
        Ok(sim)
    }

    pub fn step(&mut self) {
        self.velocity_step();
        self.density_step();
        self.x_old.reset();
        self.y_old.reset();
        self.density_old.reset();
        self.steps += 1;
        trace!(
            step = self.steps,
            mass = self.density.interior_sum(),
            peak_speed = self.peak_speed(),
            "advanced fluid"
        );
    }

    fn velocity_step(&mut self) {
        let dt = self.config.time_step;
        let iters = self.config.relaxation_iters;
        add_external_forces(&mut self.x, &self.x_old, dt);
        add_external_forces(&mut self.y, &self.y_old, dt);
        if self.config.gravity_enabled {
            add_uniform_impulse(&mut self.y, self.config.gravity, dt);
        }

        self.x.swap(&mut self.x_old);
        self.y.swap(&mut self.y_old);
        if self.config.variable_viscosity {
            self.heat.advance();
            self.heat.apply(&mut self.viscosity);
            diffuse_variable(&mut self.x, &self.x_old, &self.viscosity, dt, iters);
            diffuse_variable(&mut self.y, &self.y_old, &self.viscosity, dt, iters);
        } else {
            let rate = self.config.viscosity;
            diffuse(&mut self.x, &self.x_old, rate, dt, iters);
            diffuse(&mut self.y, &self.y_old, rate, dt, iters);
        }
        project(
            &mut self.x,
            &mut self.y,
            &mut self.pressure,
            &mut self.divergence,
            iters,
        );

        self.x.swap(&mut self.x_old);
        self.y.swap(&mut self.y_old);
        advect(&mut self.x, &self.x_old, &self.x_old, &self.y_old, dt);
        advect(&mut self.y, &self.y_old, &self.x_old, &self.y_old, dt);
        project(
            &mut self.x,
            &mut self.y,
            &mut self.pressure,
            &mut self.divergence,
            iters,
        );
    }

    fn density_step(&mut self) {
        let dt = self.config.time_step;
        let iters = self.config.relaxation_iters;
        add_external_forces(&mut self.density, &self.density_old, dt);
        self.density.swap(&mut self.density_old);
        diffuse(
            &mut self.density,
            &self.density_old,
            self.config.diffusion,
            dt,
            iters,
        );
        self.density.swap(&mut self.density_old);
        advect(&mut self.density, &self.density_old, &self.x, &self.y, dt);
    }

    pub fn reset(&mut self) {
        for grid in self.grids_mut() {
            grid.reset();
        }
        self.viscosity.fill(self.config.viscosity);
        self.heat.reset();
        self.steps = 0;
        debug!(n = self.n(), "reset fluid simulation");
    }

    pub fn resize(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(SimError::InvalidResolution(n));
        }
        for grid in self.grids_mut() {
            grid.resize(n)?;
        }
        self.config.resolution = n;
        self.viscosity.fill(self.config.viscosity);
        self.heat.reset();
        self.steps = 0;
        debug!(n, "resized fluid simulation");
        Ok(())
    }

    fn grids_mut(&mut self) -> [&mut Grid2<f32>; 9] {
        [
            &mut self.x,
            &mut self.x_old,
            &mut self.y,
            &mut self.y_old,
            &mut self.density,
            &mut self.density_old,
            &mut self.viscosity,
            &mut self.pressure,
            &mut self.divergence,
        ]
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<()> {
        non_negative("viscosity", viscosity)?;
        self.config.viscosity = viscosity;
        self.viscosity.fill(viscosity);
        debug!(viscosity, "viscosity changed");
        Ok(())
    }

    pub fn set_diffusion(&mut self, diffusion: f32) -> Result<()> {
        non_negative("diffusion", diffusion)?;
        self.config.diffusion = diffusion;
        debug!(diffusion, "diffusion changed");
        Ok(())
    }

    pub fn set_time_step(&mut self, time_step: f32) -> Result<()> {
        positive("time_step", time_step)?;
        self.config.time_step = time_step;
        debug!(time_step, "time step changed");
        Ok(())
    }

    pub fn set_relaxation_iters(&mut self, iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Err(SimError::InvalidParameter {
                name: "relaxation_iters",
                expected: "> 0",
                value: 0.0,
            });
        }
        self.config.relaxation_iters = iterations;
        debug!(iterations, "relaxation iterations changed");
        Ok(())
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.config.gravity_enabled = !self.config.gravity_enabled;
        debug!(enabled = self.config.gravity_enabled, "gravity toggled");
        self.config.gravity_enabled
    }

    pub fn toggle_variable_viscosity(&mut self) -> bool {
        self.config.variable_viscosity = !self.config.variable_viscosity;
        debug!(
            enabled = self.config.variable_viscosity,
            "variable viscosity toggled"
        );
        self.config.variable_viscosity
    }

    pub fn cell_from_screen(&self, x: f32, y: f32, width: f32, height: f32) -> (usize, usize) {
        let n = self.n();
        // Texel k of the presented density belongs to interior cell k + 1.
        let to_cell = |pos: f32, extent: f32| {
            let cell = (pos / extent * n as f32).floor() + 1.0;
            if cell.is_nan() {
                1
            } else {
                (cell.max(0.0) as usize).clamp(1, n)
            }
        };
        (to_cell(x, width), to_cell(y, height))
    }

    pub fn inject_force(&mut self, i: usize, j: usize, delta: Vec2) -> Result<()> {
        self.check_interior(i, j)?;
        let scale = self.config.force_scale;
        self.x_old.set(i, j, delta.x * scale);
        self.y_old.set(i, j, delta.y * scale);
        Ok(())
    }

    pub fn inject_density(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_interior(i, j)?;
        let value = self.density_old.get(i, j) + self.config.density_amount;
        self.density_old.set(i, j, value);
        Ok(())
    }

    fn check_interior(&self, i: usize, j: usize) -> Result<()> {
        let n = self.n();
        if (1..=n).contains(&i) && (1..=n).contains(&j) {
            Ok(())
        } else {
            Err(SimError::OutsideInterior { i, j, n })
        }
    }

    pub fn n(&self) -> usize {
        self.config.resolution
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn density(&self) -> &Grid2<f32> {
        &self.density
    }

    pub fn velocity_x(&self) -> &Grid2<f32> {
        &self.x
    }

    pub fn velocity_y(&self) -> &Grid2<f32> {
        &self.y
    }

    pub fn viscosity_field(&self) -> &Grid2<f32> {
        &self.viscosity
    }

    pub fn heat(&self) -> &HeatZone {
        &self.heat
    }

    pub fn peak_speed(&self) -> f32 {
        self.x
            .interior()
            .map(|(i, j, u)| Vec2::new(u, self.y.get(i, j)).length())
            .fold(0.0_f32, f32::max)
    }
}
