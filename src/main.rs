use anyhow::{Context, Result};
use stable_fluids::{
    present::{density_to_rgba, sample_velocity},
    FluidSim, LevelSet, SimConfig, Vec2,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCREEN_SIZE: f32 = 512.0;
const LOG_EVERY: usize = 25;

fn init_logging() {
    let filter = std::env::var("SIM_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn demo_steps() -> Result<usize> {
    match std::env::var("SIM_STEPS") {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid SIM_STEPS={value:?}")),
        Err(_) => Ok(200),
    }
}

fn stir(sim: &mut FluidSim, step: usize) -> Result<()> {
    let angle = step as f32 * 0.05;
    let radius = SCREEN_SIZE * 0.25;
    let center = Vec2::new(SCREEN_SIZE * 0.5, SCREEN_SIZE * 0.5);
    let pointer = center.add(Vec2::from_angle(angle, radius));
    let previous = center.add(Vec2::from_angle(angle - 0.05, radius));
    let (i, j) = sim.cell_from_screen(pointer.x, pointer.y, SCREEN_SIZE, SCREEN_SIZE);
    sim.inject_force(i, j, pointer.sub(previous))
        .context("injecting stirring force")?;
    sim.inject_density(i, j).context("injecting dye")?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let config = SimConfig::from_env().context("loading simulation config")?;
    let steps = demo_steps()?;
    let mut sim = FluidSim::new(config).context("creating simulation")?;
    let n = sim.n();

    let mut level_set = LevelSet::new(n);
    level_set.add_object(n / 3, n / 4);
    let mut fans = 0usize;
    let volume = level_set.extract_surface_with(|_, _, _| fans += 1);
    info!(n, volume, fans, "seeded level set");
    let heat_center = sim.heat().center();
    info!(
        x = heat_center.x,
        y = heat_center.y,
        radius = sim.heat().radius(),
        "heat zone"
    );

    let mut texture = Vec::new();
    for step in 0..steps {
        stir(&mut sim, step)?;
        sim.step();
        if step % LOG_EVERY == 0 || step + 1 == steps {
            density_to_rgba(sim.density(), &mut texture);
            let lit = texture.chunks(4).filter(|px| px[0] > 0).count();
            let arrows = sample_velocity(sim.velocity_x(), sim.velocity_y(), 8);
            let fastest = arrows
                .iter()
                .map(|arrow| arrow.velocity.length())
                .fold(0.0_f32, f32::max);
            info!(
                step,
                mass = sim.density().interior_sum(),
                peak_speed = sim.peak_speed(),
                arrow_peak = fastest,
                heat_radius = sim.heat().radius(),
                heat_outline = sim.heat().boundary_polygon().len(),
                lit,
                "frame"
            );
        }
    }

    let volume = level_set.extract_surface();
    info!(
        volume,
        drift = level_set.volume_drift(),
        "final level-set volume"
    );
    Ok(())
}
