use crate::error::{Result, SimError};
use crate::heat::{GrowthLaw, HeatConfig};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimConfig {
    pub resolution: usize,
    pub viscosity: f32,
    pub diffusion: f32,
    pub time_step: f32,
    pub relaxation_iters: usize,
    pub gravity: f32,
    pub gravity_enabled: bool,
    pub variable_viscosity: bool,
    pub force_scale: f32,
    pub density_amount: f32,
    pub heat: HeatConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: 100,
            viscosity: 0.0005,
            diffusion: 0.00001,
            time_step: 0.125,
            relaxation_iters: 20,
            gravity: 9.8,
            gravity_enabled: false,
            variable_viscosity: false,
            force_scale: 10.0,
            density_amount: 100.0,
            heat: HeatConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let read = |key: &'static str| lookup(key).map(|value| (key, value));
        if let Some((key, value)) = read("SIM_RESOLUTION") {
            config.resolution = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_VISCOSITY") {
            config.viscosity = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_DIFFUSION") {
            config.diffusion = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_TIME_STEP") {
            config.time_step = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_RELAX_ITERS") {
            config.relaxation_iters = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_GRAVITY") {
            config.gravity = parse(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_GRAVITY_ON") {
            config.gravity_enabled = parse_flag(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_VARIABLE_VISCOSITY") {
            config.variable_viscosity = parse_flag(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_HEAT_GROWTH") {
            config.heat.growth = parse_growth(key, &value)?;
        }
        if let Some((key, value)) = read("SIM_HEAT_RATE") {
            config.heat.viscosity_rate = parse(key, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(SimError::InvalidResolution(self.resolution));
        }
        if self.relaxation_iters == 0 {
            return Err(SimError::InvalidParameter {
                name: "relaxation_iters",
                expected: "> 0",
                value: 0.0,
            });
        }
        non_negative("viscosity", self.viscosity)?;
        non_negative("diffusion", self.diffusion)?;
        non_negative("heat viscosity rate", self.heat.viscosity_rate)?;
        positive("time_step", self.time_step)?;
        Ok(())
    }
}

// Comparisons are written so NaN slips through; non-finite values are not
// sanitised anywhere in the pipeline.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value < 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            expected: ">= 0",
            value,
        });
    }
    Ok(())
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<()> {
    if value <= 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            expected: "> 0",
            value,
        });
    }
    Ok(())
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| SimError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(SimError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_growth(key: &'static str, value: &str) -> Result<GrowthLaw> {
    match value.trim().strip_suffix("/s") {
        Some(rate) => Ok(GrowthLaw::WallClock {
            rate_per_second: parse(key, rate)?,
        }),
        None => Ok(GrowthLaw::PerStep {
            increment: parse(key, value)?,
        }),
    }
}
