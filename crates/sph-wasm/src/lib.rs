use bytemuck::Zeroable;
use glam::Vec2;
use sph_core::{Simulation, SimulationConfig};
use wasm_bindgen::prelude::*;

/// GPU-compatible particle struct: 32 bytes, matches the WGSL `Particle`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuParticle {
    position: [f32; 2], //  8 bytes
    velocity: [f32; 2], //  8 bytes
    color: f32,         //  4 bytes, density deviation in [-1, 1]
    _pad: [f32; 3],     // 12 bytes
}

/// Browser-side handle on a running simulation.
///
/// The JS frame loop calls [`frame`](Self::frame) once per animation frame and
/// reads the packed particle buffer straight out of wasm memory.
#[wasm_bindgen]
pub struct FluidWorld {
    sim: Simulation,
    gpu_buffer: Vec<GpuParticle>,
    colors: Vec<f32>,
    stopped: bool,
}

#[wasm_bindgen]
impl FluidWorld {
    /// Create a world from a JSON config; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<FluidWorld, JsValue> {
        let config = SimulationConfig::from_json_str(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::from_config(config)
    }

    pub fn with_defaults() -> Result<FluidWorld, JsValue> {
        Self::from_config(SimulationConfig::default())
    }

    /// Advance by `ticks_per_frame` ticks and refresh the GPU buffer.
    ///
    /// Returns the time spent in milliseconds. Does nothing once stopped.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> f32 {
        if self.stopped {
            return 0.0;
        }
        let start = js_sys::Date::now();
        let ticks = self.sim.config().ticks_per_frame;
        self.sim.advance(ticks);
        self.write_gpu_output();
        (js_sys::Date::now() - start) as f32
    }

    /// Advance a single tick without touching the GPU buffer.
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        if !self.stopped {
            self.sim.tick();
        }
    }

    /// End the run; later `frame`/`tick` calls are ignored.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        if !self.stopped {
            web_sys::console::log_1(
                &format!("FluidWorld stopped after {} ticks", self.sim.tick_count()).into(),
            );
        }
        self.stopped = true;
    }

    #[wasm_bindgen]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> *const f32 {
        self.gpu_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> usize {
        bytemuck::cast_slice::<GpuParticle, u8>(&self.gpu_buffer).len()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.sim.particles().len()
    }

    #[wasm_bindgen]
    pub fn width(&self) -> f32 {
        self.sim.bounds().x
    }

    #[wasm_bindgen]
    pub fn height(&self) -> f32 {
        self.sim.bounds().y
    }

    #[wasm_bindgen]
    pub fn tick_count(&self) -> f64 {
        self.sim.tick_count() as f64
    }
}

impl FluidWorld {
    fn from_config(config: SimulationConfig) -> Result<FluidWorld, JsValue> {
        let sim = Simulation::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let count = sim.particles().len();

        web_sys::console::log_1(
            &format!(
                "WASM FluidWorld created: {} particles, seed {}",
                count,
                sim.seed()
            )
            .into(),
        );

        let mut world = FluidWorld {
            sim,
            gpu_buffer: vec![GpuParticle::zeroed(); count],
            colors: vec![0.0; count],
            stopped: false,
        };
        world.write_gpu_output();
        Ok(world)
    }

    fn write_gpu_output(&mut self) {
        self.sim.write_colors(&mut self.colors);
        let particles = self.sim.particles();
        for ((gpu, particle), &color) in self
            .gpu_buffer
            .iter_mut()
            .zip(particles)
            .zip(&self.colors)
        {
            let pos: Vec2 = particle.position;
            *gpu = GpuParticle {
                position: pos.to_array(),
                velocity: particle.velocity.to_array(),
                color,
                _pad: [0.0; 3],
            };
        }
    }
}
