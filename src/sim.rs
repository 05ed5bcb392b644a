/// The simulation state machine: owns the physics world, the particle list,
/// the snapshot history, and the energy baseline, and implements the
/// per-frame forward/inverted step semantics.
use std::collections::VecDeque;

use eframe::egui::Color32;
use log::{info, warn};
use rand::Rng;
use rapier2d::na::Vector2;

use crate::config::SimConfig;
use crate::energy::{average_energy, energy_color, kinetic_energy};
use crate::history::{History, Snapshot};
use crate::physics::{Particle, PhysicsWorld, Wall};

/// Wall slabs are 20 px thick, centered 10 px inside the window edge.
const WALL_THICKNESS: f32 = 20.0;

/// Everything the app needs to draw one disk.
pub struct DiskView {
    pub position: Vector2<f32>,
    pub radius: f32,
    pub angle: f32,
    pub color: Color32,
}

pub struct Simulation {
    config: SimConfig,
    world: PhysicsWorld,
    walls: Vec<Wall>,
    particles: Vec<Particle>,
    history: History,
    /// Rolling (sample index, total energy) series for the on-screen graph.
    /// Pure visualization; never read by the simulation itself.
    energy_series: VecDeque<[f64; 2]>,
    samples: u64,
    /// Mean kinetic energy at the last particle-set change; the color
    /// normalization reference.
    average_energy: f32,
    pub paused: bool,
    pub friction_enabled: bool,
    pub gravity_enabled: bool,
    pub inversion_enabled: bool,
    pub dt: f32,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let dt = config.dt;
        let history = History::new(config.history_capacity);
        let mut sim = Self {
            config,
            world: PhysicsWorld::new(),
            walls: Vec::new(),
            particles: Vec::new(),
            history,
            energy_series: VecDeque::new(),
            samples: 0,
            average_energy: 0.0,
            paused: false,
            friction_enabled: true,
            gravity_enabled: false,
            inversion_enabled: false,
            dt,
        };
        sim.populate();
        sim
    }

    /// Rebuilds the world from `config`, keeping the current toggle states.
    pub fn reset(&mut self, config: SimConfig) {
        info!(
            "reset: {} particles, history capacity {}",
            config.particle_count, config.history_capacity
        );
        self.history = History::new(config.history_capacity);
        self.energy_series.clear();
        self.samples = 0;
        self.dt = config.dt;
        self.config = config;
        self.world = PhysicsWorld::new();
        self.walls.clear();
        self.particles.clear();
        self.populate();
    }

    fn populate(&mut self) {
        self.build_boundaries();
        self.apply_gravity();
        for _ in 0..self.config.particle_count {
            self.spawn_disk();
        }
        self.recompute_average();
    }

    /// Four static slabs forming a closed box just inside the window.
    fn build_boundaries(&mut self) {
        let (w, h) = (self.config.window_width, self.config.window_height);
        let half = WALL_THICKNESS / 2.0;
        let segments = [
            (Vector2::new(w / 2.0, h - half), Vector2::new(w / 2.0, half)), // bottom
            (Vector2::new(w / 2.0, half), Vector2::new(w / 2.0, half)),     // top
            (Vector2::new(half, h / 2.0), Vector2::new(half, h / 2.0)),     // left
            (Vector2::new(w - half, h / 2.0), Vector2::new(half, h / 2.0)), // right
        ];
        for (center, half_extents) in segments {
            self.walls.push(self.world.add_wall(center, half_extents));
        }
    }

    fn effective_friction(&self) -> f32 {
        if self.friction_enabled {
            self.config.friction
        } else {
            0.0
        }
    }

    fn apply_gravity(&mut self) {
        let magnitude = if self.gravity_enabled {
            self.config.gravity
        } else {
            0.0
        };
        self.world.set_gravity(Vector2::new(0.0, magnitude));
    }

    /// Creates one disk with random radius, position, velocity, and spin.
    /// Does not touch the average baseline; callers decide when to refresh it.
    fn spawn_disk(&mut self) {
        let mut rng = rand::rng();
        let radius = rng.random_range(self.config.radius_min..=self.config.radius_max);
        let margin = WALL_THICKNESS + radius;
        let span_x = (self.config.window_width - 2.0 * margin).max(1.0);
        let span_y = (self.config.window_height - 2.0 * margin).max(1.0);
        let position = Vector2::new(
            margin + rng.random_range(0.0..span_x),
            margin + rng.random_range(0.0..span_y),
        );
        let velocity = Vector2::new(
            rng.random_range(-self.config.speed_max..self.config.speed_max),
            rng.random_range(-self.config.speed_max..self.config.speed_max),
        );
        let angular_velocity = rng.random_range(-self.config.spin_max..self.config.spin_max);
        let friction = self.effective_friction();
        let particle =
            self.world
                .spawn_disk(position, velocity, angular_velocity, radius, friction);
        self.particles.push(particle);
    }

    /// Adds one particle (keyboard or pointer). The spawn location is random,
    /// not the pointer position; this mirrors the original behavior.
    pub fn add_particle(&mut self) {
        self.spawn_disk();
        self.recompute_average();
    }

    /// Removes the most recently added particle, if any.
    pub fn remove_particle(&mut self) {
        if let Some(particle) = self.particles.pop() {
            self.world.remove_particle(particle);
            self.recompute_average();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Applies to every live disk immediately and to all future spawns.
    pub fn toggle_friction(&mut self) {
        self.friction_enabled = !self.friction_enabled;
        let friction = self.effective_friction();
        for particle in &self.particles {
            self.world.set_friction(particle, friction);
        }
    }

    pub fn toggle_gravity(&mut self) {
        self.gravity_enabled = !self.gravity_enabled;
        self.apply_gravity();
    }

    /// Disabling inversion discards the retained history.
    pub fn toggle_inversion(&mut self) {
        self.inversion_enabled = !self.inversion_enabled;
        if !self.inversion_enabled {
            self.history.clear();
        }
    }

    pub fn adjust_dt(&mut self, increase: bool) {
        if increase {
            self.dt *= 1.1;
        } else {
            self.dt /= 1.1;
        }
    }

    /// One frame of simulation: forward step (push then advance) or reverse
    /// playback (pop and restore), then a graph sample. No-op while paused.
    pub fn tick(&mut self) {
        if !self.paused {
            if self.inversion_enabled {
                self.step_backward();
            } else {
                self.step_forward();
            }
        }
        self.record_energy_sample();
    }

    fn step_forward(&mut self) {
        self.history.push(self.capture_snapshot());
        self.world.step(self.dt);
    }

    /// Restores the most recent snapshot instead of stepping. With the
    /// history exhausted, the world holds its current (oldest restored)
    /// state.
    fn step_backward(&mut self) {
        if let Some(snapshot) = self.history.pop() {
            self.restore_snapshot(&snapshot);
        }
    }

    pub fn capture_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::with_capacity(self.particles.len());
        for particle in &self.particles {
            if let Some(state) = self.world.body_state(particle.body) {
                snapshot.bodies.push(state);
            }
        }
        snapshot
    }

    /// Pairs records to particles positionally. A count mismatch means the
    /// particle set changed after capture; the overlapping prefix is restored
    /// and the discrepancy logged rather than crashing the frame loop.
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        if snapshot.len() != self.particles.len() {
            warn!(
                "snapshot holds {} bodies but {} particles are live; restoring the overlap",
                snapshot.len(),
                self.particles.len()
            );
        }
        for (particle, state) in self.particles.iter().zip(snapshot.bodies.iter()) {
            self.world.set_body_state(particle.body, state);
        }
    }

    fn particle_energy(&self, particle: &Particle) -> f32 {
        match self.world.body(particle.body) {
            Some(body) => kinetic_energy(particle.mass, particle.moment, body.linvel(), body.angvel()),
            None => 0.0,
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.particles.iter().map(|p| self.particle_energy(p)).sum()
    }

    fn recompute_average(&mut self) {
        let energies: Vec<f32> = self
            .particles
            .iter()
            .map(|p| self.particle_energy(p))
            .collect();
        self.average_energy = average_energy(&energies);
    }

    fn record_energy_sample(&mut self) {
        let total = self.total_energy() as f64;
        self.energy_series.push_back([self.samples as f64, total]);
        self.samples += 1;
        while self.energy_series.len() > self.config.graph_window.max(1) {
            self.energy_series.pop_front();
        }
    }

    // ---- read-only views for the app and tests ----

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn average_energy(&self) -> f32 {
        self.average_energy
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn energy_series(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.energy_series.iter().copied()
    }

    pub fn disk_views(&self) -> Vec<DiskView> {
        self.particles
            .iter()
            .filter_map(|particle| {
                let state = self.world.body_state(particle.body)?;
                let energy = self.particle_energy(particle);
                Some(DiskView {
                    position: state.position,
                    radius: particle.radius,
                    angle: state.angle,
                    color: energy_color(energy, self.average_energy),
                })
            })
            .collect()
    }
}
