/// Thin ownership layer over the rapier2d world.
///
/// Everything dynamical (collision detection, contact response, integration)
/// is delegated to rapier; this module only owns the sets and pipeline state,
/// keeps an explicit distinction between boundary and particle bodies, and
/// funnels body creation/removal through single code paths.
use rapier2d::math::Rotation;
use rapier2d::na::Vector2;
use rapier2d::prelude::*;

use crate::history::BodyState;

/// A dynamic disk. Owns its body/collider handles exclusively; the pair is
/// removed from the world exactly once, when the particle is passed by value
/// to [`PhysicsWorld::remove_particle`].
#[derive(Debug)]
pub struct Particle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub radius: f32,
    /// Mass proportional to area: `π·r²` at unit density.
    pub mass: f32,
    /// Uniform-disk moment of inertia: `m·r²/2`.
    pub moment: f32,
}

/// A static boundary segment of the box. Geometry is kept alongside the
/// handle so drawing never has to inspect collider shapes.
#[derive(Debug)]
pub struct Wall {
    pub body: RigidBodyHandle,
    pub center: Vector2<f32>,
    pub half_extents: Vector2<f32>,
}

pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector2<f32>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: Vector2::zeros(),
            integration: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }

    pub fn gravity(&self) -> Vector2<f32> {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vector2<f32>) {
        self.gravity = gravity;
        // Wake everything so resting bodies notice the new field.
        for (_, body) in self.bodies.iter_mut() {
            body.wake_up(true);
        }
    }

    /// Advances the world by `dt`.
    pub fn step(&mut self, dt: f32) {
        self.integration.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Inserts a static, perfectly elastic wall segment.
    pub fn add_wall(&mut self, center: Vector2<f32>, half_extents: Vector2<f32>) -> Wall {
        let body = RigidBodyBuilder::fixed().translation(center).build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .restitution(1.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        Wall {
            body: handle,
            center,
            half_extents,
        }
    }

    /// Inserts a dynamic disk with unit density, so rapier derives the same
    /// mass (`π·r²`) and angular inertia (`m·r²/2`) that the returned
    /// `Particle` records for the energy computation.
    pub fn spawn_disk(
        &mut self,
        position: Vector2<f32>,
        velocity: Vector2<f32>,
        angular_velocity: f32,
        radius: f32,
        friction: f32,
    ) -> Particle {
        let body = RigidBodyBuilder::dynamic()
            .translation(position)
            .linvel(velocity)
            .angvel(angular_velocity)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(radius)
            .restitution(1.0)
            .friction(friction)
            .density(1.0)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let mass = std::f32::consts::PI * radius * radius;
        Particle {
            body: handle,
            collider: collider_handle,
            radius,
            mass,
            moment: 0.5 * mass * radius * radius,
        }
    }

    /// Removes a particle's body and attached collider from the world.
    pub fn remove_particle(&mut self, particle: Particle) {
        self.bodies.remove(
            particle.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn set_friction(&mut self, particle: &Particle, friction: f32) {
        if let Some(collider) = self.colliders.get_mut(particle.collider) {
            collider.set_friction(friction);
        }
        if let Some(body) = self.bodies.get_mut(particle.body) {
            body.wake_up(true);
        }
    }

    pub fn friction_of(&self, particle: &Particle) -> Option<f32> {
        self.colliders.get(particle.collider).map(|c| c.friction())
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Reads a body's kinematic state in snapshot form.
    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        self.bodies.get(handle).map(|body| BodyState {
            position: *body.translation(),
            velocity: *body.linvel(),
            angle: body.rotation().angle(),
            angular_velocity: body.angvel(),
        })
    }

    /// Writes a snapshot record back onto a live body.
    pub fn set_body_state(&mut self, handle: RigidBodyHandle, state: &BodyState) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(state.position, true);
            body.set_linvel(state.velocity, true);
            body.set_rotation(Rotation::new(state.angle), true);
            body.set_angvel(state.angular_velocity, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_disk_records_area_mass_and_disk_moment() {
        let mut world = PhysicsWorld::new();
        let p = world.spawn_disk(Vector2::new(0.0, 0.0), Vector2::zeros(), 0.0, 10.0, 0.1);
        let expected_mass = std::f32::consts::PI * 100.0;
        assert!((p.mass - expected_mass).abs() < 1e-3);
        assert!((p.moment - 0.5 * expected_mass * 100.0).abs() < 1e-1);
        assert_eq!(world.friction_of(&p), Some(0.1));
    }

    #[test]
    fn body_state_roundtrip() {
        let mut world = PhysicsWorld::new();
        let p = world.spawn_disk(
            Vector2::new(5.0, 7.0),
            Vector2::new(-3.0, 2.0),
            1.5,
            4.0,
            0.0,
        );
        let state = world.body_state(p.body).unwrap();
        assert_eq!(state.position, Vector2::new(5.0, 7.0));
        assert_eq!(state.velocity, Vector2::new(-3.0, 2.0));
        assert_eq!(state.angular_velocity, 1.5);

        let altered = BodyState {
            position: Vector2::new(1.0, 2.0),
            velocity: Vector2::new(0.5, -0.5),
            angle: 0.75,
            angular_velocity: -2.0,
        };
        world.set_body_state(p.body, &altered);
        let read_back = world.body_state(p.body).unwrap();
        assert!((read_back.position - altered.position).norm() < 1e-6);
        assert!((read_back.velocity - altered.velocity).norm() < 1e-6);
        assert!((read_back.angle - altered.angle).abs() < 1e-6);
        assert!((read_back.angular_velocity - altered.angular_velocity).abs() < 1e-6);
    }

    #[test]
    fn remove_particle_frees_body_and_collider() {
        let mut world = PhysicsWorld::new();
        let p = world.spawn_disk(Vector2::new(0.0, 0.0), Vector2::zeros(), 0.0, 5.0, 0.0);
        let handle = p.body;
        world.remove_particle(p);
        assert!(world.body(handle).is_none());
    }

    #[test]
    fn free_disk_moves_under_step_without_gravity() {
        let mut world = PhysicsWorld::new();
        let p = world.spawn_disk(
            Vector2::new(0.0, 0.0),
            Vector2::new(60.0, 0.0),
            0.0,
            5.0,
            0.0,
        );
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let state = world.body_state(p.body).unwrap();
        assert!((state.position.x - 60.0).abs() < 1.0);
        assert!(state.position.y.abs() < 1e-3);
    }
}
