//! Simulation constants and tuning defaults.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Slack, in ticks, when checking that a period is a whole number of ticks.
pub const TICK_TOLERANCE: f32 = 1e-3;

/// Maximum fixed ticks run for a single rendered frame.
pub const MAX_SUBSTEPS: u32 = 8;

/// Gravity along -Y (m/s²).
pub const GRAVITY: f32 = 9.82;

// --- Round ---

/// Default round length in seconds.
pub const ROUND_DURATION_SECS: f32 = 30.0;

/// Seconds of simulated time between clock decrements.
pub const CLOCK_PERIOD_SECS: f32 = 1.0;

// --- Spawner ---

/// Seconds between target spawns.
pub const SPAWN_INTERVAL_SECS: f32 = 0.5;

/// Spawn volume: x in [-SPAWN_HALF_WIDTH, SPAWN_HALF_WIDTH).
pub const SPAWN_HALF_WIDTH: f32 = 10.0;
/// Spawn volume: y in [SPAWN_MIN_HEIGHT, SPAWN_MIN_HEIGHT + SPAWN_HEIGHT_RANGE).
pub const SPAWN_MIN_HEIGHT: f32 = 5.0;
pub const SPAWN_HEIGHT_RANGE: f32 = 10.0;
/// Spawn volume: z in [SPAWN_NEAR_Z - SPAWN_DEPTH_RANGE, SPAWN_NEAR_Z).
pub const SPAWN_NEAR_Z: f32 = -20.0;
pub const SPAWN_DEPTH_RANGE: f32 = 20.0;

/// Initial target velocity spread (m/s).
pub const SPAWN_LATERAL_SPEED: f32 = 2.5;
pub const SPAWN_VERTICAL_SPEED: f32 = 5.0;
pub const SPAWN_MIN_APPROACH_SPEED: f32 = 10.0;
pub const SPAWN_APPROACH_SPEED_RANGE: f32 = 10.0;
/// Initial angular velocity spread per axis (rad/s).
pub const SPAWN_ANGULAR_SPEED: f32 = 2.5;

// --- Bodies ---

pub const TARGET_MASS: f32 = 5.0;
pub const PROJECTILE_MASS: f32 = 1.0;
pub const PARTICLE_MASS: f32 = 0.1;

pub const BOX_HALF_EXTENT: f32 = 0.5;
pub const SPHERE_RADIUS: f32 = 0.6;
pub const CONE_RADIUS: f32 = 0.6;
pub const TORUS_COLLIDER_RADIUS: f32 = 0.7;

pub const PROJECTILE_RADIUS: f32 = 0.1;
pub const PARTICLE_HALF_EXTENT: f32 = 0.05;

// --- Firing ---

/// Projectile launch speed (m/s).
pub const PROJECTILE_SPEED: f32 = 35.0;

// --- Effects ---

pub const PARTICLES_PER_BURST: u32 = 20;
pub const PARTICLE_TTL_SECS: f32 = 1.0;
/// Maximum particle speed per axis (m/s).
pub const PARTICLE_SPEED: f32 = 7.5;

// --- Cleanup ---

/// Projectiles (and targets) below this height are released.
pub const FLOOR_Y: f32 = -10.0;
