//! Reproducible random simple polygons (radial jitter + replay tokens).
//!
//! Model
//! - `n` angles equally spaced on [0, 2π), each jittered by less than half the
//!   spacing so the angular order is preserved, then a jittered radius per
//!   angle. The result is star-shaped around the origin and therefore simple;
//!   with enough radial jitter it is concave.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Point;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Star-polygon sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct StarCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`. Clamped to [0, 0.95].
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
    /// Emit vertices in clockwise order.
    pub clockwise: bool,
}

impl Default for StarCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(32),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.5,
            base_radius: 1.0,
            random_phase: true,
            clockwise: false,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random star-shaped simple polygon as an ordered vertex list.
pub fn draw_star_polygon(cfg: StarCfg, tok: ReplayToken) -> Vec<Point> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let mut pts: Vec<Point> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            Point::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    if cfg.clockwise {
        pts.reverse();
    }
    pts
}
