// Chaotic-equation sequence generators.
//
// Each attractor iterates a chaotic dynamical system and reports the x
// coordinate per step, yielding a flat numeric sequence with both variation
// and self-similarity — better raw material for melody than uniform noise.
// The composer core never looks inside these: it only consumes the finite
// ordered sample runs produced here.
//
// The three continuous flows (Lorenz, Rössler, Chua) share a fourth-order
// Runge-Kutta integrator; Hénon is a discrete map and steps directly.
//
// **Critical constraint: determinism.** Generators carry no randomness.
// Two attractors built by the same constructor produce identical runs,
// so experiment batches are reproducible without any seeding.

use serde::{Deserialize, Serialize};

/// The closed set of supported chaotic equations.
///
/// Construct one with [`Attractor::standard`] (canonical parameters and
/// initial conditions), then pull samples with [`Attractor::step`] or one
/// of the run helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Attractor {
    Henon(Henon),
    Lorenz(Lorenz),
    Rossler(Rossler),
    Chua(Chua),
}

/// Names for the supported equations, used for CLI selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttractorKind {
    Henon,
    Lorenz,
    Rossler,
    Chua,
}

impl AttractorKind {
    pub const ALL: [AttractorKind; 4] = [
        AttractorKind::Henon,
        AttractorKind::Lorenz,
        AttractorKind::Rossler,
        AttractorKind::Chua,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AttractorKind::Henon => "henon",
            AttractorKind::Lorenz => "lorenz",
            AttractorKind::Rossler => "rossler",
            AttractorKind::Chua => "chua",
        }
    }

    /// Parse an equation name (case-insensitive). Returns None for
    /// anything outside the closed set.
    pub fn parse(name: &str) -> Option<AttractorKind> {
        let lower = name.to_lowercase();
        AttractorKind::ALL.into_iter().find(|k| k.name() == lower)
    }
}

impl Attractor {
    /// Build the named equation with its canonical parameters and
    /// initial conditions.
    pub fn standard(kind: AttractorKind) -> Attractor {
        match kind {
            AttractorKind::Henon => Attractor::Henon(Henon::standard()),
            AttractorKind::Lorenz => Attractor::Lorenz(Lorenz::standard()),
            AttractorKind::Rossler => Attractor::Rossler(Rossler::standard()),
            AttractorKind::Chua => Attractor::Chua(Chua::standard()),
        }
    }

    /// Advance the system one step and return the new x coordinate.
    pub fn step(&mut self) -> f64 {
        match self {
            Attractor::Henon(eq) => eq.step(),
            Attractor::Lorenz(eq) => eq.step(),
            Attractor::Rossler(eq) => eq.step(),
            Attractor::Chua(eq) => eq.step(),
        }
    }

    /// Produce `n` raw samples.
    pub fn raw_run(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.step()).collect()
    }

    /// Produce `n` samples folded to magnitudes and scaled to integers in
    /// `[0, spread]`. This is the control-path input format: arbitrary
    /// integers sharing the chaotic source's shape.
    pub fn scaled_run(&mut self, n: usize, spread: i64) -> Vec<i64> {
        let magnitudes: Vec<f64> = (0..n).map(|_| self.step().abs()).collect();
        let max = magnitudes.iter().fold(0.0_f64, |m, &v| m.max(v));
        if max == 0.0 {
            return vec![0; n];
        }
        magnitudes
            .iter()
            .map(|&v| (v / max * spread as f64) as i64)
            .collect()
    }
}

/// One fourth-order Runge-Kutta step of a three-dimensional flow.
fn rk4<F>(x: f64, y: f64, z: f64, dt: f64, f: F) -> (f64, f64, f64)
where
    F: Fn(f64, f64, f64) -> (f64, f64, f64),
{
    let (k1x, k1y, k1z) = f(x, y, z);
    let (k2x, k2y, k2z) = f(
        x + 0.5 * dt * k1x,
        y + 0.5 * dt * k1y,
        z + 0.5 * dt * k1z,
    );
    let (k3x, k3y, k3z) = f(
        x + 0.5 * dt * k2x,
        y + 0.5 * dt * k2y,
        z + 0.5 * dt * k2z,
    );
    let (k4x, k4y, k4z) = f(x + dt * k3x, y + dt * k3y, z + dt * k3z);
    (
        x + dt / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x),
        y + dt / 6.0 * (k1y + 2.0 * k2y + 2.0 * k3y + k4y),
        z + dt / 6.0 * (k1z + 2.0 * k2z + 2.0 * k3z + k4z),
    )
}

/// Hénon map: x' = y + 1 - 1.4x², y' = 0.3x. Discrete, no integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Henon {
    x: f64,
    y: f64,
}

impl Henon {
    pub fn standard() -> Henon {
        Henon { x: 1.0, y: 1.0 }
    }

    pub fn step(&mut self) -> f64 {
        let (x, y) = (self.x, self.y);
        self.x = (y + 1.0) - 1.4 * x * x;
        self.y = 0.3 * x;
        self.x
    }
}

/// Lorenz flow: dx = σ(y - x), dy = x(ρ - z) - y, dz = xy - βz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lorenz {
    sigma: f64,
    rho: f64,
    beta: f64,
    x: f64,
    y: f64,
    z: f64,
    dt: f64,
}

impl Lorenz {
    /// σ = 10, ρ = 28, β = 8/3, from (1, 1, 1) with dt = 0.01.
    pub fn standard() -> Lorenz {
        Lorenz {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            x: 1.0,
            y: 1.0,
            z: 1.0,
            dt: 0.01,
        }
    }

    pub fn step(&mut self) -> f64 {
        let (sigma, rho, beta) = (self.sigma, self.rho, self.beta);
        (self.x, self.y, self.z) = rk4(self.x, self.y, self.z, self.dt, |x, y, z| {
            (sigma * (y - x), x * (rho - z) - y, x * y - beta * z)
        });
        self.x
    }
}

/// Rössler flow: dx = -y - z, dy = x + ay, dz = b + z(x - c).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rossler {
    a: f64,
    b: f64,
    c: f64,
    x: f64,
    y: f64,
    z: f64,
    dt: f64,
}

impl Rossler {
    /// a = 0.1, b = 0.1, c = 14, from (1, 1, 1) with dt = 0.1.
    pub fn standard() -> Rossler {
        Rossler {
            a: 0.1,
            b: 0.1,
            c: 14.0,
            x: 1.0,
            y: 1.0,
            z: 1.0,
            dt: 0.1,
        }
    }

    pub fn step(&mut self) -> f64 {
        let (a, b, c) = (self.a, self.b, self.c);
        (self.x, self.y, self.z) = rk4(self.x, self.y, self.z, self.dt, |x, y, z| {
            (-y - z, x + a * y, b + z * (x - c))
        });
        self.x
    }
}

/// Chua circuit: dx = kα(y - x - f(x)), dy = k(x - y + z),
/// dz = k(-βy - γz), with the piecewise-linear diode curve
/// f(x) = bx + ½(a - b)(|x + 1| - |x - 1|).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chua {
    alpha: f64,
    beta: f64,
    a: f64,
    b: f64,
    k: f64,
    gamma: f64,
    x: f64,
    y: f64,
    z: f64,
    dt: f64,
}

impl Chua {
    pub fn standard() -> Chua {
        Chua {
            alpha: 9.3515908493,
            beta: 14.7903198054,
            a: -1.1384111956,
            b: -0.7224511209,
            k: 1.0,
            gamma: 0.0160739649,
            x: 1.0,
            y: 1.0,
            z: 1.0,
            dt: 0.01,
        }
    }

    pub fn step(&mut self) -> f64 {
        let (alpha, beta, k, gamma) = (self.alpha, self.beta, self.k, self.gamma);
        let (a, b) = (self.a, self.b);
        let diode =
            move |x: f64| b * x + 0.5 * ((a - b) * ((x + 1.0).abs() - (x - 1.0).abs()));
        (self.x, self.y, self.z) = rk4(self.x, self.y, self.z, self.dt, |x, y, z| {
            (
                k * alpha * (y - x - diode(x)),
                k * (x - y + z),
                k * (-beta * y - gamma * z),
            )
        });
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_constructor_same_run() {
        for kind in AttractorKind::ALL {
            let mut a = Attractor::standard(kind);
            let mut b = Attractor::standard(kind);
            assert_eq!(a.raw_run(200), b.raw_run(200), "{}", kind.name());
        }
    }

    #[test]
    fn henon_first_steps() {
        let mut eq = Henon::standard();
        // From (1, 1): x' = (1 + 1) - 1.4·1² = 0.6, y' = 0.3.
        let first = eq.step();
        assert!((first - 0.6).abs() < 1e-12);
        // From (0.6, 0.3): x' = 1.3 - 1.4·0.36 = 0.796.
        let second = eq.step();
        assert!((second - 0.796).abs() < 1e-12);
    }

    #[test]
    fn flows_stay_finite() {
        for kind in [
            AttractorKind::Lorenz,
            AttractorKind::Rossler,
            AttractorKind::Chua,
        ] {
            let mut eq = Attractor::standard(kind);
            for v in eq.raw_run(2000) {
                assert!(v.is_finite(), "{} diverged", kind.name());
            }
        }
    }

    #[test]
    fn scaled_run_bounds() {
        let mut eq = Attractor::standard(AttractorKind::Rossler);
        let run = eq.scaled_run(500, 48);
        assert_eq!(run.len(), 500);
        assert!(run.iter().all(|&v| (0..=48).contains(&v)));
        // The max-magnitude sample maps to the spread exactly.
        assert!(run.contains(&48));
    }

    #[test]
    fn kind_parse_round_trip() {
        for kind in AttractorKind::ALL {
            assert_eq!(AttractorKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(AttractorKind::parse("LORENZ"), Some(AttractorKind::Lorenz));
        assert_eq!(AttractorKind::parse("logistic"), None);
    }

    #[test]
    fn state_serialization_round_trip() {
        let mut eq = Attractor::standard(AttractorKind::Lorenz);
        eq.raw_run(100);
        let json = serde_json::to_string(&eq).unwrap();
        let mut restored: Attractor = serde_json::from_str(&json).unwrap();
        assert_eq!(eq.raw_run(50), restored.raw_run(50));
    }
}
