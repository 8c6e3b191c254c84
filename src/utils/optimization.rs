//! Bounded Nelder-Mead minimisation for model parameter estimation.

use std::cmp::Ordering;

/// Best vertex of a finished simplex search.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Coordinates of the best vertex.
    pub optimal_point: Vec<f64>,
    /// Objective at `optimal_point`.
    pub optimal_value: f64,
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Step coefficients and stopping rule of [`nelder_mead`].
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Iteration budget.
    pub max_iter: usize,
    /// Convergence tolerance on both the value spread and the simplex size.
    pub tolerance: f64,
    /// Reflection.
    pub alpha: f64,
    /// Expansion.
    pub gamma: f64,
    /// Contraction.
    pub rho: f64,
    /// Shrink towards the best vertex.
    pub sigma: f64,
    /// Initial simplex step, relative to the starting coordinate when it is
    /// non-zero (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Simplex vertices with their objective values, kept sorted best first.
struct Simplex<'a, F> {
    objective: F,
    bounds: Option<&'a [(f64, f64)]>,
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl<'a, F> Simplex<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn new(objective: F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self {
        let mut vertices = Vec::with_capacity(initial.len() + 1);
        vertices.push(clamp(initial, bounds));
        for i in 0..initial.len() {
            let mut vertex = initial.to_vec();
            vertex[i] += if initial[i].abs() > 1e-10 {
                step * initial[i].abs()
            } else {
                step
            };
            vertices.push(clamp(&vertex, bounds));
        }

        let mut simplex = Self {
            objective,
            bounds,
            values: Vec::new(),
            vertices,
        };
        let values: Vec<f64> = simplex
            .vertices
            .iter()
            .map(|v| simplex.evaluate(v))
            .collect();
        simplex.values = values;
        simplex.sort();
        simplex
    }

    /// Objective value with NaN mapped to +inf so it never wins a comparison.
    fn evaluate(&self, point: &[f64]) -> f64 {
        let value = (self.objective)(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        self.vertices = order.iter().map(|&i| self.vertices[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.values.len() - 1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let dim = self.vertices[0].len();
        let count = self.worst() as f64;
        let mut centroid = vec![0.0; dim];
        for vertex in &self.vertices[..self.worst()] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    fn has_converged(&self, centroid: &[f64], tolerance: f64) -> bool {
        let spread = self.values[self.worst()] - self.values[0];
        if spread < tolerance {
            return true;
        }
        let size = self
            .vertices
            .iter()
            .map(|v| distance(v, centroid))
            .fold(0.0, f64::max);
        size < tolerance
    }

    /// Point `centroid + coef * (towards - centroid)`, clamped and evaluated.
    fn trial_point(&self, centroid: &[f64], towards: &[f64], coef: f64) -> (Vec<f64>, f64) {
        let point: Vec<f64> = centroid
            .iter()
            .zip(towards)
            .map(|(c, t)| c + coef * (t - c))
            .collect();
        let point = clamp(&point, self.bounds);
        let value = self.evaluate(&point);
        (point, value)
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let worst = self.worst();
        self.vertices[worst] = point;
        self.values[worst] = value;
    }

    fn shrink(&mut self, sigma: f64) {
        let best = self.vertices[0].clone();
        for i in 1..self.vertices.len() {
            let shrunk: Vec<f64> = best
                .iter()
                .zip(&self.vertices[i])
                .map(|(b, x)| b + sigma * (x - b))
                .collect();
            self.vertices[i] = clamp(&shrunk, self.bounds);
            self.values[i] = self.evaluate(&self.vertices[i]);
        }
    }

    fn step(&mut self, centroid: &[f64], config: &NelderMeadConfig) {
        let worst = self.worst();
        let worst_point = self.vertices[worst].clone();
        let (reflected, reflected_value) = self.trial_point(centroid, &worst_point, -config.alpha);

        if reflected_value < self.values[0] {
            let (expanded, expanded_value) = self.trial_point(centroid, &reflected, config.gamma);
            if expanded_value < reflected_value {
                self.replace_worst(expanded, expanded_value);
            } else {
                self.replace_worst(reflected, reflected_value);
            }
            return;
        }

        if reflected_value < self.values[worst - 1] {
            self.replace_worst(reflected, reflected_value);
            return;
        }

        if reflected_value < self.values[worst] {
            let (contracted, value) = self.trial_point(centroid, &reflected, config.rho);
            if value <= reflected_value {
                self.replace_worst(contracted, value);
                return;
            }
        } else {
            let (contracted, value) = self.trial_point(centroid, &worst_point, config.rho);
            if value < self.values[worst] {
                self.replace_worst(contracted, value);
                return;
            }
        }

        self.shrink(config.sigma);
    }
}

/// Minimise `objective` from `initial` with the downhill simplex method.
///
/// Every trial point is clamped into `bounds` (one `(min, max)` pair per
/// coordinate) before evaluation. A NaN objective ranks as `+inf`, so the
/// simplex walks away from regions where the objective is undefined. An
/// empty `initial` returns an unconverged result with a NaN value.
///
/// # Example
/// ```
/// use tickercast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Bowl centred on (2, 3)
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let mut simplex = Simplex::new(objective, initial, bounds, config.initial_step);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let centroid = simplex.centroid();
        if simplex.has_converged(&centroid, config.tolerance) {
            converged = true;
            break;
        }

        simplex.step(&centroid, config);
        simplex.sort();
    }

    NelderMeadResult {
        optimal_point: simplex.vertices[0].clone(),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}

fn clamp(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
