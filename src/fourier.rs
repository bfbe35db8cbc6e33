//! Discrete approximation of the continuous Fourier transform on a sampling grid.
//!
//! Convention:
//! - forward:  `Ẽ(ω) = dt/(2π) Σ E(t) exp(+iωt)`
//! - backward: `E(t) = dω Σ Ẽ(ω) exp(-iωt)`
//!
//! Both are evaluated on arbitrary (not zero-based) uniform axes by wrapping an
//! unnormalized `rustfft` transform with pre- and post-multiplied phase factors.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Transforms between the time and frequency axes of one grid.
#[derive(Clone)]
pub struct FourierTransform {
    // rustfft's inverse direction carries the exp(+i...) kernel
    forward_plan: Arc<dyn Fft<f64>>,
    backward_plan: Arc<dyn Fft<f64>>,
    pre_forward: Array1<Complex64>,
    post_forward: Array1<Complex64>,
    pre_backward: Array1<Complex64>,
    post_backward: Array1<Complex64>,
}

impl FourierTransform {
    /// Plans a transform between `t_k = t0 + k dt` and `w_n = w_start + n dw`.
    ///
    /// `dt * dw` must equal `2π / npoints`.
    pub(crate) fn new(npoints: usize, dt: f64, dw: f64, t0: f64, w_start: f64) -> Self {
        let mut planner = FftPlanner::new();
        let forward_plan = planner.plan_fft_inverse(npoints);
        let backward_plan = planner.plan_fft_forward(npoints);

        let index = |k: usize| k as f64;
        let pre_forward = (0..npoints)
            .map(|k| Complex64::from_polar(1.0, w_start * index(k) * dt))
            .collect::<Array1<_>>();
        let post_forward = (0..npoints)
            .map(|n| Complex64::from_polar(dt / (2.0 * PI), t0 * (w_start + index(n) * dw)))
            .collect::<Array1<_>>();
        let pre_backward = (0..npoints)
            .map(|n| Complex64::from_polar(1.0, -index(n) * dw * t0))
            .collect::<Array1<_>>();
        let post_backward = (0..npoints)
            .map(|k| Complex64::from_polar(dw, -w_start * (t0 + index(k) * dt)))
            .collect::<Array1<_>>();

        Self {
            forward_plan,
            backward_plan,
            pre_forward,
            post_forward,
            pre_backward,
            post_backward,
        }
    }

    #[inline]
    pub fn npoints(&self) -> usize {
        self.pre_forward.len()
    }

    /// Time domain to frequency domain.
    pub fn forward(&self, field: ArrayView1<Complex64>) -> Array1<Complex64> {
        Self::apply(&self.forward_plan, field, &self.pre_forward, &self.post_forward)
    }

    /// Frequency domain to time domain.
    pub fn backward(&self, spectrum: ArrayView1<Complex64>) -> Array1<Complex64> {
        Self::apply(&self.backward_plan, spectrum, &self.pre_backward, &self.post_backward)
    }

    fn apply(
        plan: &Arc<dyn Fft<f64>>,
        input: ArrayView1<Complex64>,
        pre: &Array1<Complex64>,
        post: &Array1<Complex64>,
    ) -> Array1<Complex64> {
        let mut buffer = input
            .iter()
            .zip(pre.iter())
            .map(|(x, p)| x * p)
            .collect::<Vec<_>>();
        plan.process(&mut buffer);

        buffer
            .into_iter()
            .zip(post.iter())
            .map(|(x, p)| x * p)
            .collect()
    }
}

impl fmt::Debug for FourierTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FourierTransform")
            .field("npoints", &self.npoints())
            .finish()
    }
}
