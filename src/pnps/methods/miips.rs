use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::pnps::{apply_phase, collinear_signal, Method, Process};
use crate::{Error, NonlinearProcess, SamplingGrid};

/// Multiphoton intrapulse interference phase scan: a sinusoidal spectral phase
/// `alpha cos(gamma Δω - delta)` is scanned through its offset `delta`.
pub struct Miips {
    grid: Arc<SamplingGrid>,
    process: Process,
    alpha: f64,
    gamma: f64,
}

impl Miips {
    pub fn new(
        grid: Arc<SamplingGrid>,
        process: Process,
        alpha: f64,
        gamma: f64,
    ) -> Result<Self, Error> {
        Method::Miips.check(process)?;
        Ok(Self { grid, process, alpha, gamma })
    }
}

impl NonlinearProcess for Miips {
    fn generate_signal(&self, spectrum: ArrayView1<Complex64>, delta: f64) -> Array1<Complex64> {
        let ft = self.grid.fourier();
        let (alpha, gamma) = (self.alpha, self.gamma);
        let shaped = apply_phase(&self.grid, spectrum, |w| alpha * (gamma * w - delta).cos());
        let field = ft.backward(shaped.view());

        ft.forward(collinear_signal(self.process, field.view()).view())
    }

    fn method(&self) -> Method {
        Method::Miips
    }

    fn process(&self) -> Process {
        self.process
    }
}
