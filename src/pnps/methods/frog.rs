use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::pnps::{apply_phase, gate_signal, Method, Process};
use crate::{Error, NonlinearProcess, SamplingGrid};

/// Frequency-resolved optical gating: the pulse is gated by a delayed replica of itself.
pub struct Frog {
    grid: Arc<SamplingGrid>,
    process: Process,
}

impl Frog {
    pub fn new(grid: Arc<SamplingGrid>, process: Process) -> Result<Self, Error> {
        Method::Frog.check(process)?;
        Ok(Self { grid, process })
    }
}

impl NonlinearProcess for Frog {
    fn generate_signal(&self, spectrum: ArrayView1<Complex64>, delay: f64) -> Array1<Complex64> {
        let ft = self.grid.fourier();
        let field = ft.backward(spectrum);
        // exp(+iωτ) delays the replica by τ
        let gate = ft.backward(apply_phase(&self.grid, spectrum, |w| w * delay).view());

        ft.forward(gate_signal(self.process, field.view(), gate.view()).view())
    }

    fn method(&self) -> Method {
        Method::Frog
    }

    fn process(&self) -> Process {
        self.process
    }
}
