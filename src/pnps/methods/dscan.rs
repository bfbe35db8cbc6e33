use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::pnps::{apply_phase, collinear_signal, Method, Process};
use crate::{Error, NonlinearProcess, SamplingGrid};

/// Dispersion scan: the scan parameter is group-delay dispersion added to the pulse.
pub struct Dscan {
    grid: Arc<SamplingGrid>,
    process: Process,
}

impl Dscan {
    pub fn new(grid: Arc<SamplingGrid>, process: Process) -> Result<Self, Error> {
        Method::Dscan.check(process)?;
        Ok(Self { grid, process })
    }
}

impl NonlinearProcess for Dscan {
    fn generate_signal(&self, spectrum: ArrayView1<Complex64>, gdd: f64) -> Array1<Complex64> {
        let ft = self.grid.fourier();
        let dispersed = apply_phase(&self.grid, spectrum, |w| gdd * w * w / 2.0);
        let field = ft.backward(dispersed.view());

        ft.forward(collinear_signal(self.process, field.view()).view())
    }

    fn method(&self) -> Method {
        Method::Dscan
    }

    fn process(&self) -> Process {
        self.process
    }
}
