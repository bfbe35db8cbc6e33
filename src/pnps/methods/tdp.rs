use std::sync::Arc;

use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;

use crate::pnps::{gate_signal, Method, Process};
use crate::{Error, NonlinearProcess, SamplingGrid};

/// Time-domain ptychography: like FROG, but the delayed gate passes through a
/// Gaussian spectral band-pass first.
pub struct Tdp {
    grid: Arc<SamplingGrid>,
    process: Process,
    filter: Array1<f64>,
}

impl Tdp {
    pub fn new(
        grid: Arc<SamplingGrid>,
        process: Process,
        filter_center: f64,
        filter_width: f64,
    ) -> Result<Self, Error> {
        Method::Tdp.check(process)?;
        let filter = grid
            .w()
            .mapv(|w| (-((w - filter_center) / filter_width).powi(2)).exp());

        Ok(Self { grid, process, filter })
    }
}

impl NonlinearProcess for Tdp {
    fn generate_signal(&self, spectrum: ArrayView1<Complex64>, delay: f64) -> Array1<Complex64> {
        let ft = self.grid.fourier();
        let field = ft.backward(spectrum);

        let mut gate = spectrum.to_owned();
        Zip::from(&mut gate)
            .and(&self.filter)
            .and(self.grid.w())
            .for_each(|g, &h, &w| *g *= Complex64::from_polar(h, w * delay));
        let gate = ft.backward(gate.view());

        ft.forward(gate_signal(self.process, field.view(), gate.view()).view())
    }

    fn method(&self) -> Method {
        Method::Tdp
    }

    fn process(&self) -> Process {
        self.process
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnps::methods::tests::test_pulse;
    use crate::pnps::methods::Frog;

    #[test]
    fn test_wide_filter_reduces_to_frog() {
        let pulse = test_pulse(245e-30, 0.0);
        let grid = Arc::clone(pulse.grid());
        let tdp = Tdp::new(Arc::clone(&grid), Process::Shg, 0.0, 1e30).unwrap();
        let frog = Frog::new(grid, Process::Shg).unwrap();

        let a = tdp.generate_signal(pulse.spectrum(), 7e-15);
        let b = frog.generate_signal(pulse.spectrum(), 7e-15);
        let max = b.iter().map(|s| s.norm()).fold(0.0, f64::max);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() <= 1e-9 * max);
        }
    }

    #[test]
    fn test_narrow_filter_weakens_signal() {
        let pulse = test_pulse(0.0, 0.0);
        let grid = Arc::clone(pulse.grid());
        let narrow = Tdp::new(Arc::clone(&grid), Process::Pg, 0.0, 2e13).unwrap();
        let wide = Tdp::new(grid, Process::Pg, 0.0, 1e30).unwrap();

        let energy = |s: Array1<Complex64>| s.iter().map(|s| s.norm_sqr()).sum::<f64>();
        let narrow = energy(narrow.generate_signal(pulse.spectrum(), 0.0));
        let wide = energy(wide.generate_signal(pulse.spectrum(), 0.0));
        assert!(narrow < wide);
    }
}
