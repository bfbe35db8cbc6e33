use std::sync::Arc;

use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;

use crate::pnps::{collinear_signal, Method, Process};
use crate::{Error, NonlinearProcess, SamplingGrid};

/// Interferometric FROG: the pulse and its delayed replica copropagate, and the
/// process acts on their sum.
pub struct Ifrog {
    grid: Arc<SamplingGrid>,
    process: Process,
}

impl Ifrog {
    pub fn new(grid: Arc<SamplingGrid>, process: Process) -> Result<Self, Error> {
        Method::Ifrog.check(process)?;
        Ok(Self { grid, process })
    }
}

impl NonlinearProcess for Ifrog {
    fn generate_signal(&self, spectrum: ArrayView1<Complex64>, delay: f64) -> Array1<Complex64> {
        let ft = self.grid.fourier();
        let w0 = self.grid.w0();

        // the replica's carrier is delayed too, so the envelope picks up exp(iω0τ)
        let mut combined = spectrum.to_owned();
        Zip::from(&mut combined)
            .and(self.grid.w())
            .for_each(|s, &w| {
                *s *= Complex64::new(1.0, 0.0) + Complex64::from_polar(1.0, (w + w0) * delay)
            });
        let field = ft.backward(combined.view());

        ft.forward(collinear_signal(self.process, field.view()).view())
    }

    fn method(&self) -> Method {
        Method::Ifrog
    }

    fn process(&self) -> Process {
        self.process
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnps::methods::tests::test_pulse;

    #[test]
    fn test_zero_delay_is_doubled_field() {
        // at τ = 0 the combined field is 2E, so SHG is four times E²
        let pulse = test_pulse(0.0, 0.0);
        let ifrog = Ifrog::new(Arc::clone(pulse.grid()), Process::Shg).unwrap();
        let signal = ifrog.generate_signal(pulse.spectrum(), 0.0);

        let ft = pulse.grid().fourier();
        let reference = ft.forward(pulse.field().mapv(|e| 4.0 * e * e).view());
        let max = reference.iter().map(|s| s.norm()).fold(0.0, f64::max);
        for (x, y) in signal.iter().zip(reference.iter()) {
            assert!((x - y).norm() <= 1e-9 * max);
        }
    }

    #[test]
    fn test_large_delay_has_no_interference() {
        // far apart replicas: the cross terms vanish, leaving two copies of E²
        let pulse = test_pulse(0.0, 0.0);
        let ifrog = Ifrog::new(Arc::clone(pulse.grid()), Process::Shg).unwrap();
        let signal = ifrog.generate_signal(pulse.spectrum(), 60e-15);

        let single: f64 = pulse.field().iter().map(|e| (e * e).norm_sqr()).sum();
        let ft = pulse.grid().fourier();
        let field = ft.backward(signal.view());
        let total: f64 = field.iter().map(|s| s.norm_sqr()).sum();
        assert!((total - 2.0 * single).abs() < 1e-6 * single);
    }
}
