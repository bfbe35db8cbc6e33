//! Characterization methods.

mod dscan;
mod frog;
mod ifrog;
mod miips;
mod tdp;

pub use dscan::Dscan;
pub use frog::Frog;
pub use ifrog::Ifrog;
pub use miips::Miips;
pub use tdp::Tdp;

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use crate::{gaussian_envelope, Dispersion, Pulse, PulseDescriptor, SamplingGrid};

    /// A 5 fs pulse at 750 nm on a 512 point, 0.5 fs grid.
    pub(crate) fn test_pulse(gdd: f64, tod: f64) -> Pulse {
        let grid = Arc::new(SamplingGrid::from_wavelength(512, 0.5e-15, 750e-9).unwrap());
        let dispersion = Dispersion { gdd, tod };
        Pulse::synthesize(PulseDescriptor {
            grid,
            envelope_fn: gaussian_envelope(5e-15),
            spectral_phase_fn: move |w| dispersion.phase(w),
        })
        .unwrap()
    }
}
