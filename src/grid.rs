use std::f64::consts::PI;

use ndarray::Array1;
use physical_constants::SPEED_OF_LIGHT_IN_VACUUM;

use crate::{Error, FourierTransform};

/// Parameters of a sampling grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridDescriptor {
    /// Number of samples. Powers of two transform fastest.
    pub npoints: usize,
    /// Time step in seconds.
    pub dt: f64,
    /// Carrier angular frequency in rad/s, the offset of the frequency axis.
    pub w0: f64,
}

/// A time axis and its Fourier-conjugate angular-frequency axis.
///
/// The time axis is `t_k = (k - N/2) dt`. The frequency axis `w_n = (n - N/2) dw`
/// with `dw = 2π / (N dt)` is relative to the carrier `w0`; absolute frequencies
/// are `w + w0`. Immutable once built.
#[derive(Clone, Debug)]
pub struct SamplingGrid {
    npoints: usize,
    dt: f64,
    dw: f64,
    w0: f64,
    t: Array1<f64>,
    w: Array1<f64>,
    ft: FourierTransform,
}

impl SamplingGrid {
    /// Builds a new grid.
    pub fn new(desc: GridDescriptor) -> Result<Self, Error> {
        let GridDescriptor { npoints, dt, w0 } = desc;
        let invalid = |reason: &str| Error::InvalidGrid {
            npoints,
            dt,
            reason: reason.to_string(),
        };

        if npoints < 2 {
            return Err(invalid("at least 2 points are required"));
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(invalid("time step must be positive and finite"));
        }
        if !w0.is_finite() {
            return Err(invalid("carrier frequency must be finite"));
        }
        if !npoints.is_power_of_two() {
            log::warn!("grid size {} is not a power of two", npoints);
        }

        let dw = 2.0 * PI / (npoints as f64 * dt);
        let half = (npoints / 2) as f64;
        let t0 = -half * dt;
        let w_start = -half * dw;

        let t = Array1::from_iter((0..npoints).map(|k| t0 + k as f64 * dt));
        let w = Array1::from_iter((0..npoints).map(|n| w_start + n as f64 * dw));
        let ft = FourierTransform::new(npoints, dt, dw, t0, w_start);

        log::debug!("built grid: N = {}, dt = {:e} s, dw = {:e} rad/s", npoints, dt, dw);

        Ok(Self { npoints, dt, dw, w0, t, w, ft })
    }

    /// Builds a grid whose carrier sits at the central wavelength `wl0` (meters).
    pub fn from_wavelength(npoints: usize, dt: f64, wl0: f64) -> Result<Self, Error> {
        if !(wl0 > 0.0) || !wl0.is_finite() {
            return Err(Error::InvalidGrid {
                npoints,
                dt,
                reason: format!("central wavelength {} m must be positive", wl0),
            });
        }

        Self::new(GridDescriptor {
            npoints,
            dt,
            w0: wavelength_to_frequency(wl0),
        })
    }

    #[inline]
    pub fn npoints(&self) -> usize {
        self.npoints
    }
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }
    #[inline]
    pub fn dw(&self) -> f64 {
        self.dw
    }
    #[inline]
    pub fn w0(&self) -> f64 {
        self.w0
    }
    /// Time axis in seconds.
    #[inline]
    pub fn t(&self) -> &Array1<f64> {
        &self.t
    }
    /// Angular-frequency axis in rad/s, relative to `w0`.
    #[inline]
    pub fn w(&self) -> &Array1<f64> {
        &self.w
    }
    #[inline]
    pub fn fourier(&self) -> &FourierTransform {
        &self.ft
    }

    /// Absolute angular frequencies `w + w0`.
    pub fn absolute_frequencies(&self) -> Array1<f64> {
        self.w.mapv(|w| w + self.w0)
    }

    /// Vacuum wavelengths in meters.
    ///
    /// Samples at non-positive absolute frequency map to `f64::INFINITY`.
    pub fn wavelengths(&self) -> Array1<f64> {
        self.w.mapv(|w| frequency_to_wavelength(w + self.w0))
    }

    /// The conventional delay sweep: the time axis traversed backwards, from
    /// `t[N-1]` down to `t[0]`, so the scan spans the whole window.
    pub fn mirrored_delays(&self) -> Array1<f64> {
        Array1::linspace(self.t[self.npoints - 1], self.t[0], self.npoints)
    }
}

/// Converts a vacuum wavelength (m) to angular frequency (rad/s).
#[inline]
pub fn wavelength_to_frequency(wl: f64) -> f64 {
    2.0 * PI * SPEED_OF_LIGHT_IN_VACUUM / wl
}

/// Converts an angular frequency (rad/s) to vacuum wavelength (m).
#[inline]
pub fn frequency_to_wavelength(w: f64) -> f64 {
    if w > 0.0 {
        2.0 * PI * SPEED_OF_LIGHT_IN_VACUUM / w
    } else {
        f64::INFINITY
    }
}
