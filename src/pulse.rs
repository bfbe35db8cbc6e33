use std::f64::consts::{LN_2, PI};
use std::ops::{Add, Mul};
use std::sync::Arc;

use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;

use crate::{Error, SamplingGrid, SpectralData};

/// Describes a synthetic pulse.
pub struct PulseDescriptor<Fe: Fn(f64) -> Complex64, Fp: Fn(f64) -> f64> {
    pub grid: Arc<SamplingGrid>,
    /// Temporal envelope, evaluated on the grid's time axis.
    pub envelope_fn: Fe,
    /// Spectral phase in radians as a function of the offset from the carrier.
    pub spectral_phase_fn: Fp,
}

/// Polynomial spectral phase `GDD Δω²/2 + TOD Δω³/6`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dispersion {
    /// Group-delay dispersion in s².
    pub gdd: f64,
    /// Third-order dispersion in s³.
    pub tod: f64,
}

impl Dispersion {
    #[inline]
    pub fn phase(&self, dw: f64) -> f64 {
        self.gdd * dw.powi(2) / 2.0 + self.tod * dw.powi(3) / 6.0
    }
}

/// Gaussian field envelope whose intensity has the given full width at half maximum.
pub fn gaussian_envelope(fwhm: f64) -> impl Fn(f64) -> Complex64 {
    move |t| Complex64::new((-2.0 * LN_2 * (t / fwhm).powi(2)).exp(), 0.0)
}

/// A complex electric field held in both time and frequency representation.
///
/// The two arrays are always a transform pair on the pulse's grid: there are no
/// setters, and every way of building or changing a pulse computes both.
#[derive(Clone, Debug)]
pub struct Pulse {
    grid: Arc<SamplingGrid>,
    field: Array1<Complex64>,
    spectrum: Array1<Complex64>,
}

impl Pulse {
    /// Creates a pulse from time-domain samples.
    pub fn from_field(grid: Arc<SamplingGrid>, field: Array1<Complex64>) -> Result<Self, Error> {
        check_length("Field", field.len(), grid.npoints())?;
        let spectrum = grid.fourier().forward(field.view());

        Ok(Self { grid, field, spectrum })
    }

    /// Creates a pulse from frequency-domain samples.
    pub fn from_spectrum(
        grid: Arc<SamplingGrid>,
        spectrum: Array1<Complex64>,
    ) -> Result<Self, Error> {
        check_length("Spectrum", spectrum.len(), grid.npoints())?;
        let field = grid.fourier().backward(spectrum.view());

        Ok(Self { grid, field, spectrum })
    }

    /// Synthesizes a pulse from an envelope and a spectral phase, then recenters it
    /// so its intensity peak sits at the time origin.
    pub fn synthesize<Fe: Fn(f64) -> Complex64, Fp: Fn(f64) -> f64>(
        desc: PulseDescriptor<Fe, Fp>,
    ) -> Result<Self, Error> {
        let field = desc.grid.t().mapv(|t| (desc.envelope_fn)(t));
        let pulse = Self::from_field(desc.grid, field)?
            .with_spectral_phase(desc.spectral_phase_fn)
            .recentered();

        log::debug!(
            "synthesized pulse: fwhm = {:?} s, peak at index {}",
            pulse.fwhm(),
            pulse.peak_index(),
        );

        Ok(pulse)
    }

    /// Builds a pulse from tabulated spectral intensity and phase.
    ///
    /// The table is interpolated onto the grid's wavelength axis; wavelengths
    /// outside the tabulated range get zero intensity and zero phase. The
    /// spectrum is `sqrt(intensity) exp(i phase)`. No recentering is done.
    pub fn import_from_spectrum(
        grid: Arc<SamplingGrid>,
        data: &SpectralData,
    ) -> Result<Self, Error> {
        let wavelengths = grid.wavelengths();
        let clamped = data.intensity().mapv(|i| i.max(0.0));

        let spectrum = wavelengths.mapv(|wl| {
            let intensity = interpolate(wl, data.wavelengths().view(), clamped.view());
            let phase = interpolate(wl, data.wavelengths().view(), data.phase().view());
            match (intensity, phase) {
                (Some(intensity), Some(phase)) => Complex64::from_polar(intensity.sqrt(), phase),
                _ => Complex64::new(0.0, 0.0),
            }
        });

        let covered = spectrum.iter().filter(|s| s.norm_sqr() > 0.0).count();
        if covered == 0 {
            log::warn!("imported spectrum does not overlap the grid's wavelength axis");
        } else {
            log::debug!("imported spectrum covers {} of {} grid points", covered, grid.npoints());
        }

        Self::from_spectrum(grid, spectrum)
    }

    /// Returns a new pulse with `spectrum * exp(i phase_fn(Δω))`.
    pub fn with_spectral_phase<Fp: Fn(f64) -> f64>(&self, phase_fn: Fp) -> Self {
        let mut spectrum = self.spectrum.clone();
        Zip::from(&mut spectrum)
            .and(self.grid.w())
            .for_each(|s, &w| *s *= Complex64::from_polar(1.0, phase_fn(w)));

        self.replace_spectrum(spectrum)
    }

    /// Returns a new pulse shifted in time so that its intensity peak sits at the origin.
    ///
    /// The shift is a linear spectral phase, which on this grid is an exact
    /// circular shift by whole samples.
    pub fn recentered(&self) -> Self {
        let t_peak = self.grid.t()[self.peak_index()];
        if t_peak == 0.0 {
            return self.clone();
        }
        self.with_spectral_phase(|w| -t_peak * w)
    }

    fn replace_spectrum(&self, spectrum: Array1<Complex64>) -> Self {
        let field = self.grid.fourier().backward(spectrum.view());
        Self {
            grid: Arc::clone(&self.grid),
            field,
            spectrum,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Arc<SamplingGrid> {
        &self.grid
    }
    #[inline]
    pub fn t(&self) -> &Array1<f64> {
        self.grid.t()
    }
    #[inline]
    pub fn w(&self) -> &Array1<f64> {
        self.grid.w()
    }
    #[inline]
    pub fn w0(&self) -> f64 {
        self.grid.w0()
    }
    #[inline]
    pub fn field(&self) -> ArrayView1<Complex64> {
        self.field.view()
    }
    #[inline]
    pub fn spectrum(&self) -> ArrayView1<Complex64> {
        self.spectrum.view()
    }

    /// `|field|²`
    pub fn intensity(&self) -> Array1<f64> {
        self.field.mapv(|e| e.norm_sqr())
    }

    /// `|spectrum|²`
    pub fn spectral_intensity(&self) -> Array1<f64> {
        self.spectrum.mapv(|s| s.norm_sqr())
    }

    pub fn amplitude(&self) -> Array1<f64> {
        self.field.mapv(|e| e.norm())
    }

    /// Unwrapped temporal phase.
    pub fn phase(&self) -> Array1<f64> {
        unwrap_phase(self.field.mapv(|e| e.arg()))
    }

    /// Unwrapped spectral phase.
    pub fn spectral_phase(&self) -> Array1<f64> {
        unwrap_phase(self.spectrum.mapv(|s| s.arg()))
    }

    /// `Σ |E(t)|² dt`
    pub fn energy(&self) -> f64 {
        self.field.iter().map(|e| e.norm_sqr()).sum::<f64>() * self.grid.dt()
    }

    /// `2π Σ |Ẽ(ω)|² dω`, equal to [`Pulse::energy`] by Parseval's theorem.
    pub fn spectral_energy(&self) -> f64 {
        2.0 * PI * self.spectrum.iter().map(|s| s.norm_sqr()).sum::<f64>() * self.grid.dw()
    }

    /// Index of the temporal intensity maximum.
    pub fn peak_index(&self) -> usize {
        argmax(self.intensity().view())
    }

    /// Full width at half maximum of the temporal intensity, in seconds.
    pub fn fwhm(&self) -> Option<f64> {
        fwhm(self.grid.t().view(), self.intensity().view())
    }

    /// Full width at half maximum of the spectral intensity, in rad/s.
    pub fn spectral_fwhm(&self) -> Option<f64> {
        fwhm(self.grid.w().view(), self.spectral_intensity().view())
    }

    /// Product of the temporal FWHM and the spectral FWHM in Hz.
    pub fn time_bandwidth_product(&self) -> Option<f64> {
        Some(self.fwhm()? * self.spectral_fwhm()? / (2.0 * PI))
    }

    /// Field interpolated at arbitrary times, zero outside the grid.
    ///
    /// Real and imaginary parts are interpolated separately, so grid nodes return
    /// the stored samples exactly.
    pub fn field_at(&self, t: ArrayView1<f64>) -> Array1<Complex64> {
        t.mapv(|t| {
            interpolate(t, self.grid.t().view(), self.field.view()).unwrap_or_default()
        })
    }

    /// Spectrum interpolated at arbitrary relative frequencies, zero outside the grid.
    pub fn spectrum_at(&self, w: ArrayView1<f64>) -> Array1<Complex64> {
        w.mapv(|w| {
            interpolate(w, self.grid.w().view(), self.spectrum.view()).unwrap_or_default()
        })
    }

    /// Writes axes, field and spectrum into `group`.
    pub fn save(&self, group: &hdf5::Group) -> Result<(), Error> {
        let n = self.grid.npoints();
        let write = |name: &str, data: &Array1<f64>| -> Result<(), Error> {
            group.new_dataset::<f64>().shape(n).create(name)?.write(data)?;
            Ok(())
        };

        write("t", self.grid.t())?;
        write("w", self.grid.w())?;
        write("wavelength", &self.grid.wavelengths())?;
        write("field_re", &self.field.mapv(|e| e.re))?;
        write("field_im", &self.field.mapv(|e| e.im))?;
        write("spectrum_re", &self.spectrum.mapv(|s| s.re))?;
        write("spectrum_im", &self.spectrum.mapv(|s| s.im))?;

        for (name, value) in [("dt", self.grid.dt()), ("w0", self.grid.w0())] {
            group.new_attr::<f64>()
                .shape(hdf5::Extents::Scalar)
                .create(name)?
                .write_scalar(&value)?;
        }

        Ok(())
    }
}

fn check_length(array_name: &str, input_length: usize, expected_length: usize) -> Result<(), Error> {
    if input_length != expected_length {
        return Err(Error::DimensionMismatch {
            array_name: array_name.to_string(),
            input_length,
            expected_length,
        });
    }
    Ok(())
}

/// Linear interpolation on an increasing axis. `None` outside `[xs[0], xs[n-1]]`.
pub(crate) fn interpolate<V>(x: f64, xs: ArrayView1<f64>, ys: ArrayView1<V>) -> Option<V>
where
    V: Copy + Add<Output = V> + Mul<f64, Output = V>,
{
    let n = xs.len();
    if n == 0 || x.is_nan() || x < xs[0] || x > xs[n - 1] {
        return None;
    }

    // binary search for the enclosing interval
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    if xs[lo] == x {
        return Some(ys[lo]);
    }
    if xs[hi] == x {
        return Some(ys[hi]);
    }
    let frac = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Some(ys[lo] * (1.0 - frac) + ys[hi] * frac)
}

pub(crate) fn argmax(values: ArrayView1<f64>) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max { (i, v) } else { (best, max) }
        })
        .0
}

fn unwrap_phase(mut phase: Array1<f64>) -> Array1<f64> {
    let mut offset = 0.0;
    let mut last = match phase.first() {
        Some(&p) => p,
        None => return phase,
    };
    for p in phase.iter_mut().skip(1) {
        let raw = *p;
        let jump = raw - last;
        if jump > PI {
            offset -= 2.0 * PI;
        } else if jump < -PI {
            offset += 2.0 * PI;
        }
        last = raw;
        *p = raw + offset;
    }
    phase
}

/// Width between the outermost half-maximum crossings, linearly interpolated.
fn fwhm(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<f64> {
    let peak = argmax(y);
    let half = y[peak] / 2.0;
    if !(half > 0.0) {
        return None;
    }

    let crossing = |i: usize, j: usize| x[i] + (half - y[i]) * (x[j] - x[i]) / (y[j] - y[i]);
    let left = (1..=peak).rev().find(|&i| y[i - 1] < half).map(|i| crossing(i - 1, i))?;
    let right = (peak..y.len() - 1).find(|&i| y[i + 1] < half).map(|i| crossing(i, i + 1))?;

    Some(right - left)
}
