//! Parameterized nonlinear process spectra (PNPS).
//!
//! A characterization [`Method`] decides how the scan parameter perturbs the pulse;
//! a nonlinear [`Process`] decides how the field copies combine into the signal.

pub mod methods;

mod trace_engine;

pub use trace_engine::{compute_trace, Trace, TraceEngine, TraceEngineDescriptor};

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{Error, NonlinearProcess, SamplingGrid};

/// The nonlinear optical interaction producing the signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// Second-harmonic generation.
    Shg,
    /// Third-harmonic generation.
    Thg,
    /// Self-diffraction.
    Sd,
    /// Polarization gating.
    Pg,
    /// Transient grating.
    Tg,
}

impl Process {
    pub const ALL: [Process; 5] = [Process::Shg, Process::Thg, Process::Sd, Process::Pg, Process::Tg];

    /// Harmonic order of the signal carrier relative to the pulse carrier.
    #[inline]
    pub fn order(&self) -> u32 {
        match self {
            Process::Shg => 2,
            Process::Thg => 3,
            Process::Sd | Process::Pg | Process::Tg => 1,
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Process::Shg => "shg",
            Process::Thg => "thg",
            Process::Sd => "sd",
            Process::Pg => "pg",
            Process::Tg => "tg",
        };
        f.write_str(name)
    }
}

/// The characterization method, i.e. what the scan parameter does to the pulse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Frequency-resolved optical gating; parameter is a delay (s).
    Frog,
    /// Time-domain ptychography; parameter is the delay (s) of a band-passed gate.
    Tdp,
    /// Dispersion scan; parameter is added group-delay dispersion (s²).
    Dscan,
    /// Multiphoton intrapulse interference phase scan; parameter is the mask phase (rad).
    Miips,
    /// Interferometric FROG; parameter is a delay (s).
    Ifrog,
}

impl Method {
    pub const ALL: [Method; 5] = [Method::Frog, Method::Tdp, Method::Dscan, Method::Miips, Method::Ifrog];

    /// Gating methods mix distinct field copies non-collinearly and accept every
    /// process; collinear methods only accept the harmonic and self-diffraction ones.
    pub fn supports(&self, process: Process) -> bool {
        match self {
            Method::Frog | Method::Tdp => true,
            Method::Dscan | Method::Miips | Method::Ifrog => {
                matches!(process, Process::Shg | Process::Thg | Process::Sd)
            }
        }
    }

    /// Label and unit of the scan parameter.
    pub fn parameter_axis(&self) -> (&'static str, &'static str) {
        match self {
            Method::Frog | Method::Tdp | Method::Ifrog => ("delay", "s"),
            Method::Dscan => ("GDD", "s^2"),
            Method::Miips => ("phase offset", "rad"),
        }
    }

    pub(crate) fn check(&self, process: Process) -> Result<(), Error> {
        if self.supports(process) {
            Ok(())
        } else {
            Err(Error::UnsupportedProcess { method: *self, process })
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Frog => "frog",
            Method::Tdp => "tdp",
            Method::Dscan => "dscan",
            Method::Miips => "miips",
            Method::Ifrog => "ifrog",
        };
        f.write_str(name)
    }
}

/// Method-specific settings, in SI units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodOptions {
    /// Center of the TDP gate band-pass, relative to the carrier (rad/s).
    pub tdp_filter_center: f64,
    /// 1/e half width of the Gaussian TDP gate band-pass (rad/s).
    pub tdp_filter_width: f64,
    /// MIIPS phase-mask amplitude (rad).
    pub miips_alpha: f64,
    /// MIIPS phase-mask period (s).
    pub miips_gamma: f64,
}

impl Default for MethodOptions {
    fn default() -> Self {
        Self {
            tdp_filter_center: 0.0,
            tdp_filter_width: 2.0 * PI * 10e12,
            miips_alpha: PI / 2.0,
            miips_gamma: 10e-15,
        }
    }
}

/// Builds the nonlinear process for a (method, process) pair on `grid`.
pub fn build(
    grid: Arc<SamplingGrid>,
    method: Method,
    process: Process,
    options: &MethodOptions,
) -> Result<Box<dyn NonlinearProcess>, Error> {
    Ok(match method {
        Method::Frog => Box::new(methods::Frog::new(grid, process)?),
        Method::Tdp => Box::new(methods::Tdp::new(
            grid,
            process,
            options.tdp_filter_center,
            options.tdp_filter_width,
        )?),
        Method::Dscan => Box::new(methods::Dscan::new(grid, process)?),
        Method::Miips => Box::new(methods::Miips::new(
            grid,
            process,
            options.miips_alpha,
            options.miips_gamma,
        )?),
        Method::Ifrog => Box::new(methods::Ifrog::new(grid, process)?),
    })
}

/// Generates the signal spectrum of one sweep step with default method options.
///
/// Pure: `spectrum` is only read.
pub fn generate_signal(
    grid: &Arc<SamplingGrid>,
    spectrum: ArrayView1<Complex64>,
    parameter: f64,
    process: Process,
    method: Method,
) -> Result<Array1<Complex64>, Error> {
    let nlp = build(Arc::clone(grid), method, process, &MethodOptions::default())?;
    Ok(nlp.generate_signal(spectrum, parameter))
}

/// Signal field of a gating method from the field `e` and its scan-perturbed copy `a`.
pub(crate) fn gate_signal(
    process: Process,
    e: ArrayView1<Complex64>,
    a: ArrayView1<Complex64>,
) -> Array1<Complex64> {
    let mut signal = Array1::<Complex64>::zeros(e.len());
    Zip::from(&mut signal).and(&e).and(&a).for_each(|s, &e, &a| {
        *s = match process {
            Process::Shg => e * a,
            Process::Thg => e * e * a,
            Process::Sd => e * e * a.conj(),
            Process::Pg => e * a.norm_sqr(),
            Process::Tg => a * e.norm_sqr(),
        };
    });
    signal
}

/// Signal field of a collinear method from the combined field `f`.
pub(crate) fn collinear_signal(process: Process, f: ArrayView1<Complex64>) -> Array1<Complex64> {
    f.mapv(|f| match process {
        Process::Shg => f * f,
        Process::Thg => f * f * f,
        // pg and tg are rejected at construction
        Process::Sd | Process::Pg | Process::Tg => f * f.norm_sqr(),
    })
}

/// `spectrum * exp(i phase_fn(w))` on the grid's relative frequency axis.
pub(crate) fn apply_phase<Fp: Fn(f64) -> f64>(
    grid: &SamplingGrid,
    spectrum: ArrayView1<Complex64>,
    phase_fn: Fp,
) -> Array1<Complex64> {
    let mut out = spectrum.to_owned();
    Zip::from(&mut out)
        .and(grid.w())
        .for_each(|s, &w| *s *= Complex64::from_polar(1.0, phase_fn(w)));
    out
}
