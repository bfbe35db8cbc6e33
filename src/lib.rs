//! A framework for simulating ultrafast pulse characterization experiments.
//!
//! A [`SamplingGrid`] fixes the time axis and its Fourier-conjugate frequency axis,
//! a [`Pulse`] is synthesized or imported on that grid, and a [`TraceEngine`] sweeps
//! a scan parameter through a nonlinear process to produce the trace a FROG, D-scan,
//! MIIPS, iFROG or TDP measurement would record, as a [`MeshData`].
//!
//! To get started, refer to the `demos` directory in the main repository.

mod fourier;
mod grid;
mod mesh_data;
mod pulse;
mod simulation;
mod spectral_data;

pub mod pnps;
pub mod prelude;

pub use fourier::FourierTransform;
pub use grid::{frequency_to_wavelength, wavelength_to_frequency, GridDescriptor, SamplingGrid};
pub use mesh_data::{Axis, MeshData};
pub use pnps::{
    compute_trace, generate_signal, Method, MethodOptions, Process, Trace, TraceEngine,
    TraceEngineDescriptor,
};
pub use pulse::{gaussian_envelope, Dispersion, Pulse, PulseDescriptor};
pub use simulation::{
    PulseSource, RunDescriptor, SaveSettings, SaveType, Simulation, SimulationConfig,
    SimulationDescriptor, SimulationOutput,
};
pub use spectral_data::SpectralData;

/// Represents an error in the simulation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid sampling grid ( npoints: {npoints}, dt: {dt} s ): {reason}")]
    InvalidGrid {
        npoints: usize,
        dt: f64,
        reason: String,
    },
    #[error("Malformed spectral data at line {line}: {message}")]
    MalformedSpectralData {
        line: usize,
        message: String,
    },
    #[error("Unsupported nonlinear process {process} for method {method}")]
    UnsupportedProcess {
        method: pnps::Method,
        process: pnps::Process,
    },
    #[error("{array_name} array does not have expected length \
        ( {array_name} array length: {input_length}, \
        expected length: {expected_length} )")]
    DimensionMismatch {
        array_name: String,
        input_length: usize,
        expected_length: usize,
    },
    #[error("{axis} axis is not strictly monotonic")]
    NonMonotonicAxis {
        axis: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    H5Error(#[from] hdf5::Error),
    #[error(transparent)]
    H5String(#[from] hdf5::types::StringError),
}

/// Maps a pulse spectrum and one scan-parameter value to a generated signal spectrum.
///
/// Implementations are pure: the same spectrum and parameter always give the same
/// signal, and nothing carries over between calls. This is what lets a
/// [`TraceEngine`] evaluate sweep steps on any thread in any order.
pub trait NonlinearProcess: Send + Sync {
    /// Generates the signal spectrum for one value of the scan parameter.
    fn generate_signal(
        &self,
        spectrum: ndarray::ArrayView1<num_complex::Complex64>,
        parameter: f64,
    ) -> ndarray::Array1<num_complex::Complex64>;

    fn method(&self) -> Method;

    fn process(&self) -> Process;
}

/// Describes how a `TraceEngine` should do computations.
pub struct ComputeDescriptor<'a> {
    pub pulse: &'a Pulse,
    /// Scan-parameter values, one trace row each, kept in this order.
    pub parameters: &'a [f64],
    /// Whether sweep steps may run on the rayon thread pool.
    pub parallel: bool,
    pub bar: &'a Option<indicatif::ProgressBar>,
}
