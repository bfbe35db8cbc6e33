use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::pnps::{Method, MethodOptions, Process, Trace, TraceEngine, TraceEngineDescriptor};
use crate::{
    gaussian_envelope, ComputeDescriptor, Dispersion, Error, Pulse, PulseDescriptor,
    SamplingGrid, SpectralData,
};

const FS: f64 = 1e-15;
const NM: f64 = 1e-9;

/// Where the simulated pulse comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseSource {
    /// Gaussian envelope with polynomial spectral phase.
    Synthesized,
    /// Tabulated spectral intensity and phase.
    Imported,
}

/// Recognized simulation options, in the units a user enters them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pulse_source: PulseSource,
    /// Fourier-limited intensity FWHM in femtoseconds.
    pub fwhm_fs: f64,
    #[serde(rename = "GDD_fs2")]
    pub gdd_fs2: f64,
    #[serde(rename = "TOD_fs3")]
    pub tod_fs3: f64,
    /// Spectrum table, read when `pulse_source` is `Imported`.
    pub data_file_path: Option<PathBuf>,
    pub method: Method,
    pub nl_process: Process,
    pub center_wavelength_nm: f64,
    /// Number of grid points, preferably a power of two.
    pub n_points: usize,
    pub time_resolution_fs: f64,
    pub options: MethodOptions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pulse_source: PulseSource::Synthesized,
            fwhm_fs: 5.0,
            gdd_fs2: 245.0,
            tod_fs3: 100.0,
            data_file_path: None,
            method: Method::Frog,
            nl_process: Process::Shg,
            center_wavelength_nm: 750.0,
            n_points: 512,
            time_resolution_fs: 0.5,
            options: MethodOptions::default(),
        }
    }
}

impl SimulationConfig {
    /// Builds the sampling grid described by this configuration.
    pub fn grid(&self) -> Result<SamplingGrid, Error> {
        SamplingGrid::from_wavelength(
            self.n_points,
            self.time_resolution_fs * FS,
            self.center_wavelength_nm * NM,
        )
    }

    /// Spectral phase polynomial in SI units.
    pub fn dispersion(&self) -> Dispersion {
        Dispersion {
            gdd: self.gdd_fs2 * FS.powi(2),
            tod: self.tod_fs3 * FS.powi(3),
        }
    }
}

/// Describes a simulation.
pub struct SimulationDescriptor {
    pub config: SimulationConfig,
    /// Spectrum for the imported source. When `None`, it is read from
    /// `config.data_file_path`.
    pub spectral_data: Option<SpectralData>,
}

/// Describes a simulation run.
pub struct RunDescriptor<P: AsRef<Path>> {
    /// Scan-parameter values. Defaults to the grid's mirrored delays.
    pub parameters: Option<Array1<f64>>,
    /// Whether sweep steps may run in parallel.
    pub parallel: bool,
    /// Whether or not to print information to the console.
    pub verbose: bool,
    /// What, if any, information to save to file.
    pub save_settings: Option<SaveSettings<P>>,
}

/// How data should be saved to file.
#[derive(Debug)]
pub struct SaveSettings<P: AsRef<Path>> {
    /// The path to the save file.
    pub filename: P,
    /// What information to save.
    pub save_type: SaveType,
    /// Whether or not to overwrite an existing file. Otherwise runs are appended.
    pub overwrite: bool,
}

/// Represents what data to save.
#[derive(PartialEq, Debug)]
pub enum SaveType {
    /// Save the pulse and the trace.
    Full,
    /// Save only the trace.
    Trace,
}

/// Result of a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationOutput {
    pub pulse: Pulse,
    pub trace: Trace,
}

/// The main `struct` of the framework: configuration in, pulse and trace out.
///
/// Holds no current pulse or trace; every call recomputes from the configuration.
pub struct Simulation {
    config: SimulationConfig,
    grid: Arc<SamplingGrid>,
    spectral_data: Option<SpectralData>,
    engine: TraceEngine,
}

impl Simulation {
    /// Creates a new `Simulation` instance.
    pub fn new(desc: SimulationDescriptor) -> Result<Self, Error> {
        let SimulationDescriptor { config, spectral_data } = desc;
        let grid = Arc::new(config.grid()?);
        let engine = TraceEngine::new(TraceEngineDescriptor {
            method: config.method,
            process: config.nl_process,
            options: config.options,
        })?;

        let spectral_data = match (config.pulse_source, spectral_data, &config.data_file_path) {
            (PulseSource::Imported, Some(data), _) => Some(data),
            (PulseSource::Imported, None, Some(path)) => Some(SpectralData::from_path(path)?),
            (PulseSource::Imported, None, None) => {
                return Err(Error::MalformedSpectralData {
                    line: 0,
                    message: "imported pulse source needs a data file".to_string(),
                })
            }
            (PulseSource::Synthesized, _, _) => None,
        };

        Ok(Self {
            config,
            grid,
            spectral_data,
            engine,
        })
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
    #[inline]
    pub fn grid(&self) -> &Arc<SamplingGrid> {
        &self.grid
    }

    /// Builds the pulse described by the configuration.
    pub fn pulse(&self) -> Result<Pulse, Error> {
        match self.spectral_data {
            Some(ref data) => Pulse::import_from_spectrum(Arc::clone(&self.grid), data),
            None => {
                let dispersion = self.config.dispersion();
                Pulse::synthesize(PulseDescriptor {
                    grid: Arc::clone(&self.grid),
                    envelope_fn: gaussian_envelope(self.config.fwhm_fs * FS),
                    spectral_phase_fn: move |w| dispersion.phase(w),
                })
            }
        }
    }

    /// Does a computational run.
    pub fn run<P: AsRef<Path>>(&self, desc: RunDescriptor<P>) -> Result<SimulationOutput, Error> {
        let pulse = self.pulse()?;
        let parameters = desc
            .parameters
            .unwrap_or_else(|| self.grid.mirrored_delays())
            .to_vec();

        // setup output if verbose
        let bar = if desc.verbose {
            println!("# of parameter steps: {}", parameters.len());
            Some(indicatif::ProgressBar::new(parameters.len() as u64))
        } else {
            None
        };

        let trace = self.engine.compute(ComputeDescriptor {
            pulse: &pulse,
            parameters: &parameters,
            parallel: desc.parallel,
            bar: &bar,
        })?;

        if let Some(ref bar) = bar {
            bar.finish();
        }
        log::info!(
            "{} {} trace done: {:?} points, max intensity {:e}",
            self.config.method,
            self.config.nl_process,
            trace.data.shape(),
            trace.max_intensity,
        );

        let output = SimulationOutput { pulse, trace };

        // optionally write data to file
        if let Some(SaveSettings {
            ref filename,
            ref save_type,
            overwrite,
        }) = desc.save_settings {
            self.save(filename.as_ref(), save_type, overwrite, &output)?;
        }

        Ok(output)
    }

    fn save(
        &self,
        filename: &Path,
        save_type: &SaveType,
        overwrite: bool,
        output: &SimulationOutput,
    ) -> Result<(), Error> {
        let file = if filename.exists() && !overwrite {
            hdf5::File::append(filename)?
        } else {
            hdf5::File::create(filename)?
        };

        // each run gets its own group
        let run_name = next_run_name(&file.member_names()?);
        log::info!("saving {} to {}", run_name, filename.display());
        self.save_run(&file.create_group(&run_name)?, save_type, output)?;

        file.close()?;
        Ok(())
    }

    fn save_run(
        &self,
        run: &hdf5::Group,
        save_type: &SaveType,
        output: &SimulationOutput,
    ) -> Result<(), Error> {
        if *save_type == SaveType::Full {
            output.pulse.save(&run.create_group("pulse")?)?;
        }
        output.trace.data.save(&run.create_group("trace")?)?;

        run.new_attr::<f64>()
            .shape(hdf5::Extents::Scalar)
            .create("max_intensity")?
            .write_scalar(&output.trace.max_intensity)?;
        for (name, value) in [
            ("method", self.config.method.to_string()),
            ("process", self.config.nl_process.to_string()),
        ] {
            let value: hdf5::types::VarLenUnicode = value.parse()?;
            run.new_attr::<hdf5::types::VarLenUnicode>()
                .shape(hdf5::Extents::Scalar)
                .create(name)?
                .write_scalar(&value)?;
        }

        Ok(())
    }
}

/// First `runN` name not already taken in `names`.
fn next_run_name(names: &[String]) -> String {
    (0..)
        .map(|n| format!("run{}", n))
        .find(|name| !names.contains(name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            n_points: 128,
            time_resolution_fs: 1.0,
            gdd_fs2: 20.0,
            tod_fs3: 0.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_default_config_matches_ui_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.n_points, 512);
        assert_eq!(config.method, Method::Frog);
        assert_eq!(config.nl_process, Process::Shg);
        assert!((config.dispersion().gdd - 245e-30).abs() < 1e-40);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"method":"dscan","GDD_fs2":100,"nl_process":"thg"}"#).unwrap();
        assert_eq!(config.method, Method::Dscan);
        assert_eq!(config.nl_process, Process::Thg);
        assert_eq!(config.gdd_fs2, 100.0);

        let defaults = SimulationConfig::default();
        assert_eq!(config.pulse_source, PulseSource::Synthesized);
        assert_eq!(config.tod_fs3, defaults.tod_fs3);
        assert_eq!(config.n_points, defaults.n_points);
        assert_eq!(config.center_wavelength_nm, defaults.center_wavelength_nm);
        assert_eq!(config.options, MethodOptions::default());
    }

    #[test]
    fn test_config_serialized_names() {
        let config = SimulationConfig {
            pulse_source: PulseSource::Imported,
            method: Method::Ifrog,
            nl_process: Process::Sd,
            ..SimulationConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["pulse_source"], "imported");
        assert_eq!(value["method"], "ifrog");
        assert_eq!(value["nl_process"], "sd");
        assert_eq!(value["GDD_fs2"], 245.0);
        assert_eq!(value["TOD_fs3"], 100.0);
        assert!(value.get("gdd_fs2").is_none());

        let back: SimulationConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_unknown_method_name_rejected() {
        assert!(serde_json::from_str::<SimulationConfig>(r#"{"method":"spider"}"#).is_err());
    }

    #[test]
    fn test_run_default_sweep() {
        let simulation = Simulation::new(SimulationDescriptor {
            config: small_config(),
            spectral_data: None,
        })
        .unwrap();
        let output = simulation
            .run::<&str>(RunDescriptor {
                parameters: None,
                parallel: true,
                verbose: false,
                save_settings: None,
            })
            .unwrap();

        assert_eq!(output.trace.data.shape(), (128, 128));
        assert!(output.trace.data.data().iter().all(|&v| v >= 0.0));
        // pure pipeline: a second run gives the same trace
        let again = simulation
            .run::<&str>(RunDescriptor {
                parameters: None,
                parallel: false,
                verbose: false,
                save_settings: None,
            })
            .unwrap();
        assert_eq!(output.trace, again.trace);
    }

    #[test]
    fn test_unsupported_config() {
        let result = Simulation::new(SimulationDescriptor {
            config: SimulationConfig {
                method: Method::Dscan,
                nl_process: Process::Tg,
                ..small_config()
            },
            spectral_data: None,
        });
        assert!(matches!(result, Err(Error::UnsupportedProcess { .. })));
    }

    #[test]
    fn test_imported_needs_data() {
        let result = Simulation::new(SimulationDescriptor {
            config: SimulationConfig {
                pulse_source: PulseSource::Imported,
                ..small_config()
            },
            spectral_data: None,
        });
        assert!(matches!(result, Err(Error::MalformedSpectralData { .. })));
    }

    #[test]
    fn test_imported_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        let table = (0..=40)
            .map(|i| {
                let wl = 730.0 + i as f64;
                format!("{},{},{}\n", wl, (-((wl - 750.0) / 8.0).powi(2)).exp(), 0.0)
            })
            .collect::<String>();
        std::fs::write(&path, format!("wavelength,intensity,phase\n{}", table)).unwrap();

        let simulation = Simulation::new(SimulationDescriptor {
            config: SimulationConfig {
                pulse_source: PulseSource::Imported,
                data_file_path: Some(path),
                ..small_config()
            },
            spectral_data: None,
        })
        .unwrap();
        let pulse = simulation.pulse().unwrap();
        assert!(pulse.spectral_intensity().iter().any(|&v| v > 0.5));
    }

    #[test]
    fn test_save_appends_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.h5");
        let simulation = Simulation::new(SimulationDescriptor {
            config: small_config(),
            spectral_data: None,
        })
        .unwrap();

        for (save_type, overwrite) in [(SaveType::Full, true), (SaveType::Trace, false)] {
            simulation
                .run(RunDescriptor {
                    parameters: Some(Array1::linspace(-10e-15, 10e-15, 5)),
                    parallel: true,
                    verbose: false,
                    save_settings: Some(SaveSettings {
                        filename: &path,
                        save_type,
                        overwrite,
                    }),
                })
                .unwrap();
        }

        let file = hdf5::File::open(&path).unwrap();
        let mut names = file.member_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["run0".to_string(), "run1".to_string()]);
        assert!(file.group("run0/pulse").is_ok());
        assert!(file.group("run1/pulse").is_err());
        let data: ndarray::Array2<f64> = file.dataset("run1/trace/data").unwrap().read_2d().unwrap();
        assert_eq!(data.dim(), (5, 128));
    }

    #[test]
    fn test_next_run_name_skips_taken() {
        let names = vec!["notes".to_string(), "run1".to_string()];
        assert_eq!(next_run_name(&names), "run0");
        let names = vec!["run0".to_string(), "calibration".to_string(), "run1".to_string()];
        assert_eq!(next_run_name(&names), "run2");
    }

    #[test]
    fn test_save_into_file_with_other_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.h5");
        {
            let file = hdf5::File::create(&path).unwrap();
            file.create_group("calibration").unwrap();
            file.create_group("run0").unwrap();
        }
        let simulation = Simulation::new(SimulationDescriptor {
            config: small_config(),
            spectral_data: None,
        })
        .unwrap();
        simulation
            .run(RunDescriptor {
                parameters: Some(Array1::linspace(-5e-15, 5e-15, 3)),
                parallel: false,
                verbose: false,
                save_settings: Some(SaveSettings {
                    filename: &path,
                    save_type: SaveType::Trace,
                    overwrite: false,
                }),
            })
            .unwrap();

        let file = hdf5::File::open(&path).unwrap();
        assert!(file.group("calibration").is_ok());
        assert!(file.dataset("run1/trace/data").is_ok());
    }
}
