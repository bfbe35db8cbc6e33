//! Tabulated spectra.
//!
//! The import format is a delimited text table with one header row followed by
//! three numeric columns:
//! ```text
//! wavelength (nm), intensity, phase (rad)
//! 740.0, 0.12, 0.0
//! 750.0, 1.00, 0.1
//! ...
//! ```
//! Commas, semicolons, tabs or plain whitespace separate the columns. Extra
//! columns are ignored. The first non-blank line is always the header; later
//! lines starting with `#` are skipped.

use std::path::Path;

use ndarray::Array1;

use crate::Error;

const NM_TO_M: f64 = 1e-9;

/// Spectral intensity and phase sampled at increasing wavelengths (meters).
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralData {
    wavelengths: Array1<f64>,
    intensity: Array1<f64>,
    phase: Array1<f64>,
}

impl SpectralData {
    /// Creates spectral data from columns. Descending wavelengths are reversed.
    pub fn new(
        wavelengths: Array1<f64>,
        intensity: Array1<f64>,
        phase: Array1<f64>,
    ) -> Result<Self, Error> {
        for (name, column) in [("Intensity", &intensity), ("Phase", &phase)] {
            if column.len() != wavelengths.len() {
                return Err(Error::DimensionMismatch {
                    array_name: name.to_string(),
                    input_length: column.len(),
                    expected_length: wavelengths.len(),
                });
            }
        }
        if wavelengths.len() < 2 {
            return Err(Error::MalformedSpectralData {
                line: 0,
                message: format!("need at least 2 rows, got {}", wavelengths.len()),
            });
        }

        let increasing = wavelengths.windows(2).into_iter().all(|w| w[1] > w[0]);
        let decreasing = wavelengths.windows(2).into_iter().all(|w| w[1] < w[0]);

        if increasing {
            Ok(Self { wavelengths, intensity, phase })
        } else if decreasing {
            let reverse = |a: Array1<f64>| a.iter().rev().copied().collect::<Array1<f64>>();
            Ok(Self {
                wavelengths: reverse(wavelengths),
                intensity: reverse(intensity),
                phase: reverse(phase),
            })
        } else {
            Err(Error::MalformedSpectralData {
                line: 0,
                message: "wavelengths are not monotonic".to_string(),
            })
        }
    }

    /// Parses a table with wavelengths in nanometers.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut wavelengths = Vec::new();
        let mut intensity = Vec::new();
        let mut phase = Vec::new();

        let mut rows = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        // header row, which may itself be a `#` comment
        rows.next();

        for (idx, line) in rows.filter(|(_, line)| !line.trim_start().starts_with('#')) {
            let line_no = idx + 1;
            let parts = split_row(line);
            if parts.len() < 3 {
                return Err(Error::MalformedSpectralData {
                    line: line_no,
                    message: format!("expected 3 columns, got {}: '{}'", parts.len(), line.trim()),
                });
            }

            let mut values = [0.0; 3];
            for (value, part) in values.iter_mut().zip(parts.iter()) {
                *value = part.parse().map_err(|_| Error::MalformedSpectralData {
                    line: line_no,
                    message: format!("invalid number: '{}'", part),
                })?;
            }

            wavelengths.push(values[0] * NM_TO_M);
            intensity.push(values[1]);
            phase.push(values[2]);
        }

        log::debug!("parsed {} spectral samples", wavelengths.len());

        Self::new(Array1::from(wavelengths), Array1::from(intensity), Array1::from(phase))
    }

    /// Reads and parses a table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        log::info!("importing spectrum from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Wavelengths in meters, strictly increasing.
    #[inline]
    pub fn wavelengths(&self) -> &Array1<f64> {
        &self.wavelengths
    }
    #[inline]
    pub fn intensity(&self) -> &Array1<f64> {
        &self.intensity
    }
    /// Spectral phase in radians.
    #[inline]
    pub fn phase(&self) -> &Array1<f64> {
        &self.phase
    }
}

fn split_row(line: &str) -> Vec<&str> {
    let parts: Vec<&str> = if line.contains(',') {
        line.split(',').collect()
    } else if line.contains(';') {
        line.split(';').collect()
    } else {
        line.split_whitespace().collect()
    };
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}
