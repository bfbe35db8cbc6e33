use std::sync::Arc;

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::mesh_data::{Axis, MeshData};
use crate::pnps::{build, Method, MethodOptions, Process};
use crate::{ComputeDescriptor, Error, Pulse};

/// Describes the composition of a `TraceEngine`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceEngineDescriptor {
    pub method: Method,
    pub process: Process,
    pub options: MethodOptions,
}

/// A computed trace and the largest signal intensity in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    /// Rows follow the scan parameters, columns the signal frequency axis.
    pub data: MeshData,
    pub max_intensity: f64,
}

/// Sweeps a scan parameter through a nonlinear process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceEngine {
    method: Method,
    process: Process,
    options: MethodOptions,
}

impl TraceEngine {
    /// Creates a new engine, rejecting unsupported (method, process) pairs.
    #[inline]
    pub fn new(desc: TraceEngineDescriptor) -> Result<Self, Error> {
        desc.method.check(desc.process)?;
        Ok(Self {
            method: desc.method,
            process: desc.process,
            options: desc.options,
        })
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }
    #[inline]
    pub fn process(&self) -> Process {
        self.process
    }

    /// Computes one trace row per parameter value, in the given order.
    ///
    /// Rows are independent; with `parallel` set they run on the rayon pool and are
    /// gathered by input index, so the result is identical either way.
    pub fn compute(&self, desc: ComputeDescriptor) -> Result<Trace, Error> {
        let pulse = desc.pulse;
        let grid = pulse.grid();
        let nlp = build(Arc::clone(grid), self.method, self.process, &self.options)?;
        let spectrum = pulse.spectrum();

        log::debug!(
            "computing {} {} trace: {} parameter steps on {} points (parallel: {})",
            nlp.method(),
            nlp.process(),
            desc.parameters.len(),
            grid.npoints(),
            desc.parallel,
        );

        let row = |&parameter: &f64| -> Array1<f64> {
            let signal = nlp.generate_signal(spectrum, parameter);
            if let Some(ref bar) = desc.bar {
                bar.inc(1)
            }
            signal.mapv(|s| s.norm_sqr())
        };
        let rows: Vec<Array1<f64>> = if desc.parallel {
            desc.parameters.par_iter().map(row).collect()
        } else {
            desc.parameters.iter().map(row).collect()
        };

        // create storage array for the trace
        let mut data = Array2::<f64>::zeros((rows.len(), grid.npoints()));
        for (mut target, row) in data.rows_mut().into_iter().zip(rows.iter()) {
            target.assign(row);
        }
        let max_intensity = data.iter().copied().fold(0.0, f64::max);

        let (label, unit) = self.method.parameter_axis();
        let parameter_axis = Axis::new(label, unit, Array1::from(desc.parameters.to_vec()));
        let order = f64::from(self.process.order());
        let frequency_axis = Axis::new(
            "frequency",
            "rad/s",
            grid.w().mapv(|w| w + order * grid.w0()),
        );

        Ok(Trace {
            data: MeshData::new(data, parameter_axis, frequency_axis)?,
            max_intensity,
        })
    }
}

/// Computes the trace of `pulse` over `parameters` with default method options.
pub fn compute_trace(
    pulse: &Pulse,
    process: Process,
    method: Method,
    parameters: &[f64],
) -> Result<MeshData, Error> {
    let engine = TraceEngine::new(TraceEngineDescriptor {
        method,
        process,
        options: MethodOptions::default(),
    })?;
    let trace = engine.compute(ComputeDescriptor {
        pulse,
        parameters,
        parallel: true,
        bar: &None,
    })?;

    Ok(trace.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnps::methods::tests::test_pulse;

    fn engine(method: Method, process: Process) -> TraceEngine {
        TraceEngine::new(TraceEngineDescriptor {
            method,
            process,
            options: MethodOptions::default(),
        })
        .unwrap()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pulse = test_pulse(245e-30, 100e-45);
        let delays = pulse.grid().mirrored_delays();
        let engine = engine(Method::Frog, Process::Shg);

        let compute = |parallel| {
            engine
                .compute(ComputeDescriptor {
                    pulse: &pulse,
                    parameters: delays.as_slice().unwrap(),
                    parallel,
                    bar: &None,
                })
                .unwrap()
        };
        let sequential = compute(false);
        let parallel = compute(true);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel, compute(true));
    }

    #[test]
    fn test_keeps_parameter_order() {
        let pulse = test_pulse(0.0, 0.0);
        let engine = engine(Method::Frog, Process::Pg);
        let forward = [-4e-15, 0.0, 4e-15];
        let backward = [4e-15, 0.0, -4e-15];

        let run = |parameters: &[f64]| {
            engine
                .compute(ComputeDescriptor {
                    pulse: &pulse,
                    parameters,
                    parallel: true,
                    bar: &None,
                })
                .unwrap()
        };
        let a = run(&forward);
        let b = run(&backward);
        assert_eq!(a.data.axes()[0].values.to_vec(), forward.to_vec());
        assert_eq!(b.data.axes()[0].values.to_vec(), backward.to_vec());
        assert_eq!(a.data.data().row(0), b.data.data().row(2));
        assert_eq!(a.data.data().row(2), b.data.data().row(0));
    }

    #[test]
    fn test_unsupported_pair() {
        let result = TraceEngine::new(TraceEngineDescriptor {
            method: Method::Ifrog,
            process: Process::Tg,
            options: MethodOptions::default(),
        });
        assert!(matches!(result, Err(Error::UnsupportedProcess { .. })));
    }

    #[test]
    fn test_signal_axis_at_harmonic() {
        let pulse = test_pulse(0.0, 0.0);
        let trace = compute_trace(&pulse, Process::Thg, Method::Dscan, &[-1e-30, 0.0, 1e-30]).unwrap();
        let axis = &trace.axes()[1];
        assert_eq!(axis.unit, "rad/s");
        assert!((axis.values[256] - 3.0 * pulse.w0()).abs() < 1e-3 * pulse.w0());
        assert_eq!(trace.axes()[0].unit, "s^2");
    }

    #[test]
    fn test_max_intensity() {
        let pulse = test_pulse(0.0, 0.0);
        let trace = engine(Method::Frog, Process::Shg)
            .compute(ComputeDescriptor {
                pulse: &pulse,
                parameters: &[0.0, 2e-15],
                parallel: false,
                bar: &None,
            })
            .unwrap();
        assert_eq!(trace.max_intensity, trace.data.max());
        assert!(trace.max_intensity > 0.0);
    }
}
