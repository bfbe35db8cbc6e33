//! End-to-end: a chirped 5 fs pulse at 750 nm measured by SHG FROG.

use std::sync::Arc;

use femtosim::prelude::*;
use femtosim::Error;

fn chirped_pulse() -> Pulse {
    let grid = Arc::new(SamplingGrid::from_wavelength(512, 0.5e-15, 750e-9).unwrap());
    let dispersion = Dispersion { gdd: 245e-30, tod: 100e-45 };
    Pulse::synthesize(PulseDescriptor {
        grid,
        envelope_fn: gaussian_envelope(5e-15),
        spectral_phase_fn: move |w| dispersion.phase(w),
    })
    .unwrap()
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(i, m), (j, &v)| if v > m { (j, v) } else { (i, m) })
        .0
}

#[test]
fn frog_trace_of_chirped_pulse() {
    let pulse = chirped_pulse();
    assert_eq!(pulse.peak_index(), 256);

    let delays = pulse.grid().mirrored_delays();
    let trace = compute_trace(&pulse, Process::Shg, Method::Frog, delays.as_slice().unwrap()).unwrap();

    assert_eq!(trace.shape(), (512, 512));
    assert!(trace.data().iter().all(|&v| v >= 0.0 && v.is_finite()));
    assert_eq!(trace.axes()[0].unit, "s");
    assert_eq!(trace.axes()[1].unit, "rad/s");

    // the delay marginal peaks at zero delay, index N/2 - 1 of the mirrored sweep
    let (delay_marginal, frequency_marginal) = trace.marginals();
    let peak = argmax(delay_marginal.as_slice().unwrap());
    assert!((peak as i64 - 256).abs() <= 2, "delay marginal peaks at {}", peak);

    // the signal sits around the second harmonic
    let peak = argmax(frequency_marginal.as_slice().unwrap());
    assert!((peak as i64 - 256).abs() <= 16, "frequency marginal peaks at {}", peak);
}

#[test]
fn trace_is_deterministic() {
    let pulse = chirped_pulse();
    let delays = pulse.grid().mirrored_delays();
    let engine = TraceEngine::new(TraceEngineDescriptor {
        method: Method::Tdp,
        process: Process::Pg,
        options: MethodOptions::default(),
    })
    .unwrap();

    let run = |parallel| {
        engine
            .compute(ComputeDescriptor {
                pulse: &pulse,
                parameters: delays.as_slice().unwrap(),
                parallel,
                bar: &None,
            })
            .unwrap()
    };
    assert_eq!(run(true), run(false));
    assert_eq!(run(true), run(true));
}

#[test]
fn dscan_rejects_gating_process() {
    let pulse = chirped_pulse();
    let gdd = ndarray::Array1::linspace(-300e-30, 300e-30, 64);
    let result = compute_trace(&pulse, Process::Pg, Method::Dscan, gdd.as_slice().unwrap());
    assert!(matches!(result, Err(Error::UnsupportedProcess { .. })));
}

#[test]
fn roundtrip_for_synthesized_and_imported() {
    let pulse = chirped_pulse();
    let grid = Arc::clone(pulse.grid());
    let data = SpectralData::parse(
        "wavelength,intensity,phase\n700,0.2,0.0\n740,0.9,0.3\n760,1.0,-0.2\n800,0.1,0.0\n",
    )
    .unwrap();
    let imported = Pulse::import_from_spectrum(grid, &data).unwrap();

    for p in [&pulse, &imported] {
        let ft = p.grid().fourier();
        let back = ft.backward(ft.forward(p.field()).view());
        let scale = p.amplitude().fold(0.0, |m: f64, &v| m.max(v));
        for (a, b) in back.iter().zip(p.field().iter()) {
            assert!((a - b).norm() <= 1e-10 * scale);
        }
    }
}
