use std::path::PathBuf;

use femtosim::prelude::*;

fn main() {
    env_logger::init();
    std::fs::create_dir_all("data").unwrap();

    // wavelength (nm), intensity, phase (rad)
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/spectrum.csv"));

    let simulation = Simulation::new(SimulationDescriptor {
        config: SimulationConfig {
            pulse_source: PulseSource::Imported,
            data_file_path: Some(path),
            method: Method::Ifrog,
            nl_process: Process::Shg,
            ..SimulationConfig::default()
        },
        spectral_data: None,
    })
    .unwrap();

    let pulse = simulation.pulse().unwrap();
    println!(
        "imported pulse: FWHM {:.1} fs, time-bandwidth product {:.3}",
        pulse.fwhm().unwrap_or(f64::NAN) * 1e15,
        pulse.time_bandwidth_product().unwrap_or(f64::NAN),
    );

    let output = simulation.run(RunDescriptor {
        parameters: None,
        parallel: true,
        verbose: true,
        save_settings: Some(SaveSettings {
            filename: "data/from_file.h5",
            save_type: SaveType::Full,
            overwrite: true,
        }),
    })
    .unwrap();

    let normalized = output.trace.data.normalized();
    println!("iFROG trace {:?}, peak at {:?}", normalized.shape(), normalized.argmax());
}
