use femtosim::prelude::*;

fn main() {
    env_logger::init();
    std::fs::create_dir_all("data").unwrap();

    let config = SimulationConfig {
        fwhm_fs: 5.0,
        gdd_fs2: 245.0,
        tod_fs3: 100.0,
        center_wavelength_nm: 750.0,
        n_points: 512,
        time_resolution_fs: 0.5,
        method: Method::Frog,
        nl_process: Process::Shg,
        ..SimulationConfig::default()
    };

    let simulation = Simulation::new(SimulationDescriptor {
        config,
        spectral_data: None,
    })
    .unwrap();

    let grid = simulation.grid();
    println!(
        "\n-- General Simulation Info --\n\
        # of points:  {}\n\
        Δt:           {:<9.2e} s\n\
        Δω:           {:<9.2e} rad/s\n\
        ω0:           {:<9.2e} rad/s\n",
        grid.npoints(),
        grid.dt(),
        grid.dw(),
        grid.w0(),
    );

    println!("-- SHG FROG --");
    let output = simulation.run(RunDescriptor {
        parameters: None,
        parallel: true,
        verbose: true,
        save_settings: Some(SaveSettings {
            filename: "data/frog.h5",
            save_type: SaveType::Full,
            overwrite: true,
        }),
    })
    .unwrap();

    println!(
        "pulse FWHM: {:.1} fs, trace {:?}, max intensity {:.3e}",
        output.pulse.fwhm().unwrap_or(f64::NAN) * 1e15,
        output.trace.data.shape(),
        output.trace.max_intensity,
    );

    println!("-- D-scan of the same pulse --");
    let dscan = Simulation::new(SimulationDescriptor {
        config: SimulationConfig {
            method: Method::Dscan,
            ..simulation.config().clone()
        },
        spectral_data: None,
    })
    .unwrap();
    // sweep the added GDD from -500 fs² to +500 fs²
    dscan.run(RunDescriptor {
        parameters: Some(ndarray::Array1::linspace(-500e-30, 500e-30, 128)),
        parallel: true,
        verbose: true,
        save_settings: Some(SaveSettings {
            filename: "data/frog.h5",
            save_type: SaveType::Trace,
            overwrite: false,
        }),
    })
    .unwrap();
}
