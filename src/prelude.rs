//! Includes commonly used library components.

pub use crate::{
    compute_trace,
    gaussian_envelope,
    Axis,
    ComputeDescriptor,
    Dispersion,
    GridDescriptor,
    MeshData,
    Method,
    MethodOptions,
    NonlinearProcess,
    Process,
    Pulse,
    PulseDescriptor,
    PulseSource,
    RunDescriptor,
    SamplingGrid,
    SaveSettings,
    SaveType,
    Simulation,
    SimulationConfig,
    SimulationDescriptor,
    SpectralData,
    TraceEngine,
    TraceEngineDescriptor,
};
