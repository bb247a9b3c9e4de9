pub mod pb {
    tonic::include_proto!("calculator");

    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("calculator_descriptor");
}

mod reduce;
mod service;

pub use reduce::{prime_factors, MeanAccumulator, RunningMax};
pub use service::CalculatorService;
