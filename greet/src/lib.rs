pub mod pb {
    tonic::include_proto!("greet");
}

mod service;

pub use service::GreeterService;
