use calculator::pb::calculator_server::CalculatorServer;
use calculator::{pb, CalculatorService};
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let addr = "[::1]:50052".parse()?;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build()?;

    tracing::info!(%addr, "CalculatorServer listening");

    Server::builder()
        .add_service(CalculatorServer::new(CalculatorService::default()))
        .add_service(reflection)
        .serve(addr)
        .await?;

    Ok(())
}
