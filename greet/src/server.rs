use greet::pb::greeter_server::GreeterServer;
use greet::GreeterService;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let addr = "[::1]:50051".parse()?;
    tracing::info!(%addr, "GreeterServer listening");

    Server::builder()
        .add_service(GreeterServer::new(GreeterService::default()))
        .serve(addr)
        .await?;

    Ok(())
}
