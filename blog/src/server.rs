use blog::pb::blog_server::BlogServer;
use blog::BlogService;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let addr = "[::1]:50053".parse()?;
    tracing::info!(%addr, "BlogServer listening");

    Server::builder()
        .add_service(BlogServer::new(BlogService::default()))
        .serve(addr)
        .await?;

    Ok(())
}
