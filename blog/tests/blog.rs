use blog::pb::blog_client::BlogClient;
use blog::pb::blog_server::BlogServer;
use blog::pb::{CreateBlogRequest, ReadBlogRequest};
use blog::BlogService;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Code, Request};

async fn start_server() -> BlogClient<Channel> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(BlogServer::new(BlogService::default()))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    BlogClient::connect(format!("http://{}", addr)).await.unwrap()
}

#[tokio::test]
async fn blog_operations_are_unimplemented() {
    let mut client = start_server().await;

    let status = client
        .create_blog(Request::new(CreateBlogRequest { blog: None }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unimplemented);

    let status = client
        .read_blog(Request::new(ReadBlogRequest {
            blog_id: "1".into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unimplemented);
}
