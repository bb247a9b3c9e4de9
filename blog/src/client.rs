use blog::pb::blog_client::BlogClient;
use blog::pb::{BlogPost, CreateBlogRequest};
use tonic::Request;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = BlogClient::connect("http://[::1]:50053").await?;

    let request = Request::new(CreateBlogRequest {
        blog: Some(BlogPost {
            id: String::new(),
            author_id: "Josiah".into(),
            title: "A first post".into(),
            content: "Hello blog".into(),
        }),
    });

    match client.create_blog(request).await {
        Ok(response) => println!("Created blog: {:?}", response.into_inner().blog),
        Err(status) => println!("CreateBlog failed: {} ({:?})", status.message(), status.code()),
    }

    Ok(())
}
