pub mod pb {
    tonic::include_proto!("blog");
}

use tonic::{Request, Response, Status};

use pb::blog_server::Blog;
use pb::{CreateBlogRequest, CreateBlogResponse, ReadBlogRequest, ReadBlogResponse};

/// Placeholder blog service; the wiring exists, the operations do not yet.
#[derive(Debug, Default)]
pub struct BlogService {}

#[tonic::async_trait]
impl Blog for BlogService {
    async fn create_blog(
        &self,
        _: Request<CreateBlogRequest>,
    ) -> Result<Response<CreateBlogResponse>, Status> {
        Err(Status::unimplemented("not implemented"))
    }

    async fn read_blog(
        &self,
        _: Request<ReadBlogRequest>,
    ) -> Result<Response<ReadBlogResponse>, Status> {
        Err(Status::unimplemented("not implemented"))
    }
}
