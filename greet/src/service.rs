use std::error::Error;
use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status, Streaming};

use crate::pb::greeter_server::Greeter;
use crate::pb::{
    GreetEveryoneRequest, GreetEveryoneResponse, GreetManyTimesRequest, GreetManyTimesResponse,
    GreetRequest, GreetResponse, GreetWithDeadlineRequest, GreetWithDeadlineResponse,
    LongGreetRequest, LongGreetResponse,
};

type GreetResult<T> = Result<Response<T>, Status>;
type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

fn match_for_io_error(err_status: &Status) -> Option<&std::io::Error> {
    let mut err: &(dyn Error + 'static) = err_status;

    loop {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err);
        }

        // h2::Error does not expose std::io::Error through `source()`
        if let Some(h2_err) = err.downcast_ref::<h2::Error>() {
            if let Some(io_err) = h2_err.get_io() {
                return Some(io_err);
            }
        }

        err = err.source()?;
    }
}

/// Stateless handler, constructed once per server lifetime and safe for
/// concurrent invocation.
#[derive(Debug, Default)]
pub struct GreeterService {}

#[tonic::async_trait]
impl Greeter for GreeterService {
    async fn greet(&self, request: Request<GreetRequest>) -> GreetResult<GreetResponse> {
        let greeting = request.into_inner().greeting.unwrap_or_default();
        tracing::info!(first_name = %greeting.first_name, "greet invoked");

        Ok(Response::new(GreetResponse {
            result: format!("Hello {}", greeting.first_name),
        }))
    }

    type GreetManyTimesStream = ResponseStream<GreetManyTimesResponse>;

    async fn greet_many_times(
        &self,
        request: Request<GreetManyTimesRequest>,
    ) -> GreetResult<Self::GreetManyTimesStream> {
        let first_name = request.into_inner().greeting.unwrap_or_default().first_name;

        let output = async_stream::try_stream! {
            for i in 0..10 {
                yield GreetManyTimesResponse {
                    result: format!("Hello {} number {}", first_name, i),
                };
            }
        };

        Ok(Response::new(Box::pin(output) as Self::GreetManyTimesStream))
    }

    async fn long_greet(
        &self,
        request: Request<Streaming<LongGreetRequest>>,
    ) -> GreetResult<LongGreetResponse> {
        let mut stream = request.into_inner();
        let mut result = String::new();

        while let Some(req) = stream.next().await {
            let greeting = req?.greeting.unwrap_or_default();
            result.push_str(&format!("Hello {}! ", greeting.first_name));
        }

        Ok(Response::new(LongGreetResponse { result }))
    }

    type GreetEveryoneStream = ResponseStream<GreetEveryoneResponse>;

    async fn greet_everyone(
        &self,
        request: Request<Streaming<GreetEveryoneRequest>>,
    ) -> GreetResult<Self::GreetEveryoneStream> {
        tracing::info!("greet_everyone stream opened");

        let mut in_stream = request.into_inner();
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            while let Some(result) = in_stream.next().await {
                let outcome = match result {
                    Ok(req) => {
                        let greeting = req.greeting.unwrap_or_default();
                        tx.send(Ok(GreetEveryoneResponse {
                            result: format!("Hello {}! ", greeting.first_name),
                        }))
                        .await
                    }
                    Err(status) => {
                        if let Some(io_err) = match_for_io_error(&status) {
                            if io_err.kind() == ErrorKind::BrokenPipe {
                                tracing::warn!("client disconnected: broken pipe");
                                break;
                            }
                        }
                        tx.send(Err(status)).await
                    }
                };
                if outcome.is_err() {
                    // Response stream was dropped; stop reading.
                    break;
                }
            }
            tracing::debug!("greet_everyone stream ended");
        });

        Ok(Response::new(
            Box::pin(ReceiverStream::new(rx)) as Self::GreetEveryoneStream
        ))
    }

    async fn greet_with_deadline(
        &self,
        request: Request<GreetWithDeadlineRequest>,
    ) -> GreetResult<GreetWithDeadlineResponse> {
        let first_name = request.into_inner().greeting.unwrap_or_default().first_name;

        let request_future = async move {
            // Slow enough that short deadlines expire first.
            sleep(Duration::from_millis(300)).await;
            Ok(Response::new(GreetWithDeadlineResponse {
                result: format!("Hello {}", first_name),
            }))
        };
        let cancellation_future = async move {
            tracing::warn!("greet_with_deadline cancelled by client");
            Err(Status::cancelled("the client cancelled the request"))
        };

        with_cancellation_handler(request_future, cancellation_future).await
    }
}

async fn with_cancellation_handler<T, FRequest, FCancellation>(
    request_future: FRequest,
    cancellation_future: FCancellation,
) -> Result<Response<T>, Status>
where
    T: Send + 'static,
    FRequest: Future<Output = Result<Response<T>, Status>> + Send + 'static,
    FCancellation: Future<Output = Result<Response<T>, Status>> + Send + 'static,
{
    let token = CancellationToken::new();
    // Fires the token when the transport drops this call.
    let _drop_guard = token.clone().drop_guard();
    let select_task = tokio::spawn(async move {
        select! {
            res = request_future => res,
            _ = token.cancelled() => cancellation_future.await,
        }
    });

    select_task
        .await
        .map_err(|_| Status::internal("request task failed"))?
}
