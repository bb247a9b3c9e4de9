use std::pin::Pin;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Code, Request, Response, Status, Streaming};
use tonic_types::{ErrorDetails, StatusExt};

use crate::pb::calculator_server::Calculator;
use crate::pb::{
    ComputeAverageRequest, ComputeAverageResponse, FindMaximumRequest, FindMaximumResponse,
    PrimeFactorsRequest, PrimeFactorsResponse, SquareRootRequest, SquareRootResponse, SumRequest,
    SumResponse,
};
use crate::reduce::{prime_factors, MeanAccumulator, RunningMax};

type CalculatorResult<T> = Result<Response<T>, Status>;
type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

/// Stateless handler, constructed once per server lifetime and safe for
/// concurrent invocation.
#[derive(Debug, Default)]
pub struct CalculatorService {}

#[tonic::async_trait]
impl Calculator for CalculatorService {
    async fn sum(&self, request: Request<SumRequest>) -> CalculatorResult<SumResponse> {
        let SumRequest { first, second } = request.into_inner();
        Ok(Response::new(SumResponse {
            result: first + second,
        }))
    }

    type PrimeFactorsStream = ResponseStream<PrimeFactorsResponse>;

    async fn prime_factors(
        &self,
        request: Request<PrimeFactorsRequest>,
    ) -> CalculatorResult<Self::PrimeFactorsStream> {
        let number = request.into_inner().number;
        tracing::info!(number, "decomposing into prime factors");

        let factors = prime_factors(number)
            .into_iter()
            .map(|factor| Ok(PrimeFactorsResponse { factor }));

        Ok(Response::new(
            Box::pin(tokio_stream::iter(factors)) as Self::PrimeFactorsStream
        ))
    }

    async fn compute_average(
        &self,
        request: Request<Streaming<ComputeAverageRequest>>,
    ) -> CalculatorResult<ComputeAverageResponse> {
        let mut stream = request.into_inner();
        let mut acc = MeanAccumulator::new();

        while let Some(result) = stream.next().await {
            acc.push(result?.number as f64);
        }

        match acc.finish() {
            Some(average) => Ok(Response::new(ComputeAverageResponse { average })),
            None => Err(Status::invalid_argument(
                "cannot average an empty sequence",
            )),
        }
    }

    type FindMaximumStream = ResponseStream<FindMaximumResponse>;

    async fn find_maximum(
        &self,
        request: Request<Streaming<FindMaximumRequest>>,
    ) -> CalculatorResult<Self::FindMaximumStream> {
        tracing::info!("find_maximum stream opened");

        let mut in_stream = request.into_inner();
        let (tx, rx) = mpsc::channel(16);

        // The running maximum is owned by the receive loop alone.
        tokio::spawn(async move {
            let mut max = RunningMax::new();
            while let Some(result) = in_stream.next().await {
                match result {
                    Ok(req) => {
                        if let Some(maximum) = max.observe(req.number) {
                            if tx.send(Ok(FindMaximumResponse { maximum })).await.is_err() {
                                // Client went away; nothing more to report.
                                return;
                            }
                        }
                    }
                    Err(status) => {
                        let _ = tx.send(Err(status)).await;
                        return;
                    }
                }
            }
            if let Some(maximum) = max.finish() {
                let _ = tx.send(Ok(FindMaximumResponse { maximum })).await;
            }
            tracing::debug!("find_maximum stream ended");
        });

        Ok(Response::new(
            Box::pin(ReceiverStream::new(rx)) as Self::FindMaximumStream
        ))
    }

    async fn square_root(
        &self,
        request: Request<SquareRootRequest>,
    ) -> CalculatorResult<SquareRootResponse> {
        let number = request.into_inner().number;

        if number < 0.0 {
            let mut err_details = ErrorDetails::new();
            err_details.add_bad_request_violation(
                "number",
                "square root is only defined for non-negative numbers",
            );
            return Err(Status::with_error_details(
                Code::InvalidArgument,
                "received a negative number",
                err_details,
            ));
        }

        Ok(Response::new(SquareRootResponse {
            root: number.sqrt(),
        }))
    }
}
