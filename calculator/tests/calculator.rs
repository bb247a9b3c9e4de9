use std::time::Duration;

use calculator::pb::calculator_client::CalculatorClient;
use calculator::pb::calculator_server::CalculatorServer;
use calculator::pb::{
    ComputeAverageRequest, FindMaximumRequest, FindMaximumResponse, PrimeFactorsRequest,
    SquareRootRequest, SumRequest,
};
use calculator::CalculatorService;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::StreamExt;
use tonic::transport::{Channel, Server};
use tonic::{Code, Request};
use tonic_types::StatusExt;

async fn start_server() -> CalculatorClient<Channel> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(CalculatorServer::new(CalculatorService::default()))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    CalculatorClient::connect(format!("http://{}", addr))
        .await
        .unwrap()
}

#[tokio::test]
async fn sum_adds_two_numbers() {
    let mut client = start_server().await;

    let response = client
        .sum(Request::new(SumRequest {
            first: 3,
            second: 12,
        }))
        .await
        .unwrap();

    assert_eq!(response.into_inner().result, 15);
}

#[tokio::test]
async fn prime_factors_streams_each_factor_in_order() {
    let mut client = start_server().await;

    let factors: Vec<u64> = client
        .prime_factors(Request::new(PrimeFactorsRequest { number: 210 }))
        .await
        .unwrap()
        .into_inner()
        .map(|response| response.unwrap().factor)
        .collect()
        .await;

    assert_eq!(factors, vec![2, 3, 5, 7]);
}

#[tokio::test]
async fn compute_average_of_scenario_sequence() {
    let mut client = start_server().await;

    let requests = [5, 10, 15, 25]
        .into_iter()
        .map(|number| ComputeAverageRequest { number });

    let response = client
        .compute_average(tokio_stream::iter(requests))
        .await
        .unwrap();

    let average = response.into_inner().average;
    assert!((average - 13.75).abs() < 1e-9);
}

#[tokio::test]
async fn compute_average_rejects_empty_sequence() {
    let mut client = start_server().await;

    let status = client
        .compute_average(tokio_stream::iter(Vec::<ComputeAverageRequest>::new()))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn find_maximum_emits_only_changed_maxima() {
    let mut client = start_server().await;

    let numbers = [3, 5, 5, 4, 6, 3, 9, 10, 200, 900, 100];
    let requests = numbers
        .into_iter()
        .map(|number| FindMaximumRequest { number });

    let maxima: Vec<i64> = client
        .find_maximum(tokio_stream::iter(requests))
        .await
        .unwrap()
        .into_inner()
        .map(|response| response.unwrap().maximum)
        .collect()
        .await;

    assert_eq!(maxima, vec![3, 5, 6, 9, 10, 200, 900]);
}

#[tokio::test]
async fn find_maximum_through_coordinator() {
    let mut client = start_server().await;

    let numbers = [3, 5, 5, 4, 6, 3, 9, 10, 200, 900, 100];
    let outbound =
        tokio_stream::iter(numbers.into_iter().map(|number| FindMaximumRequest { number }));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    bidi::run(
        outbound,
        |requests| async move { Ok(client.find_maximum(requests).await?.into_inner()) },
        move |response: FindMaximumResponse| {
            let _ = tx.send(response.maximum);
        },
    )
    .await
    .unwrap();

    let mut maxima = Vec::new();
    while let Ok(maximum) = rx.try_recv() {
        maxima.push(maximum);
    }
    assert_eq!(maxima, vec![3, 5, 6, 9, 10, 200, 900]);
}

#[tokio::test]
async fn dropping_bidi_stream_mid_flight_leaves_server_responsive() {
    let mut client = start_server().await;

    // Unbounded outbound sequence; hang up after the first response.
    let outbound = tokio_stream::iter(1i64..).map(|number| FindMaximumRequest { number });
    let mut inbound = client
        .find_maximum(outbound)
        .await
        .unwrap()
        .into_inner();

    let first = inbound.next().await.unwrap().unwrap();
    assert_eq!(first.maximum, 1);
    drop(inbound);

    // Both directions must unwind; the server keeps serving other calls.
    let response = tokio::time::timeout(
        Duration::from_secs(5),
        client.sum(Request::new(SumRequest { first: 1, second: 2 })),
    )
    .await
    .expect("server hung after client cancelled a stream")
    .unwrap();

    assert_eq!(response.into_inner().result, 3);
}

#[tokio::test]
async fn square_root_of_valid_input() {
    let mut client = start_server().await;

    let response = client
        .square_root(Request::new(SquareRootRequest { number: 16.0 }))
        .await
        .unwrap();

    assert!((response.into_inner().root - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn square_root_rejects_negative_input() {
    let mut client = start_server().await;

    let status = client
        .square_root(Request::new(SquareRootRequest { number: -3.0 }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);

    let details = status.get_error_details();
    let bad_request = details
        .bad_request()
        .expect("bad request details attached");
    assert_eq!(bad_request.field_violations[0].field, "number");
}
