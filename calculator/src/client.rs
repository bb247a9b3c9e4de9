use calculator::pb::calculator_client::CalculatorClient;
use calculator::pb::{
    ComputeAverageRequest, FindMaximumRequest, FindMaximumResponse, PrimeFactorsRequest,
    SquareRootRequest, SumRequest,
};
use tokio_stream::StreamExt;
use tonic::transport::Channel;
use tonic::{Code, Request};
use tonic_types::StatusExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = CalculatorClient::connect("http://[::1]:50052").await?;

    sum(&mut client).await?;
    prime_factors(&mut client).await?;
    compute_average(&mut client).await?;
    find_maximum(&mut client).await?;
    square_root(&mut client, 16.0).await?;
    square_root(&mut client, -3.0).await?;

    Ok(())
}

async fn sum(client: &mut CalculatorClient<Channel>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Unary sum:");
    let response = client
        .sum(Request::new(SumRequest {
            first: 3,
            second: 12,
        }))
        .await?;
    println!("\t3 + 12 = {}", response.into_inner().result);
    Ok(())
}

async fn prime_factors(
    client: &mut CalculatorClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Server-streaming prime factors of 210:");
    let mut stream = client
        .prime_factors(Request::new(PrimeFactorsRequest { number: 210 }))
        .await?
        .into_inner();

    while let Some(response) = stream.next().await {
        println!("\tfactor: {}", response?.factor);
    }
    Ok(())
}

async fn compute_average(
    client: &mut CalculatorClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Client-streaming average of [5, 10, 15, 25]:");
    let requests = [5, 10, 15, 25]
        .into_iter()
        .map(|number| ComputeAverageRequest { number });

    let response = client
        .compute_average(tokio_stream::iter(requests))
        .await?;
    println!("\taverage: {}", response.into_inner().average);
    Ok(())
}

async fn find_maximum(
    client: &mut CalculatorClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Bidirectional running maximum:");
    let numbers = [3, 5, 5, 4, 6, 3, 9, 10, 200, 900, 100];
    let outbound =
        tokio_stream::iter(numbers.into_iter().map(|number| FindMaximumRequest { number }));

    bidi::run(
        outbound,
        |requests| async move { Ok(client.find_maximum(requests).await?.into_inner()) },
        |response: FindMaximumResponse| println!("\tnew maximum: {}", response.maximum),
    )
    .await?;
    Ok(())
}

async fn square_root(
    client: &mut CalculatorClient<Channel>,
    number: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Unary square root of {}:", number);
    match client
        .square_root(Request::new(SquareRootRequest { number }))
        .await
    {
        Ok(response) => println!("\troot: {}", response.into_inner().root),
        Err(status) if status.code() == Code::InvalidArgument => {
            println!("\tinvalid argument: {}", status.message());
            if let Some(bad_request) = status.get_error_details().bad_request() {
                for violation in &bad_request.field_violations {
                    println!("\t\t{}: {}", violation.field, violation.description);
                }
            }
        }
        Err(status) => return Err(status.into()),
    }
    Ok(())
}
