use std::time::Duration;

use greet::pb::greeter_client::GreeterClient;
use greet::pb::{
    GreetEveryoneRequest, GreetEveryoneResponse, GreetManyTimesRequest, GreetRequest,
    GreetWithDeadlineRequest, Greeting, LongGreetRequest,
};
use tokio_stream::StreamExt;
use tonic::transport::Channel;
use tonic::{Code, Request};

fn greeting(first_name: &str, last_name: &str) -> Option<Greeting> {
    Some(Greeting {
        first_name: first_name.into(),
        last_name: last_name.into(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = GreeterClient::connect("http://[::1]:50051").await?;

    unary(&mut client).await?;
    server_streaming(&mut client).await?;
    client_streaming(&mut client).await?;
    bidirectional(&mut client).await?;
    with_deadline(&mut client, Duration::from_secs(5)).await?;
    with_deadline(&mut client, Duration::from_millis(50)).await?;

    Ok(())
}

async fn unary(client: &mut GreeterClient<Channel>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Unary greeting:");
    let response = client
        .greet(Request::new(GreetRequest {
            greeting: greeting("Josiah", "Isong"),
        }))
        .await?;
    println!("\t{}", response.into_inner().result);
    Ok(())
}

async fn server_streaming(
    client: &mut GreeterClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Server-streaming greetings:");
    let mut stream = client
        .greet_many_times(Request::new(GreetManyTimesRequest {
            greeting: greeting("Josiah", "Isong"),
        }))
        .await?
        .into_inner();

    while let Some(response) = stream.next().await {
        println!("\t{}", response?.result);
    }
    Ok(())
}

async fn client_streaming(
    client: &mut GreeterClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Client-streaming greeting:");
    let requests = ["Josiah", "Austin", "Richard", "Immanuel"]
        .into_iter()
        .map(|name| LongGreetRequest {
            greeting: greeting(name, "Isong"),
        });

    let response = client.long_greet(tokio_stream::iter(requests)).await?;
    println!("\t{}", response.into_inner().result);
    Ok(())
}

async fn bidirectional(
    client: &mut GreeterClient<Channel>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Bidirectional greetings:");
    let outbound = tokio_stream::iter(
        ["Josiah", "Austin", "Richard", "Immanuel"]
            .into_iter()
            .map(|name| GreetEveryoneRequest {
                greeting: greeting(name, "Isong"),
            }),
    );

    bidi::run(
        outbound,
        |requests| async move { Ok(client.greet_everyone(requests).await?.into_inner()) },
        |response: GreetEveryoneResponse| println!("\t{}", response.result),
    )
    .await?;
    Ok(())
}

async fn with_deadline(
    client: &mut GreeterClient<Channel>,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Greeting with a {:?} deadline:", timeout);
    let mut request = Request::new(GreetWithDeadlineRequest {
        greeting: greeting("Josiah", "Isong"),
    });
    request.set_timeout(timeout);

    match client.greet_with_deadline(request).await {
        Ok(response) => println!("\t{}", response.into_inner().result),
        Err(status) if matches!(status.code(), Code::Cancelled | Code::DeadlineExceeded) => {
            println!("\tdeadline was exceeded");
        }
        Err(status) => return Err(status.into()),
    }
    Ok(())
}
