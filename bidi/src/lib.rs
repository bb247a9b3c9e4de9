//! Client-side coordination for bidirectional streaming calls.
//!
//! A bidirectional call has two independent directions: outbound items are
//! sent until a single half-close, and inbound items arrive until the stream's
//! terminal marker. [`run`] drives both directions as separate tasks that
//! communicate only through the stream itself, and reports completion through
//! a single-use done signal once the inbound direction has finished.

use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::Status;

/// Outbound items buffered between the producer and the transport.
const SEND_BUFFER: usize = 16;

/// Drives one bidirectional streaming call to completion.
///
/// `outbound` supplies the items to send, in order. `start` opens the call:
/// it receives the request stream and resolves to the inbound response
/// stream. `consume` is invoked for every inbound item.
///
/// The send direction half-closes exactly once, after the last outbound
/// item. The call completes only when the inbound direction observes its
/// terminal marker; the half-close alone does not complete it, since the
/// peer may keep producing output after input ends. An inbound [`Status`]
/// terminates the call and is returned to the caller; the send direction
/// observes the teardown through stream closure and unwinds instead of
/// blocking. If the peer closes its output while outbound items remain,
/// the call still completes and the send task is stopped.
pub async fn run<Out, In, S, Start, Fut, Inbound, Consume>(
    outbound: S,
    start: Start,
    mut consume: Consume,
) -> Result<(), Status>
where
    S: Stream<Item = Out> + Send + 'static,
    Out: Send + 'static,
    In: Send + 'static,
    Start: FnOnce(ReceiverStream<Out>) -> Fut,
    Fut: Future<Output = Result<Inbound, Status>>,
    Inbound: Stream<Item = Result<In, Status>> + Send + 'static,
    Consume: FnMut(In) + Send + 'static,
{
    let (tx, rx) = mpsc::channel(SEND_BUFFER);
    let inbound = start(ReceiverStream::new(rx)).await?;

    let sender = tokio::spawn(async move {
        tokio::pin!(outbound);
        while let Some(item) = outbound.next().await {
            if tx.send(item).await.is_err() {
                // Stream torn down; the receive direction reports the error.
                return;
            }
        }
        // Dropping the sender half-closes the outbound direction.
    });

    let (done_tx, done_rx) = oneshot::channel();
    tokio::spawn(async move {
        tokio::pin!(inbound);
        let outcome = loop {
            match inbound.next().await {
                Some(Ok(item)) => consume(item),
                Some(Err(status)) => break Err(status),
                None => break Ok(()),
            }
        };
        let _ = done_tx.send(outcome);
    });

    let outcome = done_rx
        .await
        .unwrap_or_else(|_| Err(Status::internal("receive loop terminated abnormally")));
    sender.abort();
    outcome
}
