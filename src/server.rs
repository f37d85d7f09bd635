//! UDP Request Dispatcher
//!
//! One long-lived loop blocks on datagram receipt; every datagram is handled
//! in its own spawned task so a stalled lookup never stalls the receive
//! loop. In-flight tasks are bounded by a semaphore sized from
//! `max_inflight` — at the bound the loop waits for a free permit instead of
//! growing without limit.
//!
//! Per request: Receive → Decode → Resolve (once per question, results
//! concatenated in question order) → Encode → Send. Decode errors are logged
//! and handling proceeds with whatever parsed. No retry, no per-request
//! timeout, no response-ordering guarantee.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::resolver::Resolver;
use crate::wire::{
    Header, Message, FLAG_RESPONSE, HEADER_SIZE, MAX_MESSAGE_SIZE, RCODE_NXDOMAIN,
};

/// Run the responder on an already-bound socket. Never returns except on a
/// closed semaphore, which cannot happen here.
pub async fn run_server(
    socket: UdpSocket,
    resolver: Resolver,
    config: Arc<ServerConfig>,
) -> anyhow::Result<()> {
    let socket = Arc::new(socket);
    let resolver = Arc::new(resolver);
    let limiter = Arc::new(Semaphore::new(config.max_inflight));

    loop {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(err) => {
                warn!("socket receive error: {err}");
                continue;
            }
        };

        info!("Received request from {peer}");

        let permit = limiter.clone().acquire_owned().await?;
        let socket = socket.clone();
        let resolver = resolver.clone();
        let config = config.clone();
        let request = buf[..len].to_vec();

        tokio::spawn(async move {
            let _permit = permit;
            if let Some(response) = handle_datagram(&request, &resolver, &config).await {
                send_response(&socket, peer, &response).await;
            }
        });
    }
}

/// The pure per-request pipeline: decode, resolve each question in order,
/// encode. Returns `None` when no response should be sent (header-truncated
/// input, or an encode failure).
pub(crate) async fn handle_datagram(
    request: &[u8],
    resolver: &Resolver,
    config: &ServerConfig,
) -> Option<Vec<u8>> {
    if request.len() < HEADER_SIZE {
        warn!("dropping {}-byte datagram, shorter than the DNS header", request.len());
        return None;
    }

    let decoded = Message::decode(request);
    for err in &decoded.errors {
        warn!("decode error: {err}");
    }
    let query = decoded.message;

    let mut answers = Vec::new();
    let mut authorities = Vec::new();
    let mut additionals = Vec::new();
    let mut any_miss = false;

    for question in &query.questions {
        let resolved = resolver.resolve(question).await;
        any_miss |= resolved.miss;
        answers.extend(resolved.answers);
        authorities.extend(resolved.authorities);
        additionals.extend(resolved.additionals);
    }

    let mut flags = FLAG_RESPONSE;
    let empty = answers.is_empty() && authorities.is_empty() && additionals.is_empty();
    if config.nxdomain_on_miss && any_miss && empty && !query.questions.is_empty() {
        flags |= RCODE_NXDOMAIN;
    }

    let response = Message {
        header: Header {
            transaction_id: query.header.transaction_id,
            flags,
            // Counts are recomputed by encode
            ..Header::default()
        },
        // Questions are re-echoed verbatim
        questions: query.questions,
        answers,
        authorities,
        additionals,
    };

    match response.encode() {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!("encode error: {err}");
            None
        }
    }
}

async fn send_response(socket: &UdpSocket, peer: SocketAddr, response: &[u8]) {
    if response.len() > MAX_MESSAGE_SIZE {
        // Truncation and the TC flag are out of scope; send anyway
        warn!(
            "response to {peer} is {} bytes, over the {MAX_MESSAGE_SIZE}-byte UDP ceiling",
            response.len()
        );
    }

    if let Err(err) = socket.send_to(response, peer).await {
        warn!("send to {peer} failed: {err}");
    }
}
