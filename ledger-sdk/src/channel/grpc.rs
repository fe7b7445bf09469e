//! gRPC channel
//!
//! Requests are already encoded by the time they reach the channel, so the
//! codec passes bytes through untouched.

use super::{Channel, Method, TransportError};
use async_trait::async_trait;
use bytes::{Buf, BufMut, Bytes};
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel as TonicChannel, Endpoint};
use tonic::{Code, Request, Status};
use tracing::debug;

/// gRPC connection to one node
#[derive(Debug, Clone)]
pub struct GrpcChannel {
    address: String,
    inner: TonicChannel,
}

impl GrpcChannel {
    /// Create a lazily connected channel to `address` (`host:port`)
    pub fn connect_lazy(address: &str, connect_timeout: Duration) -> Result<Self, TransportError> {
        let uri = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        let endpoint = Endpoint::from_shared(uri)
            .map_err(|e| TransportError::Connection(format!("invalid address {}: {}", address, e)))?
            .connect_timeout(connect_timeout)
            .tcp_nodelay(true);

        Ok(Self {
            address: address.to_string(),
            inner: endpoint.connect_lazy(),
        })
    }

    /// Node address
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Channel for GrpcChannel {
    async fn submit(&self, method: Method, request: Bytes) -> Result<Bytes, TransportError> {
        let path = PathAndQuery::try_from(method.path())
            .map_err(|e| TransportError::Rpc {
                code: Code::InvalidArgument as i32,
                message: format!("invalid method path {}: {}", method, e),
            })?;

        let mut grpc = Grpc::new(self.inner.clone());
        grpc.ready()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        debug!(address = %self.address, method = %method, bytes = request.len(), "Sending request");

        let response = grpc
            .unary(Request::new(request), path, BytesCodec)
            .await
            .map_err(status_to_transport_error)?;

        Ok(response.into_inner())
    }
}

fn status_to_transport_error(status: Status) -> TransportError {
    match status.code() {
        Code::DeadlineExceeded => TransportError::DeadlineExceeded,
        Code::Unavailable | Code::ResourceExhausted => {
            TransportError::Unavailable(status.message().to_string())
        }
        code => TransportError::Rpc {
            code: code as i32,
            message: status.message().to_string(),
        },
    }
}

/// Pass-through codec for pre-encoded messages
#[derive(Debug, Clone, Copy, Default)]
struct BytesCodec;

impl Codec for BytesCodec {
    type Encode = Bytes;
    type Decode = Bytes;
    type Encoder = BytesCodec;
    type Decoder = BytesCodec;

    fn encoder(&mut self) -> Self::Encoder {
        BytesCodec
    }

    fn decoder(&mut self) -> Self::Decoder {
        BytesCodec
    }
}

impl Encoder for BytesCodec {
    type Item = Bytes;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        dst.put_slice(&item);
        Ok(())
    }
}

impl Decoder for BytesCodec {
    type Item = Bytes;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let len = src.remaining();
        Ok(Some(src.copy_to_bytes(len)))
    }
}
