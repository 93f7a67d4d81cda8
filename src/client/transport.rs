use crate::errors::Error;
use crate::request::Request;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

/// A successful reply, as framed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A multi-line `key=value` body.
    Status(Bytes),
    /// A single reply line, without its terminator.
    Line(String),
    /// Success without any content.
    Empty,
}

/// One request/response exchange with the PWI4 server.
///
/// Replies are correlated with requests purely by order, so implementations
/// may assume `exchange` calls never overlap (`&mut self` enforces it).
#[async_trait]
pub trait Transport: Debug + Send {
    /// Send `request` and wait for its reply.
    async fn exchange(&mut self, request: &Request) -> Result<Reply, Error>;
}

#[async_trait]
impl<T: ?Sized + Transport> Transport for Box<T> {
    async fn exchange(&mut self, request: &Request) -> Result<Reply, Error> {
        (**self).exchange(request).await
    }
}
