use crate::client::{Reply, Transport};
use crate::errors::Result;
use crate::request::Request;
use async_trait::async_trait;
use std::collections::VecDeque;

/// In-memory transport that records requests and plays back canned replies.
///
/// Once the canned replies run out every request succeeds with [`Reply::Empty`].
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    pub(crate) sent: Vec<Request>,
    replies: VecDeque<Result<Reply>>,
}

impl StubTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Result<Reply>>) -> Self {
        Self {
            sent: Vec::new(),
            replies: replies.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn exchange(&mut self, request: &Request) -> Result<Reply> {
        tracing::debug!(command = %request.command, "Stub exchange");
        self.sent.push(request.clone());
        self.replies.pop_front().unwrap_or(Ok(Reply::Empty))
    }
}
