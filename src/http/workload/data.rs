use std::sync::Arc;

use bytes::Bytes;
use rand::Rng;
use reqwest::{
    Client, Method, Request, Url,
    header::{HeaderName, HeaderValue},
};

/// A fully validated request that workers send as-is.
///
/// Descriptors are built once before the run starts and only ever shared by
/// reference afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    body: Bytes,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl RequestDescriptor {
    #[must_use]
    pub const fn new(
        method: Method,
        url: Url,
        body: Bytes,
        headers: Vec<(HeaderName, HeaderValue)>,
    ) -> Self {
        Self {
            method,
            url,
            body,
            headers,
        }
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Builds a fresh request for the shared client.
    ///
    /// # Errors
    ///
    /// Returns an error when reqwest refuses the request parts.
    pub fn build(&self, client: &Client) -> Result<Request, reqwest::Error> {
        let mut builder = client.request(self.method.clone(), self.url.clone());
        for (name, value) in &self.headers {
            builder = builder.header(name.clone(), value.clone());
        }
        builder.body(self.body.clone()).build()
    }
}

/// A request list that is non-empty by construction.
#[derive(Debug)]
pub struct PreloadedRequests {
    first: RequestDescriptor,
    rest: Vec<RequestDescriptor>,
}

impl PreloadedRequests {
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn new(mut requests: Vec<RequestDescriptor>) -> Option<Self> {
        if requests.is_empty() {
            return None;
        }
        let rest = requests.split_off(1);
        let first = requests.pop()?;
        Some(Self { first, rest })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len().saturating_add(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RequestDescriptor> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(rest_index) => self.rest.get(rest_index),
        }
    }
}

/// Supplies the next request a worker should send.
///
/// Cloning is cheap; every clone reads the same immutable descriptors.
#[derive(Debug, Clone)]
pub enum RequestSource {
    Template(Arc<RequestDescriptor>),
    Preloaded(Arc<PreloadedRequests>),
}

impl RequestSource {
    #[must_use]
    pub fn template(descriptor: RequestDescriptor) -> Self {
        Self::Template(Arc::new(descriptor))
    }

    #[must_use]
    pub fn preloaded(requests: PreloadedRequests) -> Self {
        Self::Preloaded(Arc::new(requests))
    }

    /// Number of distinct descriptors this source picks from.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RequestSource::Template(_) => 1,
            RequestSource::Preloaded(requests) => requests.len(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn next(&self) -> &RequestDescriptor {
        self.next_with(&mut rand::thread_rng())
    }

    /// Picks the next descriptor, drawing list indices uniformly from `rng`.
    pub fn next_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &RequestDescriptor {
        match self {
            RequestSource::Template(template) => template.as_ref(),
            RequestSource::Preloaded(requests) => {
                let index = rng.gen_range(0..requests.len());
                requests.get(index).unwrap_or(&requests.first)
            }
        }
    }
}
