//! Network fetcher backed by reqwest.

use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use super::traits::{Fetcher, Request, Response, ResponseType};
use crate::error::WorkerError;

/// Fetches requests over HTTP and tags them relative to the app origin.
#[derive(Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
  origin: Url,
}

impl HttpFetcher {
  pub fn new(origin: Url) -> Result<Self, WorkerError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("futbol-total/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| WorkerError::Network {
        url: origin.to_string(),
        reason: e.to_string(),
      })?;
    Ok(Self { client, origin })
  }
}

/// Same-origin responses are `basic`, everything else `cors`.
fn classify(origin: &Url, url: &Url) -> ResponseType {
  if url.origin() == origin.origin() {
    ResponseType::Basic
  } else {
    ResponseType::Cors
  }
}

impl Fetcher for HttpFetcher {
  async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
    let network_err = |e: reqwest::Error| WorkerError::Network {
      url: request.url.clone(),
      reason: e.to_string(),
    };

    let url =
      Url::parse(&request.url).map_err(|e| WorkerError::InvalidUrl(request.url.clone(), e))?;
    debug!(method = %request.method, url = %url, "network fetch");

    let resp = self
      .client
      .request(request.method.clone(), url.clone())
      .send()
      .await
      .map_err(network_err)?;

    let status = resp.status().as_u16();
    let final_url = resp.url().clone();
    let content_type = resp
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map(String::from);
    let body = resp.bytes().await.map_err(network_err)?.to_vec();

    Ok(Response {
      response_type: classify(&self.origin, &final_url),
      url: final_url.to_string(),
      status,
      content_type,
      body,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_response_type_by_origin() {
    let origin = Url::parse("https://futbol.test/").unwrap();
    let at = |s: &str| Url::parse(s).unwrap();
    assert_eq!(
      classify(&origin, &at("https://futbol.test/estilo.css")),
      ResponseType::Basic
    );
    assert_eq!(
      classify(&origin, &at("https://cdnjs.cloudflare.com/x.css")),
      ResponseType::Cors
    );
    assert_eq!(
      classify(&origin, &at("http://futbol.test/")),
      ResponseType::Cors
    );
  }
}
