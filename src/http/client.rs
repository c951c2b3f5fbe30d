use super::{request::UploadRequest, response::Pinned, Headers};
use crate::{config::Credentials, error::Error};
use reqwest::Client;

#[derive(Clone, Debug)]
pub struct PinataClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl PinataClient {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> PinataClient {
        PinataClient {
            client: Client::new(),
            endpoint: endpoint.into(),
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the whole request as one multipart POST. Non-2xx statuses and
    /// responses without an `IpfsHash` are errors; nothing is retried.
    pub async fn pin_file_to_ipfs(&self, request: UploadRequest) -> Result<Pinned, Error> {
        let form = request.into_form()?;

        log::debug!("posting to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .credential_headers(&self.credentials)
            .multipart(form)
            .send()
            .await?;

        log::debug!("pinata responded with {}", response.status());
        Pinned::from_response(response).await
    }
}
