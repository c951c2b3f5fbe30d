pub mod client;
pub mod request;
pub mod response;

use crate::config::Credentials;
use reqwest::{header::USER_AGENT, RequestBuilder};

pub use client::PinataClient;
pub use request::{FilePart, PinMetadata, UploadRequest};

const API_KEY_HEADER: &str = "pinata_api_key";
const SECRET_API_KEY_HEADER: &str = "pinata_secret_api_key";

pub trait Headers {
    fn credential_headers(self, credentials: &Credentials) -> RequestBuilder;
}

impl Headers for RequestBuilder {
    fn credential_headers(self, credentials: &Credentials) -> RequestBuilder {
        self.header(API_KEY_HEADER, &credentials.api_key)
            .header(SECRET_API_KEY_HEADER, &credentials.secret_api_key)
            .header(USER_AGENT, "pinata-deploy")
    }
}
