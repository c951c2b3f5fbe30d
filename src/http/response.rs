use crate::error::Error;
use serde::Deserialize;

/// Body of a successful `pinFileToIPFS` call. Every field is optional on the
/// wire; only the hash decides whether the pin succeeded.
#[derive(Debug, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: Option<String>,
    #[serde(rename = "PinSize")]
    pub pin_size: Option<u64>,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "isDuplicate")]
    pub is_duplicate: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pinned {
    pub cid: String,
    pub pin_size: Option<u64>,
    pub timestamp: Option<String>,
    pub is_duplicate: bool,
}

impl Pinned {
    pub async fn from_response(response: reqwest::Response) -> Result<Pinned, Error> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Pinned::parse(body)
    }

    pub fn parse(body: String) -> Result<Pinned, Error> {
        let response = match serde_json::from_str::<PinResponse>(&body) {
            Ok(response) => response,
            Err(cause) => return Err(Error::MalformedResponse { body, cause }),
        };

        match response.ipfs_hash.filter(|hash| !hash.trim().is_empty()) {
            Some(cid) => Ok(Pinned {
                cid,
                pin_size: response.pin_size,
                timestamp: response.timestamp,
                is_duplicate: response.is_duplicate.unwrap_or_default(),
            }),
            None => Err(Error::MissingIdentifier { body }),
        }
    }
}
