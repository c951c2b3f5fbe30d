use crate::{
    collect,
    config::Config,
    error::Error,
    http::{PinMetadata, PinataClient, UploadRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub cid: String,
    pub gateway_url: String,
    pub files: usize,
}

impl Deployment {
    pub fn summary(&self) -> String {
        let rule = "-".repeat(55);

        format!(
            "{rule}\nDeployment Successful\nFiles uploaded: {}\nNew IPFS CID: {}\nPinata Gateway URL: {}\n{rule}",
            self.files, self.cid, self.gateway_url
        )
    }
}

/// Uploads the configured source directory to Pinata in a single request.
///
/// Credentials and the source directory are checked before any file is
/// opened, so a configuration error never reaches the network.
pub async fn deploy(config: &Config, client: &PinataClient) -> Result<Deployment, Error> {
    config.credentials.validate()?;

    let root = &config.settings.source_dir;
    let is_dir = tokio::fs::metadata(root)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(Error::SourceNotFound {
            path: root.to_owned(),
        });
    }

    log::info!("Starting deployment of '{}' to Pinata", root.display());
    let files = collect::collect_files(root).await?;

    let request = UploadRequest::new(
        files,
        PinMetadata::new(&config.settings.pin_name, &config.context),
    );
    if request.is_empty() {
        log::warn!(
            "No files found in '{}', uploading metadata only",
            root.display()
        );
    }
    log::debug!("files: {:?}", request.paths());
    let count = request.len();

    log::info!("Uploading {} files to {}", count, client.endpoint());
    let pinned = client.pin_file_to_ipfs(request).await?;

    if let Some(size) = pinned.pin_size {
        log::info!(
            "Pinned {} bytes at {}",
            size,
            pinned.timestamp.as_deref().unwrap_or("unknown time")
        );
    }
    if pinned.is_duplicate {
        log::info!("Pinata already had this content pinned");
    }

    Ok(Deployment {
        gateway_url: config.settings.gateway_url(&pinned.cid),
        cid: pinned.cid,
        files: count,
    })
}
