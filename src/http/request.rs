use crate::{config::RunContext, error::Error};
use reqwest::{
    multipart::{Form, Part},
    Body,
};
use serde::Serialize;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

const FILE_FIELD: &str = "file";
const METADATA_FIELD: &str = "pinataMetadata";

const OCTET_STREAM: &str = "application/octet-stream";
const JSON: &str = "application/json";

/// An open file from the source directory, named by its `/`-separated path
/// relative to the root. The handle is closed when the part is dropped.
///
/// `len` is the size seen when the file was opened and is declared as the
/// part length. A file that grows or shrinks before it is streamed makes the
/// whole request fail with `Error::Request`.
#[derive(Debug)]
pub struct FilePart {
    path: String,
    file: File,
    len: u64,
}

impl FilePart {
    pub fn new(path: impl Into<String>, file: File, len: u64) -> Self {
        FilePart {
            path: path.into(),
            file,
            len,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn into_part(self) -> Result<Part, Error> {
        let stream = FramedRead::new(self.file, BytesCodec::new());

        let part = Part::stream_with_length(Body::wrap_stream(stream), self.len)
            .file_name(self.path)
            .mime_str(OCTET_STREAM)?;

        Ok(part)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinMetadata {
    pub keyvalues: KeyValues,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValues {
    pub github_workflow: String,
    pub github_run_id: String,
}

impl PinMetadata {
    pub fn new(name: impl Into<String>, context: &RunContext) -> Self {
        PinMetadata {
            keyvalues: KeyValues {
                github_workflow: context.workflow.to_owned(),
                github_run_id: context.run_id.to_owned(),
            },
            name: name.into(),
        }
    }
}

#[derive(Debug)]
pub struct UploadRequest {
    files: Vec<FilePart>,
    metadata: PinMetadata,
}

impl UploadRequest {
    pub fn new(files: Vec<FilePart>, metadata: PinMetadata) -> Self {
        UploadRequest { files, metadata }
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(FilePart::path).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consumes the request into a multipart form: one `file` part per file,
    /// in order, followed by the `pinataMetadata` part.
    pub fn into_form(self) -> Result<Form, Error> {
        let mut form = Form::new();

        for file in self.files {
            form = form.part(FILE_FIELD, file.into_part()?);
        }

        let metadata = serde_json::to_string(&self.metadata).map_err(Error::Metadata)?;
        let metadata = Part::text(metadata).mime_str(JSON)?;

        Ok(form.part(METADATA_FIELD, metadata))
    }
}
