//! HTTP client for the ClipDrop uncrop endpoint.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{OutpaintError, Outpainter};
use crate::bounds::ExtendMargins;
use crate::config::ReframeConfig;

/// Form field carrying the image.
const IMAGE_FIELD: &str = "image_file";
/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Outpainter backed by the ClipDrop `uncrop/v1` API.
#[derive(Debug, Clone)]
pub struct ClipdropClient {
    endpoint: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ClipdropClient {
    /// Create a client posting to `endpoint`.
    ///
    /// `timeout_secs` bounds the whole request on native targets. On wasm32
    /// the browser's fetch owns timeouts and the value is only reported.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, OutpaintError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(timeout_secs));

        let client = builder
            .build()
            .map_err(|e| OutpaintError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client for the endpoint and timeout in `config`.
    pub fn from_config(config: &ReframeConfig) -> Result<Self, OutpaintError> {
        Self::new(&config.endpoint, config.timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(image: &[u8], margins: &ExtendMargins) -> Result<Form, OutpaintError> {
        let (file_name, mime) = upload_file_meta(image);
        let part = Part::bytes(image.to_vec())
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| OutpaintError::Transport(e.to_string()))?;

        let form = margins
            .form_fields()
            .into_iter()
            .fold(Form::new().part(IMAGE_FIELD, part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }

    fn transport_error(&self, e: reqwest::Error) -> OutpaintError {
        if e.is_timeout() {
            OutpaintError::Transport(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            OutpaintError::Transport(e.to_string())
        }
    }
}

impl Outpainter for ClipdropClient {
    async fn extend(
        &self,
        image: &[u8],
        margins: &ExtendMargins,
        credential: &str,
    ) -> Result<Vec<u8>, OutpaintError> {
        let form = Self::build_form(image, margins)?;
        log::info!(
            "Requesting uncrop of {} bytes by {:?} from {}",
            image.len(),
            margins,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, credential)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = parse_error_message(status.as_u16(), &body);
            log::warn!("Uncrop failed with status {}: {}", status.as_u16(), message);
            return Err(OutpaintError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        log::info!("Uncrop returned {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Error body returned by the service.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// User-facing message for a failed response.
///
/// - JSON body with a non-empty `error` string: that string
/// - JSON body without one: `API error: <status>`
/// - missing or unparsable body: `Unknown error`
pub fn parse_error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("API error: {status}")),
        Err(_) => "Unknown error".to_string(),
    }
}

/// File name and MIME type for the uploaded image, sniffed from its bytes.
///
/// Falls back to `image.jpg` / `image/jpeg` for unrecognized data.
pub fn upload_file_meta(image: &[u8]) -> (String, &'static str) {
    match image::guess_format(image) {
        Ok(format) => {
            let ext = format.extensions_str().first().copied().unwrap_or("jpg");
            (format!("image.{ext}"), format.to_mime_type())
        }
        Err(_) => ("image.jpg".to_string(), "image/jpeg"),
    }
}
