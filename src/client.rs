// File: ./src/client.rs
// REST client for a remote lost-and-found backend
use crate::error::{LostFoundError, Result, UploadError};
use crate::model::{Item, ItemStatus};
use crate::upload::ImageFile;

use bytes::Bytes;
use http::{Method, Request, StatusCode, Uri, header};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::auth::AddAuthorization;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Serialize)]
struct StatusBody {
    status: ItemStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

#[derive(Clone, Debug)]
pub struct RemoteClient {
    base_url: String,
    http: HttpsClient,
    auth: Option<AddAuthorization<HttpsClient>>,
    // Multipart uploads go through reqwest, sharing the same TLS setup.
    uploads: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl RemoteClient {
    pub fn new(url: &str, user: &str, pass: &str) -> Result<Self> {
        let base_url = url.trim().trim_end_matches('/').to_string();
        base_url
            .parse::<Uri>()
            .map_err(|e| LostFoundError::Config(format!("invalid url '{}': {}", url, e)))?;

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No system certificates found; https endpoints will fail to verify");
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let uploads = reqwest::Client::builder()
            .use_preconfigured_tls(tls_config.clone())
            .build()
            .map_err(|e| LostFoundError::Config(format!("upload client: {}", e)))?;

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http: HttpsClient = Client::builder(TokioExecutor::new()).build(https_connector);
        let (auth, credentials) = if user.is_empty() {
            (None, None)
        } else {
            (
                Some(AddAuthorization::basic(http.clone(), user, pass)),
                Some((user.to_string(), pass.to_string())),
            )
        };

        Ok(Self {
            base_url,
            http,
            auth,
            uploads,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn item_path(id: &str) -> String {
        format!("/api/items/{}", urlencoding::encode(id))
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> std::result::Result<(StatusCode, Bytes), String> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let response = match &self.auth {
            Some(authed) => authed.clone().oneshot(request).await,
            None => self.http.request(request).await,
        }
        .map_err(|e| format!("{} {}: {}", method, uri, e))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| format!("{} {}: reading body: {}", method, uri, e))?
            .to_bytes();
        log::debug!("{} {} -> {}", method, uri, status);
        Ok((status, body))
    }

    async fn json_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, Bytes)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(self.endpoint(path))
            .header(header::ACCEPT, "application/json");
        let payload = match body {
            Some(b) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Bytes::from(serde_json::to_vec(b)?)
            }
            None => Bytes::new(),
        };
        let request = builder
            .body(Full::new(payload))
            .map_err(|e| LostFoundError::Persistence(e.to_string()))?;
        self.send(request).await.map_err(LostFoundError::Persistence)
    }

    fn unexpected(status: StatusCode, body: &Bytes) -> LostFoundError {
        LostFoundError::Persistence(format!(
            "server answered {}: {}",
            status,
            String::from_utf8_lossy(body).trim()
        ))
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let (status, body) = self
            .json_request::<()>(Method::GET, "/api/items", None)
            .await?;
        if !status.is_success() {
            return Err(Self::unexpected(status, &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<Item>> {
        let (status, body) = self
            .json_request::<()>(Method::GET, &Self::item_path(id), None)
            .await?;
        match status {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(serde_json::from_slice(&body)?)),
            s => Err(Self::unexpected(s, &body)),
        }
    }

    pub async fn create_item(&self, item: &Item) -> Result<Item> {
        let (status, body) = self
            .json_request(Method::POST, "/api/items", Some(item))
            .await?;
        if !status.is_success() {
            return Err(Self::unexpected(status, &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn update_status(&self, id: &str, status: ItemStatus) -> Result<Option<Item>> {
        let path = format!("{}/status", Self::item_path(id));
        let (code, body) = self
            .json_request(Method::PUT, &path, Some(&StatusBody { status }))
            .await?;
        match code {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::CONFLICT => Err(LostFoundError::InvalidTransition(id.to_string())),
            s if s.is_success() => Ok(Some(serde_json::from_slice(&body)?)),
            s => Err(Self::unexpected(s, &body)),
        }
    }

    /// Sends the file as `multipart/form-data` field `file` and returns the stored path.
    pub async fn upload_image(&self, file: &ImageFile) -> std::result::Result<String, UploadError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type())
            .map_err(|e| UploadError::Remote(format!("invalid content type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let url = self.endpoint("/api/upload");
        let mut request = self
            .uploads
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .multipart(form);
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Remote(format!("POST {}: {}", url, e)))?;
        let status = response.status();
        log::debug!("POST {} -> {}", url, status);
        if !status.is_success() {
            return Err(UploadError::Remote(format!("server answered {}", status)));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::Remote(format!("POST {}: reading body: {}", url, e)))?;
        let parsed: UploadResponse =
            serde_json::from_slice(&body).map_err(|e| UploadError::Remote(e.to_string()))?;
        Ok(parsed.image_url)
    }
}
