use std::net::SocketAddr;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, ServerConfig, StorageConfig};
use server::state::AppState;

pub mod routes {
    pub const INVENTORY: &str = "/api/v1/inventory";
    pub const SEARCH: &str = "/api/v1/search";
    pub const REGISTER_FORM: &str = "/RegisterForm.html";
    pub const SEARCH_FORM: &str = "/SearchForm.html";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn item(id: u64) -> String {
        format!("/api/v1/inventory/{id}")
    }

    pub fn item_photo(id: u64) -> String {
        format!("/api/v1/inventory/{id}/photo")
    }

    pub fn upload(name: &str) -> String {
        format!("/uploads/{name}")
    }
}

/// Upload size limit used by every test server.
pub const MAX_UPLOAD_SIZE: u64 = 1024;

/// A running test server backed by a temporary data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server after letting the caller adjust its config.
    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                public_url: None,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            storage: StorageConfig {
                data_file: dir.path().join("data/inventory.json"),
                uploads_dir: dir.path().join("uploads"),
                max_upload_size: MAX_UPLOAD_SIZE,
            },
        };
        customize(&mut app_config);

        let app = server::build_router(AppState::from_config(app_config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// What the server should report as its base URL for this client.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw body bytes and content type.
    pub async fn get_bytes(&self, url: &str) -> (u16, Option<String>, Vec<u8>) {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to send GET request");
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.expect("Failed to read body").to_vec();
        (status, content_type, bytes)
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send form request");

        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn put_multipart(&self, path: &str, form: Form) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Register an item through the multipart endpoint.
    pub async fn register_item(
        &self,
        name: &str,
        description: &str,
        photo: Option<(&str, Vec<u8>)>,
    ) -> TestResponse {
        let mut form = Form::new()
            .text("inventory_name", name.to_string())
            .text("description", description.to_string());
        if let Some((file_name, bytes)) = photo {
            form = form.part("photo", photo_part(file_name, bytes));
        }
        self.post_multipart(routes::INVENTORY, form).await
    }

    /// Register an item and return its `id`.
    pub async fn create_item(&self, name: &str, description: &str) -> u64 {
        let res = self.register_item(name, description, None).await;
        assert_eq!(res.status, 201, "create_item failed: {}", res.text);
        res.id()
    }

    pub async fn upload_photo(&self, id: u64, file_name: &str, bytes: Vec<u8>) -> TestResponse {
        let form = Form::new().part("photo", photo_part(file_name, bytes));
        self.put_multipart(&routes::item_photo(id), form).await
    }

    /// Number of files in the uploads directory.
    pub fn stored_upload_count(&self) -> usize {
        match std::fs::read_dir(self.dir.path().join("uploads")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

pub fn photo_part(file_name: &str, bytes: Vec<u8>) -> Part {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime.as_ref())
        .expect("Failed to set MIME type")
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> u64 {
        self.body["id"]
            .as_u64()
            .expect("response body should contain 'id'")
    }
}
