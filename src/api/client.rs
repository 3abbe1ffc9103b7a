use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{RechargeRequest, StatusResponse, SubmitResponse, TaskId};

/// Cabeçalho que carrega o token anti-forgery do formulário.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Chamadas de rede que a máquina de estados precisa fazer.
pub trait RechargeApi: Send + Sync + 'static {
    /// Envia o formulário para `/recarregar`.
    fn submit(
        &self,
        request: &RechargeRequest,
        csrf_token: &str,
    ) -> impl Future<Output = Result<SubmitResponse, ApiError>> + Send;

    /// Consulta `/status/{task_id}`.
    fn status(
        &self,
        task_id: &TaskId,
    ) -> impl Future<Output = Result<StatusResponse, ApiError>> + Send;
}

/// Cliente HTTP do backend de recarga.
pub struct RechargeClient {
    client: Client,
    base_url: String,
}

impl RechargeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Lê o corpo como JSON qualquer que seja o código HTTP.
    async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::InvalidBody { status, source })
    }
}

impl RechargeApi for RechargeClient {
    async fn submit(
        &self,
        request: &RechargeRequest,
        csrf_token: &str,
    ) -> Result<SubmitResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/recarregar", self.base_url))
            .header(CSRF_HEADER, csrf_token)
            .json(request)
            .send()
            .await?;

        Self::parse_body(response).await
    }

    async fn status(&self, task_id: &TaskId) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, task_id))
            .send()
            .await?;

        Self::parse_body(response).await
    }
}
