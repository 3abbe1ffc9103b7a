//! Erros de transporte ao falar com o backend de recarga.
//!
//! O backend responde JSON mesmo em 400/404, então o código HTTP sozinho
//! não é erro: só falha de rede ou corpo ilegível chegam aqui.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Falha na camada de rede (conexão recusada, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// O corpo da resposta não é o JSON esperado.
    #[error("invalid response body (status {status}): {source}")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}
