//! Configuração do recarga carregada a partir de `recarga.toml`.
//!
//! A struct [`RecargaConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis, iguais aos
//! tempos da página original.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::api::RechargeClient;
use crate::error::RecargaError;

/// Arquivo procurado no diretório atual quando nenhum caminho é informado.
pub const DEFAULT_CONFIG_FILE: &str = "recarga.toml";

/// Configuração de nível superior carregada de `recarga.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecargaConfig {
    /// URL base do backend que expõe `/recarregar` e `/status/{id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tempo máximo de cada requisição HTTP, em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Intervalo entre consultas de status.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Espera após o sucesso antes de resetar o formulário.
    #[serde(default = "default_success_reset_ms")]
    pub success_reset_ms: u64,

    /// Espera após a falha antes de resetar o formulário.
    #[serde(default = "default_error_reset_ms")]
    pub error_reset_ms: u64,

    /// Duração do pulso visual de erro.
    #[serde(default = "default_error_pulse_ms")]
    pub error_pulse_ms: u64,

    /// Prazo máximo de espera pelo fim de uma transição de colapso.
    #[serde(default = "default_transition_fallback_ms")]
    pub transition_fallback_ms: u64,
}

// Backend local servido pelo Flask.
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_success_reset_ms() -> u64 {
    2500
}

fn default_error_reset_ms() -> u64 {
    3000
}

fn default_error_pulse_ms() -> u64 {
    600
}

fn default_transition_fallback_ms() -> u64 {
    1000
}

impl Default for RecargaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            success_reset_ms: default_success_reset_ms(),
            error_reset_ms: default_error_reset_ms(),
            error_pulse_ms: default_error_pulse_ms(),
            transition_fallback_ms: default_transition_fallback_ms(),
        }
    }
}

/// Tempos usados pelo orquestrador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval: Duration,
    pub success_reset: Duration,
    pub error_reset: Duration,
    pub error_pulse: Duration,
    pub transition_fallback: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        RecargaConfig::default().timings()
    }
}

impl RecargaConfig {
    /// Carrega `recarga.toml` do diretório atual, ou os defaults se não existir.
    pub fn load() -> Result<Self, RecargaError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Carrega a configuração do caminho informado.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self, RecargaError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RecargaConfig>(&contents)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RecargaError> {
        if self.base_url.trim().is_empty() {
            return Err(RecargaError::Config("base_url must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(RecargaError::Config(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Cliente HTTP apontado para `base_url`.
    pub fn client(&self) -> Result<RechargeClient, RecargaError> {
        Ok(RechargeClient::new(
            self.base_url.clone(),
            self.request_timeout(),
        )?)
    }

    pub fn timings(&self) -> Timings {
        Timings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            success_reset: Duration::from_millis(self.success_reset_ms),
            error_reset: Duration::from_millis(self.error_reset_ms),
            error_pulse: Duration::from_millis(self.error_pulse_ms),
            transition_fallback: Duration::from_millis(self.transition_fallback_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = RecargaConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.success_reset_ms, 2500);
        assert_eq!(config.error_reset_ms, 3000);
        assert_eq!(config.error_pulse_ms, 600);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            base_url = "http://recarga.local:8080"
            poll_interval_ms = 500
        "#;
        let config: RecargaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "http://recarga.local:8080");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.error_reset_ms, 3000);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn timings_from_config() {
        let timings = RecargaConfig::default().timings();
        assert_eq!(timings.poll_interval, Duration::from_millis(1000));
        assert_eq!(timings.success_reset, Duration::from_millis(2500));
        assert_eq!(timings.error_reset, Duration::from_millis(3000));
        assert_eq!(timings.error_pulse, Duration::from_millis(600));
        assert_eq!(timings, Timings::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "error_reset_ms = 1500").unwrap();

        let config = RecargaConfig::load_from(file.path()).unwrap();
        assert_eq!(config.error_reset_ms, 1500);
        assert_eq!(config.success_reset_ms, 2500);
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecargaConfig::load_from(&dir.path().join("recarga.toml")).unwrap();
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"  \"").unwrap();

        let err = RecargaConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, RecargaError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = \"rápido\"").unwrap();

        let err = RecargaConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, RecargaError::Toml(_)));
    }

    #[test]
    fn client_uses_configured_base_url() {
        let config = RecargaConfig {
            base_url: "http://localhost:8080/".into(),
            ..RecargaConfig::default()
        };
        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
