//! Interface de linha de comando do recarga baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (check, submit)
//! e flags globais (--config, --base-url, --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::form::{FormState, PaymentMethod};

/// Recarga — envia recargas de cartão e acompanha o processamento.
#[derive(Debug, Parser)]
#[command(name = "recarga", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./recarga.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// URL base do backend, sobrepõe o arquivo de configuração.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Valores dos campos do formulário, como digitados.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Forma de pagamento: PIX ou DINHEIRO.
    #[arg(long, default_value = "")]
    pub forma: String,

    /// Nome do pagador (exigido no PIX).
    #[arg(long, default_value = "")]
    pub nome: String,

    /// Número do cartão (4 a 6 dígitos).
    #[arg(long, default_value = "")]
    pub cartao: String,

    /// Valor da recarga em reais, vírgula como separador decimal.
    #[arg(long, default_value = "")]
    pub valor: String,
}

impl FormArgs {
    pub fn to_form(&self) -> FormState {
        FormState::new(
            PaymentMethod::from_value(&self.forma),
            self.nome.clone(),
            self.cartao.clone(),
            self.valor.clone(),
        )
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mostra quais campos ficam visíveis para os valores informados.
    Check {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Envia a recarga e acompanha o status até a conclusão.
    Submit {
        #[command(flatten)]
        form: FormArgs,

        /// Token anti-forgery enviado no cabeçalho X-CSRFToken.
        #[arg(long, default_value = "")]
        csrf_token: String,
    },
}
