//! Tipos de dados trocados com os endpoints `/recarregar` e `/status/{id}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::form::FormState;

/// Corpo JSON enviado para `/recarregar`.
///
/// Os campos carregam os valores crus dos inputs; a validação fica a cargo
/// do servidor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeRequest {
    pub forma_pagamento: String,
    pub nome_pagador: String,
    pub numero_cartao: String,
    pub valor: String,
}

impl From<&FormState> for RechargeRequest {
    fn from(form: &FormState) -> Self {
        Self {
            forma_pagamento: form.method.map(|m| m.as_value()).unwrap_or_default().to_string(),
            nome_pagador: form.payer_name.clone(),
            numero_cartao: form.card_number.clone(),
            valor: form.amount.clone(),
        }
    }
}

/// Identificador opaco da tarefa de recarga devolvido pelo servidor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub(crate) String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resposta de `/recarregar`. Sem `success` (ausente ou `null`) a
/// submissão conta como recusada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Situação da tarefa. Qualquer valor diferente de `completed` ou `failed`
/// (ex.: `pending`) significa que ainda está em andamento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Pending,
}

/// Resposta de `/status/{id}`. Um `status` ausente ou `null` é pendente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_terminal(&self) -> bool {
        self.status != TaskStatus::Pending
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[cfg(test)]
impl SubmitResponse {
    pub fn accepted(task_id: impl Into<String>) -> Self {
        Self {
            success: true,
            task_id: Some(TaskId::new(task_id)),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            task_id: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
impl StatusResponse {
    pub fn pending() -> Self {
        Self {
            status: TaskStatus::Pending,
            message: None,
        }
    }

    pub fn completed() -> Self {
        Self {
            status: TaskStatus::Completed,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            message: Some(message.into()),
        }
    }
}
