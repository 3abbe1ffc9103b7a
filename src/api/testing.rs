//! [`RechargeApi`] roteirizado para testes, sem rede.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ApiError, RechargeApi, RechargeRequest, StatusResponse, SubmitResponse, TaskId};

/// Resposta roteirizada: sucesso ou um erro de transporte.
pub enum Scripted<T> {
    Ok(T),
    TransportError,
}

pub struct ScriptedApi {
    submit: Mutex<VecDeque<Scripted<SubmitResponse>>>,
    statuses: Mutex<VecDeque<Scripted<StatusResponse>>>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub last_request: Mutex<Option<(RechargeRequest, String)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            submit: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn on_submit(self, response: Scripted<SubmitResponse>) -> Self {
        self.submit.lock().unwrap().push_back(response);
        self
    }

    pub fn on_status(self, response: Scripted<StatusResponse>) -> Self {
        self.statuses.lock().unwrap().push_back(response);
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

fn transport_error() -> ApiError {
    let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
    ApiError::InvalidBody { status: 502, source }
}

impl RechargeApi for ScriptedApi {
    async fn submit(
        &self,
        request: &RechargeRequest,
        csrf_token: &str,
    ) -> Result<SubmitResponse, ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((request.clone(), csrf_token.to_string()));
        let next = self.submit.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ok(resp)) => Ok(resp),
            Some(Scripted::TransportError) | None => Err(transport_error()),
        }
    }

    async fn status(&self, _task_id: &TaskId) -> Result<StatusResponse, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        // Roteiro esgotado: a tarefa continua pendente.
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ok(resp)) => Ok(resp),
            Some(Scripted::TransportError) => Err(transport_error()),
            None => Ok(StatusResponse::pending()),
        }
    }
}
