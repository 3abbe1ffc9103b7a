//! Superfície de renderização abstrata do formulário de recarga.
//!
//! O [`UiBinding`] isola a máquina de estados de qualquer tela real: um
//! navegador, um terminal ([`TerminalUi`]) ou um dublê de teste implementam
//! a mesma interface de leitura de campos e escrita de visibilidade.

pub mod sequencer;
pub mod terminal;
#[cfg(test)]
pub mod testing;

use std::fmt;

use tokio::sync::oneshot;

use crate::form::FormState;
use crate::visibility::FieldGroup;

pub use sequencer::{Collapse, Settled, collapse, hide, show};
pub use terminal::TerminalUi;

/// Painéis de nível superior, mutuamente exclusivos em regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Form,
    Loading,
    Success,
    Error,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Form => write!(f, "form"),
            Container::Loading => write!(f, "loading"),
            Container::Success => write!(f, "success"),
            Container::Error => write!(f, "error"),
        }
    }
}

/// Qualquer elemento cuja visibilidade é animada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Group(FieldGroup),
    Container(Container),
}

impl From<FieldGroup> for Element {
    fn from(group: FieldGroup) -> Self {
        Element::Group(group)
    }
}

impl From<Container> for Element {
    fn from(container: Container) -> Self {
        Element::Container(container)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Group(group) => write!(f, "group-{group}"),
            Element::Container(container) => write!(f, "{container}Container"),
        }
    }
}

/// Estado de visibilidade de um elemento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Hidden,
    /// Visível como renderizado no carregamento, sem animação de entrada.
    Visible,
    /// Revelado por [`show`]; colapsar exige esperar a transição terminar.
    Entering,
}

impl Presence {
    pub fn is_visible(self) -> bool {
        !matches!(self, Presence::Hidden)
    }
}

/// Operações que a máquina de estados precisa da superfície de renderização.
pub trait UiBinding {
    /// Valores atuais dos inputs.
    fn read_form(&self) -> FormState;

    /// Token anti-forgery do campo oculto do formulário.
    fn csrf_token(&self) -> String;

    fn presence(&self, element: Element) -> Presence;

    fn set_presence(&mut self, element: Element, presence: Presence);

    /// Notificação única de fim da transição de colapso do elemento.
    ///
    /// O ambiente dispara o `Sender` correspondente quando a animação da
    /// altura termina. Descartar o `Sender` também conta como término.
    fn transition_end(&mut self, element: Element) -> oneshot::Receiver<()>;

    /// Indicador de ocupado (`aria-busy`) do contêiner principal.
    fn set_busy(&mut self, busy: bool);

    /// Habilita ou desabilita a ação de envio.
    fn set_submit_enabled(&mut self, enabled: bool);

    fn set_error_message(&mut self, message: &str);

    /// Marcador visual de erro no painel (pulso).
    fn set_error_pulse(&mut self, active: bool);

    /// Limpa todos os campos do formulário.
    fn clear_fields(&mut self);
}
