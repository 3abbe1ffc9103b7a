//! Sequenciamento de mostrar/esconder com animação.
//!
//! `collapse(A)` seguido de esperar o [`Collapse`] e só então `show(B)`
//! encadeia "fecha A, depois revela B" sem corrida entre as animações.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;

use super::{Element, Presence, UiBinding};

/// Marca o elemento como visível imediatamente.
pub fn show<U: UiBinding + ?Sized>(ui: &mut U, element: impl Into<Element>) {
    let element = element.into();
    if ui.presence(element) != Presence::Entering {
        ui.set_presence(element, Presence::Entering);
    }
}

/// Esconde o elemento sem aguardar o fim da transição.
pub fn hide<U: UiBinding + ?Sized>(ui: &mut U, element: impl Into<Element>) {
    let element = element.into();
    if ui.presence(element) != Presence::Hidden {
        ui.set_presence(element, Presence::Hidden);
    }
}

/// Esconde o elemento e devolve a conclusão do colapso.
///
/// Se o elemento já estava escondido a conclusão é imediata; caso contrário
/// depende da notificação de fim de transição do ambiente.
pub fn collapse<U: UiBinding + ?Sized>(ui: &mut U, element: impl Into<Element>) -> Collapse {
    let element = element.into();
    match ui.presence(element) {
        Presence::Hidden => Collapse::Done,
        Presence::Visible | Presence::Entering => {
            ui.set_presence(element, Presence::Hidden);
            Collapse::Pending(ui.transition_end(element))
        }
    }
}

/// Conclusão pendente de um colapso. Consumida uma única vez.
#[derive(Debug)]
pub enum Collapse {
    Done,
    Pending(oneshot::Receiver<()>),
}

/// Como o colapso terminou.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Immediate,
    Signalled,
    TimedOut,
}

impl Collapse {
    pub fn is_done(&self) -> bool {
        matches!(self, Collapse::Done)
    }

    /// Aguarda o sinal do ambiente, limitado por `fallback`.
    ///
    /// Um ambiente que nunca dispara o fim da transição não pode travar a
    /// máquina de estados, por isso o prazo sempre encerra a espera.
    pub async fn settle(self, fallback: Duration) -> Settled {
        match self {
            Collapse::Done => Settled::Immediate,
            Collapse::Pending(signal) => {
                tokio::select! {
                    _ = signal => Settled::Signalled,
                    _ = sleep(fallback) => Settled::TimedOut,
                }
            }
        }
    }
}
