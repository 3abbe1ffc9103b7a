//! Renderização do formulário de recarga no terminal.
//!
//! Usa `indicatif` para o spinner do contêiner de carregamento e `console`
//! para as mensagens coloridas de sucesso (verde) e erro (vermelho). O
//! terminal não anima nada, então toda transição termina na hora.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::oneshot;

use super::{Container, Element, Presence, UiBinding};
use crate::form::FormState;
use crate::visibility::{FieldGroup, VisibilitySet};

pub struct TerminalUi {
    form: FormState,
    csrf_token: String,
    presence: HashMap<Element, Presence>,
    error_message: String,
    // Spinner ativo enquanto o contêiner de carregamento está visível.
    spinner: Option<ProgressBar>,
    green: Style,
    red: Style,
    dim: Style,
}

impl TerminalUi {
    pub fn new(csrf_token: impl Into<String>) -> Self {
        let mut presence = HashMap::new();
        presence.insert(Element::Container(Container::Form), Presence::Visible);
        presence.insert(Element::Group(FieldGroup::Method), Presence::Visible);
        Self {
            form: FormState::default(),
            csrf_token: csrf_token.into(),
            presence,
            error_message: String::new(),
            spinner: None,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Acesso de escrita aos inputs, como se o usuário digitasse.
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Imprime quais grupos de campos estão liberados.
    pub fn print_visibility(&self, set: &VisibilitySet) {
        for (group, visible) in set.iter() {
            if visible {
                println!("  {} {group}", self.green.apply_to("●"));
            } else {
                println!("  {} {group}", self.dim.apply_to("○"));
            }
        }
    }

    fn start_spinner(&mut self) {
        if self.spinner.is_some() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Processando recarga...");
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn render_container(&mut self, container: Container, visible: bool) {
        match (container, visible) {
            (Container::Loading, true) => self.start_spinner(),
            (Container::Loading, false) => self.stop_spinner(),
            (Container::Success, true) => {
                println!("  {} Recarga concluída com sucesso!", self.green.apply_to("✓"));
            }
            (Container::Error, true) => {
                println!("  {} {}", self.red.apply_to("✗"), self.error_message);
            }
            _ => {}
        }
    }
}

// Sem flush o sino só sairia junto com a próxima quebra de linha.
fn ring_bell(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}

impl UiBinding for TerminalUi {
    fn read_form(&self) -> FormState {
        self.form.clone()
    }

    fn csrf_token(&self) -> String {
        self.csrf_token.clone()
    }

    fn presence(&self, element: Element) -> Presence {
        self.presence.get(&element).copied().unwrap_or_default()
    }

    fn set_presence(&mut self, element: Element, presence: Presence) {
        let was_visible = self.presence(element).is_visible();
        self.presence.insert(element, presence);
        if was_visible == presence.is_visible() {
            return;
        }

        tracing::debug!(%element, visible = presence.is_visible(), "visibilidade alterada");
        if let Element::Container(container) = element {
            self.render_container(container, presence.is_visible());
        }
    }

    fn transition_end(&mut self, _element: Element) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        rx
    }

    fn set_busy(&mut self, busy: bool) {
        tracing::debug!(busy, "aria-busy");
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        tracing::debug!(enabled, "ação de envio");
    }

    fn set_error_message(&mut self, message: &str) {
        self.error_message = message.to_string();
    }

    fn set_error_pulse(&mut self, active: bool) {
        if active {
            if let Err(err) = ring_bell(&mut io::stdout()) {
                tracing::debug!(error = %err, "sino não emitido");
            }
        }
    }

    fn clear_fields(&mut self) {
        self.form = FormState::default();
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
