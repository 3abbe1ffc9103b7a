//! Dublê de [`UiBinding`] que grava cada alteração para as asserções.

use std::collections::HashMap;

use tokio::sync::oneshot;

use super::{Container, Element, Presence, UiBinding};
use crate::form::FormState;
use crate::visibility::{FieldGroup, VisibilitySet};

pub struct RecordingUi {
    pub form: FormState,
    pub csrf_token: String,
    pub busy: bool,
    pub submit_enabled: bool,
    pub error_message: String,
    pub error_pulse: bool,
    pub pulse_history: Vec<bool>,
    pub history: Vec<(Element, Presence)>,
    pub clear_count: usize,
    /// Quando ligado, toda transição termina no mesmo instante.
    pub auto_transitions: bool,
    presence: HashMap<Element, Presence>,
    transitions: HashMap<Element, Vec<oneshot::Sender<()>>>,
}

impl RecordingUi {
    /// Página recém-carregada: formulário e seletor visíveis, o resto escondido.
    pub fn new() -> Self {
        let mut presence = HashMap::new();
        presence.insert(Element::Container(Container::Form), Presence::Visible);
        presence.insert(Element::Group(FieldGroup::Method), Presence::Visible);
        Self {
            form: FormState::default(),
            csrf_token: "csrf-test".into(),
            busy: false,
            submit_enabled: true,
            error_message: String::new(),
            error_pulse: false,
            pulse_history: Vec::new(),
            history: Vec::new(),
            clear_count: 0,
            auto_transitions: false,
            presence,
            transitions: HashMap::new(),
        }
    }

    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            ..Self::new()
        }
    }

    pub fn auto(mut self) -> Self {
        self.auto_transitions = true;
        self
    }

    pub fn is_visible(&self, element: impl Into<Element>) -> bool {
        self.presence(element.into()).is_visible()
    }

    pub fn visible_containers(&self) -> Vec<Container> {
        [
            Container::Form,
            Container::Loading,
            Container::Success,
            Container::Error,
        ]
        .into_iter()
        .filter(|c| self.is_visible(*c))
        .collect()
    }

    /// Visibilidade atual dos grupos de campos, no formato do controlador.
    pub fn group_visibility(&self) -> VisibilitySet {
        VisibilitySet {
            method: self.is_visible(FieldGroup::Method),
            name: self.is_visible(FieldGroup::Name),
            card: self.is_visible(FieldGroup::Card),
            amount: self.is_visible(FieldGroup::Amount),
            submit: self.is_visible(FieldGroup::Submit),
        }
    }

    /// Quantas vezes o elemento passou a ficar visível.
    pub fn times_shown(&self, element: impl Into<Element>) -> usize {
        let element = element.into();
        self.history
            .iter()
            .filter(|(e, p)| *e == element && *p == Presence::Entering)
            .count()
    }

    pub fn pending_transitions(&self, element: Element) -> usize {
        self.transitions.get(&element).map_or(0, Vec::len)
    }

    /// Dispara o fim de transição pendente mais antigo do elemento.
    pub fn fire_transition(&mut self, element: Element) -> bool {
        match self.transitions.get_mut(&element) {
            Some(senders) if !senders.is_empty() => senders.remove(0).send(()).is_ok(),
            _ => false,
        }
    }

    pub fn drop_transitions(&mut self) {
        self.transitions.clear();
    }
}

impl UiBinding for RecordingUi {
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
        self.history.push((element, presence));
        self.presence.insert(element, presence);
    }

    fn transition_end(&mut self, element: Element) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if self.auto_transitions {
            let _ = tx.send(());
        } else {
            self.transitions.entry(element).or_default().push(tx);
        }
        rx
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_error_message(&mut self, message: &str) {
        self.error_message = message.to_string();
    }

    fn set_error_pulse(&mut self, active: bool) {
        self.error_pulse = active;
        self.pulse_history.push(active);
    }

    fn clear_fields(&mut self) {
        self.form = FormState::default();
        self.clear_count += 1;
    }
}
