//! Controlador de visibilidade dos grupos de campos.
//!
//! A visibilidade é uma função pura do [`FormState`]: qualquer alteração em
//! um campo refaz o cálculo completo, sem contadores ou estado escondido.
//! Chamar [`VisibilitySet::compute`] duas vezes com os mesmos valores
//! produz exatamente o mesmo conjunto.

use std::fmt;

use crate::form::{FormState, PaymentMethod};

/// Um grupo de campos do formulário (label + input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Method,
    Name,
    Card,
    Amount,
    Submit,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Method,
        FieldGroup::Name,
        FieldGroup::Card,
        FieldGroup::Amount,
        FieldGroup::Submit,
    ];
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldGroup::Method => write!(f, "forma"),
            FieldGroup::Name => write!(f, "nome"),
            FieldGroup::Card => write!(f, "cartao"),
            FieldGroup::Amount => write!(f, "valor"),
            FieldGroup::Submit => write!(f, "submit"),
        }
    }
}

/// Quais grupos de campos estão visíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySet {
    pub method: bool,
    pub name: bool,
    pub card: bool,
    pub amount: bool,
    pub submit: bool,
}

impl VisibilitySet {
    /// Estado inicial da página e após cada reset: só a forma de pagamento.
    pub fn initial() -> Self {
        Self {
            method: true,
            name: false,
            card: false,
            amount: false,
            submit: false,
        }
    }

    /// Recalcula a visibilidade a partir dos valores atuais.
    ///
    /// - PIX: forma → nome → cartão → valor → submit, cada etapa liberada
    ///   pela validade da anterior.
    /// - DINHEIRO: o nome nunca aparece; cartão sempre visível, depois
    ///   valor e submit pelas mesmas regras do PIX.
    /// - Sem forma escolhida: só o seletor fica visível.
    pub fn compute(form: &FormState) -> Self {
        let mut set = Self::initial();
        let card_unlocked = match form.method {
            Some(PaymentMethod::Pix) => {
                set.name = true;
                form.has_payer_name()
            }
            Some(PaymentMethod::Cash) => true,
            None => false,
        };

        set.card = card_unlocked;
        set.amount = set.card && form.has_valid_card();
        set.submit = set.amount && form.has_positive_amount();
        set
    }

    pub fn is_visible(&self, group: FieldGroup) -> bool {
        match group {
            FieldGroup::Method => self.method,
            FieldGroup::Name => self.name,
            FieldGroup::Card => self.card,
            FieldGroup::Amount => self.amount,
            FieldGroup::Submit => self.submit,
        }
    }

    /// Pares (grupo, visível) na ordem do formulário.
    pub fn iter(&self) -> impl Iterator<Item = (FieldGroup, bool)> + '_ {
        FieldGroup::ALL
            .into_iter()
            .map(move |group| (group, self.is_visible(group)))
    }
}
