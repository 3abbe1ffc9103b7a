//! Estado do formulário de recarga e validações de campo.
//!
//! O [`FormState`] espelha os valores atuais dos inputs. As validações
//! sempre leem os valores aparados (`trim`), enquanto o payload enviado ao
//! servidor carrega os valores crus, exatamente como digitados.

use std::fmt;

/// Forma de pagamento escolhida no seletor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Pix,
    Cash,
}

impl PaymentMethod {
    /// Valor do `<option>` correspondente no seletor.
    pub fn as_value(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cash => "DINHEIRO",
        }
    }

    /// Interpreta o valor do seletor. Qualquer valor desconhecido (inclusive
    /// o vazio "Selecione...") significa nenhuma forma escolhida.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "PIX" => Some(PaymentMethod::Pix),
            "DINHEIRO" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

/// Valores atuais dos campos do formulário.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub method: Option<PaymentMethod>,
    pub payer_name: String,
    pub card_number: String,
    pub amount: String,
}

impl FormState {
    pub fn new(
        method: Option<PaymentMethod>,
        payer_name: impl Into<String>,
        card_number: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            method,
            payer_name: payer_name.into(),
            card_number: card_number.into(),
            amount: amount.into(),
        }
    }

    pub fn has_payer_name(&self) -> bool {
        !self.payer_name.trim().is_empty()
    }

    pub fn has_valid_card(&self) -> bool {
        card_is_valid(&self.card_number)
    }

    pub fn has_positive_amount(&self) -> bool {
        amount_is_positive(&self.amount)
    }

    /// Primeira exigência não atendida, na ordem em que os campos aparecem.
    pub fn missing_requirement(&self) -> Option<&'static str> {
        match self.method {
            None => Some("Escolha uma forma de pagamento"),
            Some(PaymentMethod::Pix) if !self.has_payer_name() => Some("Informe o nome do pagador"),
            _ if !self.has_valid_card() => Some("O número do cartão deve ter de 4 a 6 dígitos"),
            _ if !self.has_positive_amount() => Some("O valor da recarga deve ser maior que zero"),
            _ => None,
        }
    }
}

/// Número do cartão: de 4 a 6 dígitos decimais, nada mais.
pub fn card_is_valid(raw: &str) -> bool {
    let card = raw.trim();
    (4..=6).contains(&card.len()) && card.bytes().all(|b| b.is_ascii_digit())
}

/// Valor não vazio cuja leitura decimal é estritamente maior que zero.
/// Entradas não numéricas simplesmente não satisfazem a condição.
pub fn amount_is_positive(raw: &str) -> bool {
    let amount = raw.trim();
    !amount.is_empty() && parse_amount(amount).is_some_and(|v| v > 0.0)
}

/// Lê um valor monetário com vírgula como separador decimal.
///
/// Só a primeira vírgula vira ponto. Em seguida é lido o maior prefixo
/// decimal válido, como o `parseFloat` do navegador: `"10,50"` → 10.5,
/// `"12abc"` → 12, `"1,5,3"` → 1.5, `"abc"` → `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let normalized = raw.replacen(',', ".", 1);
    let text = normalized.trim_start();

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let end = decimal_prefix_len(text);
    if end == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok()
}

// Comprimento em bytes do maior prefixo no formato
// [sinal] dígitos [. dígitos] [(e|E) [sinal] dígitos], com ao menos um dígito na mantissa.
fn decimal_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let frac_digits = j - frac_start;
        if mantissa_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}
