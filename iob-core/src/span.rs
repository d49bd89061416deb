//! # Spans de Entidade
//!
//! Um [`Span`] é um intervalo anotado com um tipo de entidade. É o formato
//! intermediário entre os dois lados do conversor:
//!
//! - o parser de anotações produz spans em **offsets de caractere** sobre o texto limpo;
//! - o reconstrutor de chunks produz spans em **índices de token**
//!   (convertidos para caracteres por [`crate::chunk::to_char_spans`]).
//!
//! Em ambos os casos `end` é **exclusivo**: o span cobre `start..end`.
//! Offsets de caractere contam valores escalares Unicode (`char`), não bytes,
//! então `"脳梗塞"` ocupa `0..3`.

use serde::{Deserialize, Serialize};

/// Um trecho anotado do texto.
///
/// # Exemplo
/// Em `"<C value=\"N\">関節液貯留</C>は認めない．"` com o atributo `value` habilitado:
/// `Span { start: 0, end: 5, entity_type: "C", attrs: "N", text: "関節液貯留" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Offset inicial (inclusivo)
    pub start: usize,
    /// Offset final (exclusivo)
    pub end: usize,
    /// Nome da tag (ex: "C", "M")
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Valores de atributos reconhecidos, concatenados em ordem de declaração
    #[serde(default)]
    pub attrs: String,
    /// Texto exato coberto pelo span
    pub text: String,
}

impl Span {
    pub fn new(start: usize, end: usize, entity_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            attrs: String::new(),
            text: text.into(),
        }
    }

    pub fn with_attrs(mut self, attrs: impl Into<String>) -> Self {
        self.attrs = attrs.into();
        self
    }

    /// Tipo composto usado nos rótulos IOB2: tag + atributos (ex: "C" + "N" → "CN").
    pub fn label_type(&self) -> String {
        format!("{}{}", self.entity_type, self.attrs)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
