//! # Esquema de Rótulos IOB2
//!
//! Define os rótulos por token usados na saída do codificador e na entrada do
//! reconstrutor de chunks.
//!
//! ## Esquema IOB2
//!
//! - `B-TIPO`: Begin, primeiro token de uma menção
//! - `I-TIPO`: Inside, tokens seguintes da mesma menção
//! - `O`: Outside, token fora de qualquer entidade
//!
//! Diferente de um conjunto fixo de categorias, o tipo aqui é aberto: vem do nome
//! da tag XML, eventualmente concatenado com valores de atributos (ex: `C` + `N` → `CN`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IobError;

/// Rótulo IOB2 aplicado a um token.
///
/// Serializa como a própria string (`"B-C"`, `"O"`), no mesmo formato do arquivo IOB2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
    /// **Begin**: início de uma menção. Ex: **脳** (B-C) 梗塞.
    Begin(String),
    /// **Inside**: continuação da menção. Ex: 脳 **梗** (I-C) 塞.
    Inside(String),
    /// **Outside**: o token não pertence a nenhuma entidade.
    Outside,
}

impl Label {
    /// Representação textual (ex: "B-C", "I-M", "O")
    pub fn label(&self) -> String {
        match self {
            Label::Begin(ty) => format!("B-{}", ty),
            Label::Inside(ty) => format!("I-{}", ty),
            Label::Outside => "O".to_string(),
        }
    }

    /// Tipo da entidade (se for B- ou I-)
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Label::Begin(ty) | Label::Inside(ty) => Some(ty),
            Label::Outside => None,
        }
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, Label::Outside)
    }

    /// Parseia um rótulo a partir de string (ex: "B-C" → Begin("C")).
    ///
    /// O prefixo é separado no **primeiro** hífen, então tipos como `B-DATE-REL`
    /// são aceitos com tipo `DATE-REL`.
    pub fn from_label(s: &str) -> Result<Self, IobError> {
        if s == "O" {
            return Ok(Label::Outside);
        }
        match s.split_once('-') {
            Some(("B", ty)) if !ty.is_empty() => Ok(Label::Begin(ty.to_string())),
            Some(("I", ty)) if !ty.is_empty() => Ok(Label::Inside(ty.to_string())),
            _ => Err(IobError::InvalidLabel(s.to_string())),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Label {
    type Err = IobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::from_label(s)
    }
}

impl TryFrom<String> for Label {
    type Error = IobError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Label::from_label(&s)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.label()
    }
}

/// Um token com seu rótulo IOB2 (uma linha `token\trótulo` do arquivo IOB2)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub label: Label,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, label: Label) -> Self {
        Self {
            token: token.into(),
            label,
        }
    }
}

/// Separa uma sequência rotulada nas colunas (tokens, rótulos).
pub fn unzip_tagged(tagged: Vec<TaggedToken>) -> (Vec<String>, Vec<Label>) {
    tagged.into_iter().map(|t| (t.token, t.label)).unzip()
}

/// Verifica se um chunk começa em `tag` dado o rótulo anterior `prev`.
///
/// - `O` nunca inicia chunk.
/// - Qualquer entidade depois de `O` inicia.
/// - Entre duas entidades, inicia somente se o tipo muda (`B-C` → `B-M`).
///
/// Repare que o prefixo é ignorado: `B-C` → `B-C` **não** separa menções.
pub fn is_chunk_start(prev: &Label, tag: &Label) -> bool {
    match (prev.entity_type(), tag.entity_type()) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(p), Some(t)) => p != t,
    }
}

/// Verifica se um chunk termina em `tag` dado o rótulo seguinte `next`.
///
/// Espelho de [`is_chunk_start`]: termina antes de `O` ou de uma troca de tipo.
pub fn is_chunk_end(tag: &Label, next: &Label) -> bool {
    match (tag.entity_type(), next.entity_type()) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(t), Some(n)) => t != n,
    }
}
