//! # Pipelines de Conversão
//!
//! Liga os estágios nos dois sentidos:
//!
//! - **Codificação** (XML → IOB2): [`parse_annotation`] → [`align`]
//! - **Decodificação** (IOB2 → XML): [`reconstruct`] → [`to_char_spans`] → [`serialize`]
//!
//! As funções livres recebem qualquer [`Tokenizer`]; o [`IobConverter`] guarda uma
//! [`EncodeConfig`] explícita (tags, atributos, recuperação, tokenizador, política de lote)
//! e é o ponto de entrada usado pelo servidor web.

use serde::{Deserialize, Serialize};

use crate::align::align;
use crate::annotation::{parse_annotation, ParseOptions};
use crate::batch::{encode_batch, BatchOutput, BatchPolicy};
use crate::chunk::{reconstruct, to_char_spans};
use crate::error::Result;
use crate::label::{Label, TaggedToken};
use crate::serialize::serialize;
use crate::span::Span;
use crate::tokenizer::{Tokenizer, TokenizerMode};

/// Configuração completa de uma conversão.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub parse: ParseOptions,
    pub tokenizer: TokenizerMode,
    pub policy: BatchPolicy,
}

/// Saída da codificação de um documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoded {
    pub plain_text: String,
    /// Spans em offsets de caractere sobre `plain_text`
    pub spans: Vec<Span>,
    pub tagged: Vec<TaggedToken>,
}

/// Saída da decodificação de uma sequência rotulada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub xml: String,
    /// Spans em offsets de caractere sobre a concatenação dos tokens
    pub spans: Vec<Span>,
}

/// XML inline → sequência `(token, rótulo)`, sem tokens de espaço.
pub fn convert_xml_to_iob<T>(text: &str, options: &ParseOptions, tokenizer: &T) -> Result<Vec<TaggedToken>>
where
    T: Tokenizer + ?Sized,
{
    let parsed = parse_annotation(text, options)?;
    align(&parsed.plain_text, &parsed.spans, tokenizer)
}

/// Tokens + rótulos → spans e XML inline sobre `tokens.concat()`.
pub fn decode_iob<S: AsRef<str>>(tokens: &[S], labels: &[Label]) -> Result<Decoded> {
    let token_spans = reconstruct(tokens, labels)?;
    let spans = to_char_spans(tokens, &token_spans);
    let text: String = tokens.iter().map(|t| t.as_ref()).collect();
    Ok(Decoded {
        xml: serialize(&text, &spans),
        spans,
    })
}

/// Tokens + rótulos → XML inline.
pub fn convert_iob_to_xml<S: AsRef<str>>(tokens: &[S], labels: &[Label]) -> Result<String> {
    decode_iob(tokens, labels).map(|decoded| decoded.xml)
}

/// O conversor principal.
///
/// # Exemplo
/// ```rust
/// use iob_core::{EncodeConfig, IobConverter, ParseOptions};
///
/// let converter = IobConverter::with_config(EncodeConfig {
///     parse: ParseOptions::new().with_types(["C"]),
///     ..Default::default()
/// });
/// let encoded = converter.encode("<C>脳梗塞</C>を<M>認め</M>").unwrap();
/// assert_eq!(encoded.tagged[0].label.label(), "B-C");
/// assert_eq!(encoded.tagged[3].label.label(), "O");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IobConverter {
    pub config: EncodeConfig,
}

impl IobConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Codifica um documento XML, mantendo também o texto limpo e os spans.
    pub fn encode(&self, text: &str) -> Result<Encoded> {
        let parsed = parse_annotation(text, &self.config.parse)?;
        let tagged = align(&parsed.plain_text, &parsed.spans, &self.config.tokenizer)?;
        Ok(Encoded {
            plain_text: parsed.plain_text,
            spans: parsed.spans,
            tagged,
        })
    }

    pub fn decode<S: AsRef<str>>(&self, tokens: &[S], labels: &[Label]) -> Result<Decoded> {
        decode_iob(tokens, labels)
    }

    pub fn encode_batch<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<BatchOutput> {
        encode_batch(
            documents,
            &self.config.parse,
            self.config.policy,
            &self.config.tokenizer,
        )
    }
}
