//! # iob-core: Conversão entre XML inline e IOB2
//!
//! Este crate converte anotações de entidades nomeadas entre duas representações:
//!
//! - **XML inline**: as entidades são tags em volta do trecho anotado,
//!   ex: `<C value="N">関節液貯留</C>は認めない．`
//! - **IOB2**: um rótulo por token (`B-TIPO`, `I-TIPO`, `O`), ex: `関/B-CN 節/I-CN ... は/O`.
//!
//! ## Arquitetura do Sistema
//!
//! Dois pipelines opostos, compostos a partir de cinco estágios:
//!
//! 1.  **Parser de anotações** ([`annotation`]): XML → texto limpo + spans em offsets de caractere.
//! 2.  **Alinhador** ([`align`]): spans + tokens do tokenizador ([`tokenizer`]) → um rótulo por token.
//! 3.  **Reconstrutor de chunks** ([`chunk`]): tokens + rótulos → spans. Inverso de (2).
//! 4.  **Serializador** ([`serialize`]): texto + spans → XML. Inverso de (1).
//! 5.  **Driver de lote** ([`batch`]): codifica vários documentos em paralelo, isolando falhas.
//!
//! Codificação: `XML → [1] → [2] → IOB2`. Decodificação: `IOB2 → [3] → [4] → XML`.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use iob_core::{convert_iob_to_xml, convert_xml_to_iob, unzip_tagged, ParseOptions, TokenizerMode};
//!
//! let xml = "<C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．";
//! let tagged = convert_xml_to_iob(xml, &ParseOptions::default(), &TokenizerMode::CharLevel).unwrap();
//! assert_eq!(tagged[0].label.label(), "B-C");
//!
//! let (tokens, labels) = unzip_tagged(tagged);
//! assert_eq!(convert_iob_to_xml(&tokens, &labels).unwrap(), xml);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: fachada [`IobConverter`] e as funções de conversão.
//! - [`label`]: o esquema de rótulos IOB2 e os predicados de fronteira de chunk.
//! - [`io`]: leitura e escrita do formato de arquivo IOB2.
//! - [`corpus`]: documentos anotados de demonstração.

pub mod align;
pub mod annotation;
pub mod batch;
pub mod chunk;
pub mod corpus;
pub mod error;
pub mod io;
pub mod label;
pub mod pipeline;
pub mod serialize;
pub mod span;
pub mod tokenizer;

pub use annotation::{parse_annotation, ParseOptions, ParsedAnnotation};
pub use batch::{encode_batch, BatchOutput, BatchPolicy, SkippedDocument};
pub use error::{IobError, Result};
pub use label::{unzip_tagged, Label, TaggedToken};
pub use pipeline::{
    convert_iob_to_xml, convert_xml_to_iob, decode_iob, Decoded, EncodeConfig, Encoded, IobConverter,
};
pub use span::Span;
pub use tokenizer::{Tokenizer, TokenizerMode};
