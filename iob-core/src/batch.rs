//! # Driver de Lote
//!
//! Aplica o pipeline de codificação (parser → alinhador) a uma lista de documentos.
//! Cada documento é independente, então o lote roda em paralelo via Rayon e os
//! resultados são coletados **na ordem de entrada**.
//!
//! Um documento com erro de parser não derruba o lote: se o erro estiver no conjunto
//! recuperável da [`BatchPolicy`], o documento é descartado e reportado em
//! [`BatchOutput::skipped`]. Qualquer outro erro é propagado (o de menor índice).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotation::ParseOptions;
use crate::error::{IobError, Result};
use crate::label::{unzip_tagged, Label};
use crate::pipeline::convert_xml_to_iob;
use crate::tokenizer::Tokenizer;

/// Quais erros de documento o lote tolera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Descarta apenas documentos com sintaxe malformada; aninhamento é propagado.
    #[default]
    SkipMalformed,
    /// Descarta também documentos com tags aninhadas.
    SkipNested,
}

impl BatchPolicy {
    pub fn is_skippable(&self, err: &IobError) -> bool {
        match err {
            IobError::MalformedAnnotation { .. } => true,
            IobError::NestedAnnotation { .. } => *self == BatchPolicy::SkipNested,
            _ => false,
        }
    }
}

/// Documento descartado do lote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Posição do documento na entrada
    pub index: usize,
    pub kind: String,
    pub message: String,
}

/// Resultado do lote: colunas paralelas de tokens e rótulos, uma por documento aceito.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub tokens: Vec<Vec<String>>,
    pub labels: Vec<Vec<Label>>,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchOutput {
    /// Número de documentos codificados com sucesso
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Codifica um lote de documentos XML em colunas IOB2.
pub fn encode_batch<S, T>(
    documents: &[S],
    options: &ParseOptions,
    policy: BatchPolicy,
    tokenizer: &T,
) -> Result<BatchOutput>
where
    S: AsRef<str> + Sync,
    T: Tokenizer + ?Sized,
{
    let results: Vec<Result<_>> = documents
        .par_iter()
        .map(|doc| convert_xml_to_iob(doc.as_ref(), options, tokenizer))
        .collect();

    let mut output = BatchOutput::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(tagged) => {
                let (tokens, labels) = unzip_tagged(tagged);
                output.tokens.push(tokens);
                output.labels.push(labels);
            }
            Err(err) if policy.is_skippable(&err) => {
                warn!(index, kind = err.kind(), "documento descartado: {}", err);
                output.skipped.push(SkippedDocument {
                    index,
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        total = documents.len(),
        encoded = output.len(),
        skipped = output.skipped.len(),
        "lote codificado"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenizerMode;

    fn docs() -> Vec<&'static str> {
        vec![
            "<C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．",
            "<C>関節液貯留</C>は認めない",
            "<C>閉じていない",
            "<M>頭痛</M>あり",
        ]
    }

    #[test]
    fn test_batch_skips_malformed() {
        let output = encode_batch(
            &docs(),
            &ParseOptions::default(),
            BatchPolicy::default(),
            &TokenizerMode::CharLevel,
        )
        .unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output.labels.len(), 3);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].index, 2);
        assert_eq!(output.skipped[0].kind, "malformed_annotation");
        // ordem preservada
        assert_eq!(output.tokens[2].concat(), "頭痛あり");
        assert_eq!(output.labels[2][0], Label::Begin("M".into()));
    }

    #[test]
    fn test_batch_recovering_keeps_all() {
        let options = ParseOptions::new().recovering(true);
        let output = encode_batch(&docs(), &options, BatchPolicy::default(), &TokenizerMode::CharLevel)
            .unwrap();
        assert_eq!(output.len(), 4);
        assert!(output.skipped.is_empty());
        assert!(output.labels[2].iter().all(|l| l.entity_type() == Some("C")));
    }

    #[test]
    fn test_batch_propagates_nested_by_default() {
        let documents = ["ok", "<C><M>x</M></C>", "<C>閉じていない"];
        let err = encode_batch(
            &documents,
            &ParseOptions::default(),
            BatchPolicy::SkipMalformed,
            &TokenizerMode::CharLevel,
        )
        .unwrap_err();
        assert!(matches!(err, IobError::NestedAnnotation { .. }));
    }

    #[test]
    fn test_batch_skip_nested_policy() {
        let documents = ["ok", "<C><M>x</M></C>"];
        let output = encode_batch(
            &documents,
            &ParseOptions::default(),
            BatchPolicy::SkipNested,
            &TokenizerMode::CharLevel,
        )
        .unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.skipped[0].kind, "nested_annotation");
    }

    #[test]
    fn test_batch_empty() {
        let documents: Vec<String> = vec![];
        let output = encode_batch(
            &documents,
            &ParseOptions::default(),
            BatchPolicy::default(),
            &TokenizerMode::CharLevel,
        )
        .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_policy_is_explicit() {
        let nested = IobError::NestedAnnotation {
            document: String::new(),
            outer: "C".into(),
            inner: "M".into(),
        };
        let mismatch = IobError::LengthMismatch { tokens: 1, labels: 2 };
        assert!(!BatchPolicy::SkipMalformed.is_skippable(&nested));
        assert!(BatchPolicy::SkipNested.is_skippable(&nested));
        assert!(!BatchPolicy::SkipNested.is_skippable(&mismatch));
    }
}
