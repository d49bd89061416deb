//! # Erros da conversão XML ⇄ IOB2
//!
//! Todos os estágios do conversor retornam [`IobError`]. Os erros do parser são
//! sempre **escopados a um documento**: o driver de lote ([`crate::batch`]) decide,
//! a partir de uma lista explícita, quais deles apenas descartam o documento.

use thiserror::Error;

/// Erro único do crate.
#[derive(Debug, Error)]
pub enum IobError {
    /// Sintaxe de tag quebrada (tag não fechada, fechamento trocado, atributo inválido...).
    ///
    /// Com `recover = true` o parser tolera os defeitos estruturais; os léxicos continuam aqui.
    #[error("anotação malformada na posição {position}: {message}\n{document}")]
    MalformedAnnotation {
        document: String,
        /// Offset em bytes no texto anotado
        position: usize,
        message: String,
    },

    /// Duas tags registradas abertas ao mesmo tempo. Nunca é recuperado.
    #[error("tags aninhadas: <{inner}> aberta dentro de <{outer}>\n{document}")]
    NestedAnnotation {
        document: String,
        outer: String,
        inner: String,
    },

    #[error("número de tokens ({tokens}) difere do número de rótulos ({labels})")]
    LengthMismatch { tokens: usize, labels: usize },

    #[error("rótulo IOB2 inválido: {0:?}")]
    InvalidLabel(String),

    /// O tokenizador devolveu mais caracteres do que o texto possui.
    #[error("tokenizador consumiu {consumed} caracteres, mas o texto tem {available}")]
    TokenizationMismatch { consumed: usize, available: usize },

    #[error("linha IOB2 malformada ({line}): {content:?}")]
    MalformedIobLine { line: usize, content: String },

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl IobError {
    /// Nome curto da variante (usado em logs e nas respostas HTTP)
    pub fn kind(&self) -> &'static str {
        match self {
            IobError::MalformedAnnotation { .. } => "malformed_annotation",
            IobError::NestedAnnotation { .. } => "nested_annotation",
            IobError::LengthMismatch { .. } => "length_mismatch",
            IobError::InvalidLabel(_) => "invalid_label",
            IobError::TokenizationMismatch { .. } => "tokenization_mismatch",
            IobError::MalformedIobLine { .. } => "malformed_iob_line",
            IobError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, IobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_document() {
        let err = IobError::NestedAnnotation {
            document: "<C><M>x</M></C>".into(),
            outer: "C".into(),
            inner: "M".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("<M>"));
        assert!(msg.contains("<C><M>x</M></C>"));
        assert_eq!(err.kind(), "nested_annotation");
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "x");
        let err: IobError = io.into();
        assert!(matches!(err, IobError::Io(_)));
    }
}
