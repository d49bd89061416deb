//! # Alinhamento Span → Rótulo
//!
//! Projeta spans em offsets de caractere sobre a sequência de tokens produzida pelo
//! tokenizador e atribui um rótulo IOB2 a cada token.
//!
//! ## Algoritmo
//!
//! Percorre os tokens mantendo um cursor de caractere `j` e o índice `idx` do próximo span:
//! 1. Se o último caractere do token (`k = j + len - 1`) vem antes de `spans[idx].start` → `O`.
//! 2. Se é o primeiro token que toca o span → `B-TIPO`.
//! 3. Caso contrário → `I-TIPO`.
//!
//! Depois de cada token, `idx` avança sobre todos os spans que terminam até o cursor.
//!
//! O alinhamento é **com perdas** quando uma fronteira de span cai no meio de um token:
//! o token inteiro fica com o span que o reivindica, sem sub-divisão.
//! Tokens só de espaço são descartados da saída (mas contam para o cursor).

use crate::error::{IobError, Result};
use crate::label::{Label, TaggedToken};
use crate::span::Span;
use crate::tokenizer::{is_blank, Tokenizer};

/// Tokeniza `plain_text` e rotula cada token a partir dos `spans` (ordenados por `start`).
pub fn align<T>(plain_text: &str, spans: &[Span], tokenizer: &T) -> Result<Vec<TaggedToken>>
where
    T: Tokenizer + ?Sized,
{
    let tokens = tokenizer.tokenize(plain_text);
    align_tokens(tokens, spans, plain_text.chars().count())
}

/// Rotula uma sequência de tokens já produzida.
///
/// `available` é o comprimento do texto em caracteres; um tokenizador que devolve
/// mais caracteres do que isso viola o contrato e gera [`IobError::TokenizationMismatch`].
pub fn align_tokens(tokens: Vec<String>, spans: &[Span], available: usize) -> Result<Vec<TaggedToken>> {
    // Spans vazios (ex: `<C/>`) não reivindicam nenhum caractere
    let spans: Vec<&Span> = spans.iter().filter(|s| !s.is_empty()).collect();

    let mut tagged = Vec::with_capacity(tokens.len());
    let mut idx = 0;
    let mut cursor = 0;
    let mut first_of_span = true;

    for token in tokens {
        cursor += token.chars().count();
        if cursor > available {
            return Err(IobError::TokenizationMismatch {
                consumed: cursor,
                available,
            });
        }

        if !is_blank(&token) {
            // token não vazio: cursor >= 1
            let last_char = cursor - 1;
            let label = match spans.get(idx) {
                Some(span) if last_char < span.start => Label::Outside,
                Some(span) if first_of_span => {
                    first_of_span = false;
                    Label::Begin(span.label_type())
                }
                Some(span) => Label::Inside(span.label_type()),
                None => Label::Outside,
            };
            tagged.push(TaggedToken::new(token, label));
        }

        while spans.get(idx).is_some_and(|span| span.end <= cursor) {
            idx += 1;
            first_of_span = true;
        }
    }

    Ok(tagged)
}
