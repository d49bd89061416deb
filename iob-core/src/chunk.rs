//! # Reconstrução de Chunks
//!
//! Inverso do alinhamento: dada uma sequência de tokens e seus rótulos IOB2,
//! reconstrói os spans de entidade.
//!
//! A sequência é conceitualmente cercada por `O` nas duas pontas, e cada posição é
//! testada com [`is_chunk_start`] (anterior, atual) e [`is_chunk_end`] (atual, próximo).
//! Uma troca direta de tipo (`B-C` → `B-M`) fecha um chunk e abre outro no mesmo
//! ponto, sem exigir um `O` entre as menções.
//!
//! # Exemplo
//! `["O", "B-C", "I-C", "O"]` sobre `["x", "y", "z", "w"]` → `[Span(1..3, C, "yz")]`

use crate::error::{IobError, Result};
use crate::label::{is_chunk_end, is_chunk_start, Label, TaggedToken};
use crate::span::Span;

/// Sentinela das pontas
static OUTSIDE: Label = Label::Outside;

/// Reconstrói os spans em **índices de token** (`end` exclusivo).
pub fn reconstruct<S: AsRef<str>>(tokens: &[S], labels: &[Label]) -> Result<Vec<Span>> {
    if tokens.len() != labels.len() {
        return Err(IobError::LengthMismatch {
            tokens: tokens.len(),
            labels: labels.len(),
        });
    }

    let mut spans = Vec::new();
    let mut chunk_start: Option<usize> = None;
    let mut text = String::new();

    for (i, (token, label)) in tokens.iter().zip(labels).enumerate() {
        let prev = if i == 0 { &OUTSIDE } else { &labels[i - 1] };
        let next = labels.get(i + 1).unwrap_or(&OUTSIDE);

        if is_chunk_start(prev, label) {
            chunk_start = Some(i);
            text.clear();
        }

        if chunk_start.is_some() {
            text.push_str(token.as_ref());
        }

        if is_chunk_end(label, next) {
            if let (Some(start), Some(ty)) = (chunk_start.take(), label.entity_type()) {
                spans.push(Span::new(start, i + 1, ty, std::mem::take(&mut text)));
            }
        }
    }

    Ok(spans)
}

/// Mesma reconstrução a partir de tokens já rotulados.
pub fn reconstruct_tagged(tagged: &[TaggedToken]) -> Vec<Span> {
    let tokens: Vec<&str> = tagged.iter().map(|t| t.token.as_str()).collect();
    let labels: Vec<Label> = tagged.iter().map(|t| t.label.clone()).collect();
    // comprimentos iguais por construção
    reconstruct(&tokens, &labels).unwrap_or_default()
}

/// Converte spans em índices de token para offsets de caractere sobre `tokens.concat()`.
///
/// Com o tokenizador de caracteres é a identidade; com tokens maiores é o que permite
/// re-serializar o texto sem supor um caractere por token.
pub fn to_char_spans<S: AsRef<str>>(tokens: &[S], spans: &[Span]) -> Vec<Span> {
    let mut offsets = Vec::with_capacity(tokens.len() + 1);
    let mut acc = 0;
    offsets.push(acc);
    for token in tokens {
        acc += token.as_ref().chars().count();
        offsets.push(acc);
    }

    spans
        .iter()
        .map(|span| {
            let char_offset = |i: usize| offsets.get(i).copied().unwrap_or(acc);
            Span {
                start: char_offset(span.start),
                end: char_offset(span.end),
                ..span.clone()
            }
        })
        .collect()
}
