//! # Serialização de Spans em XML Inline
//!
//! Inverso do parser: reinsere as tags no texto limpo.
//!
//! ```text
//! "脳梗塞を認め" + [(0, 3, C)]  →  "<C>脳梗塞</C>を認め"
//! ```
//!
//! Os caracteres `<`, `>` e `&` são escapados para que a saída volte a ser lida pelo
//! parser com o mesmo texto limpo. Texto sem esses caracteres sai inalterado.

use std::iter;

use quick_xml::escape::partial_escape;

use crate::span::Span;

/// Reinsere as tags de `spans` em `plain_text`.
///
/// Pré-condição (não revalidada): spans em offsets de caractere, ordenados por `start`
/// e sem sobreposição. O texto de cada tag é o `text` do próprio span.
pub fn serialize(plain_text: &str, spans: &[Span]) -> String {
    // Offset em bytes de cada fronteira de caractere, incluindo o fim do texto
    let bounds: Vec<usize> = plain_text
        .char_indices()
        .map(|(b, _)| b)
        .chain(iter::once(plain_text.len()))
        .collect();
    let char_count = bounds.len() - 1;
    let slice = |from: usize, to: usize| &plain_text[bounds[from]..bounds[to]];

    let mut out = String::with_capacity(plain_text.len() + spans.len() * 8);
    let mut idx = 0;

    for span in spans {
        let start = span.start.min(char_count);
        if idx < start {
            out.push_str(&partial_escape(slice(idx, start)));
        }

        let ty = span.label_type();
        out.push('<');
        out.push_str(&ty);
        out.push('>');
        out.push_str(&partial_escape(&span.text));
        out.push_str("</");
        out.push_str(&ty);
        out.push('>');

        idx = idx.max(span.end.min(char_count));
    }

    if idx < char_count {
        out.push_str(&partial_escape(slice(idx, char_count)));
    }
    out
}
