//! Testes de propriedade da ida e volta XML ⇄ IOB2
//!
//! Com o tokenizador de caracteres o alinhamento não perde informação, então:
//!
//! 1. **Parser ∘ Serializador**: `parse(serialize(texto, spans)) == (texto, spans)`
//! 2. **Reconstrução**: `reconstruct(align(...)) == spans`
//! 3. **Idempotência**: decodificar a codificação de um XML devolve o mesmo XML

use iob_core::chunk::reconstruct;
use iob_core::serialize::serialize;
use iob_core::{
    convert_iob_to_xml, convert_xml_to_iob, parse_annotation, unzip_tagged, ParseOptions, Span,
    TokenizerMode,
};
use proptest::prelude::*;

const TYPES: &[&str] = &["C", "M", "LOC"];

/// Texto limpo e spans não sobrepostos, sempre separados por texto fora de entidade.
fn annotated_text() -> impl Strategy<Value = (String, Vec<Span>)> {
    let segment = ("[a-zあ-ん]{1,4}", 0..TYPES.len(), "[A-Zア-ン]{1,4}");
    (prop::collection::vec(segment, 0..6), "[a-zあ-ん]{0,4}").prop_map(|(segments, tail)| {
        let mut text = String::new();
        let mut spans = Vec::new();
        let mut offset = 0;
        for (plain, ty, entity) in segments {
            text.push_str(&plain);
            offset += plain.chars().count();
            let len = entity.chars().count();
            spans.push(Span::new(offset, offset + len, TYPES[ty], entity.clone()));
            text.push_str(&entity);
            offset += len;
        }
        text.push_str(&tail);
        (text, spans)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: o parser lê de volta exatamente o que o serializador escreveu
    #[test]
    fn prop_parse_inverts_serialize((text, spans) in annotated_text()) {
        let xml = serialize(&text, &spans);
        let parsed = parse_annotation(&xml, &ParseOptions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.plain_text, text);
        prop_assert_eq!(parsed.spans, spans);
    }

    /// Property: com tokens de um caractere, índices de token == offsets de caractere
    #[test]
    fn prop_reconstruct_inverts_align((text, spans) in annotated_text()) {
        let xml = serialize(&text, &spans);
        let tagged = convert_xml_to_iob(&xml, &ParseOptions::default(), &TokenizerMode::CharLevel)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tagged.len(), text.chars().count());

        let (tokens, labels) = unzip_tagged(tagged);
        let rebuilt = reconstruct(&tokens, &labels)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(rebuilt, spans);
    }

    /// Property: decodificar(codificar(xml)) é um ponto fixo
    #[test]
    fn prop_decode_encode_is_idempotent((text, spans) in annotated_text()) {
        let xml = serialize(&text, &spans);
        let mut current = xml.clone();
        for _ in 0..2 {
            let tagged = convert_xml_to_iob(&current, &ParseOptions::default(), &TokenizerMode::CharLevel)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let (tokens, labels) = unzip_tagged(tagged);
            current = convert_iob_to_xml(&tokens, &labels)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&current, &xml);
        }
    }
}

#[test]
fn test_reference_examples() {
    let xml = "<C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．";
    let only_c = ParseOptions::new().with_types(["C"]);
    let parsed = parse_annotation(xml, &only_c).unwrap();
    assert_eq!(parsed.spans, vec![Span::new(0, 3, "C", "脳梗塞")]);

    let tagged = convert_xml_to_iob(
        "<C value=\"N\">関節液貯留</C>は認めない．",
        &ParseOptions::new().with_attrs(["value"]),
        &TokenizerMode::CharLevel,
    )
    .unwrap();
    assert_eq!(tagged[0].label.label(), "B-CN");
    assert_eq!(tagged[4].label.label(), "I-CN");
    assert_eq!(tagged[5].label.label(), "O");
}
