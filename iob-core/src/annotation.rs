//! # Parser de Anotações XML Inline
//!
//! Converte um fragmento anotado como
//!
//! ```text
//! <C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．
//! ```
//!
//! em texto limpo + lista ordenada de [`Span`]s em offsets de caractere:
//!
//! ```text
//! "脳梗塞を認め，医薬品の投与を行った．"
//! [(0, 3, C, 脳梗塞), (7, 10, M, 医薬品)]
//! ```
//!
//! ## Máquina de estados
//!
//! O parser consome os eventos de `quick_xml` (início, fim, texto) mantendo:
//! 1. o texto limpo acumulado e seu comprimento em caracteres;
//! 2. a pilha de elementos abertos (registrados ou transparentes);
//! 3. **no máximo um** span registrado aberto;
//! 4. os spans já emitidos.
//!
//! Tags fora de `allowed_types` são **transparentes**: o texto delas entra no texto
//! limpo, mas nenhum span é emitido e elas não participam da checagem de aninhamento.
//!
//! ## Modo de recuperação
//!
//! Com `recover = true`, defeitos estruturais comuns em anotação manual são tolerados:
//! tag não fechada vai até o fim do texto, fechamento fora de ordem fecha tudo o que
//! foi aberto depois, fechamento órfão é ignorado e atributos quebrados são pulados.

use std::collections::BTreeSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IobError, Result};
use crate::span::Span;

/// Configuração do parser.
///
/// O padrão registra todas as tags, ignora atributos e é estrito.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Tags que geram spans. `None` registra todas.
    pub allowed_types: Option<BTreeSet<String>>,
    /// Atributos cujos valores são anexados ao tipo (ex: `value="N"` → `CN`).
    pub allowed_attrs: BTreeSet<String>,
    /// Tolera tags não fechadas e fechamentos fora de ordem.
    pub recover: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn recovering(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    fn records(&self, name: &str) -> bool {
        self.allowed_types
            .as_ref()
            .map_or(true, |types| types.contains(name))
    }
}

/// Resultado do parser: texto sem tags + spans em ordem de abertura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnnotation {
    pub plain_text: String,
    pub spans: Vec<Span>,
}

/// Span registrado ainda aberto.
struct PendingSpan {
    /// Posição do elemento na pilha de abertos
    stack_index: usize,
    start: usize,
    entity_type: String,
    attrs: String,
    text: String,
}

impl PendingSpan {
    fn close(self, end: usize) -> Span {
        Span::new(self.start, end, self.entity_type, self.text).with_attrs(self.attrs)
    }
}

struct AnnotationState<'a> {
    document: &'a str,
    options: &'a ParseOptions,
    plain_text: String,
    /// Comprimento de `plain_text` em caracteres
    offset: usize,
    stack: Vec<String>,
    open: Option<PendingSpan>,
    spans: Vec<Span>,
}

impl<'a> AnnotationState<'a> {
    fn new(document: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            document,
            options,
            plain_text: String::with_capacity(document.len()),
            offset: 0,
            stack: Vec::new(),
            open: None,
            spans: Vec::new(),
        }
    }

    fn malformed(&self, position: usize, message: impl Into<String>) -> IobError {
        IobError::MalformedAnnotation {
            document: self.document.to_string(),
            position,
            message: message.into(),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.plain_text.push_str(text);
        self.offset += text.chars().count();
        if let Some(open) = self.open.as_mut() {
            open.text.push_str(text);
        }
    }

    /// Abre um span registrado, falhando se já houver outro aberto.
    fn begin_span(&self, name: &str, elem: &BytesStart, position: usize) -> Result<PendingSpan> {
        if let Some(outer) = &self.open {
            return Err(IobError::NestedAnnotation {
                document: self.document.to_string(),
                outer: outer.entity_type.clone(),
                inner: name.to_string(),
            });
        }
        Ok(PendingSpan {
            stack_index: self.stack.len(),
            start: self.offset,
            entity_type: name.to_string(),
            attrs: self.attribute_suffix(elem, position)?,
            text: String::new(),
        })
    }

    fn start_element(&mut self, elem: &BytesStart, position: usize) -> Result<()> {
        let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
        if self.options.records(&name) {
            let pending = self.begin_span(&name, elem, position)?;
            self.open = Some(pending);
        } else {
            self.attribute_suffix(elem, position)?;
        }
        self.stack.push(name);
        Ok(())
    }

    /// `<C/>`: span de comprimento zero.
    fn empty_element(&mut self, elem: &BytesStart, position: usize) -> Result<()> {
        let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
        if self.options.records(&name) {
            let pending = self.begin_span(&name, elem, position)?;
            self.spans.push(pending.close(self.offset));
        } else {
            self.attribute_suffix(elem, position)?;
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str, position: usize) -> Result<()> {
        let Some(index) = self.stack.iter().rposition(|open| open == name) else {
            if self.options.recover {
                debug!(tag = name, position, "ignorando fechamento sem abertura");
                return Ok(());
            }
            return Err(self.malformed(position, format!("</{}> sem tag de abertura", name)));
        };

        if index + 1 != self.stack.len() {
            if !self.options.recover {
                let expected = self.stack.last().cloned().unwrap_or_default();
                return Err(self.malformed(
                    position,
                    format!("esperado </{}>, encontrado </{}>", expected, name),
                ));
            }
            debug!(tag = name, position, "fechando implicitamente {} tag(s)", self.stack.len() - index - 1);
        }

        self.stack.truncate(index);
        self.close_open_from(index);
        Ok(())
    }

    /// Fecha o span aberto se o elemento dele estiver em `index` ou acima na pilha.
    fn close_open_from(&mut self, index: usize) {
        match self.open.take() {
            Some(pending) if pending.stack_index >= index => {
                self.spans.push(pending.close(self.offset));
            }
            other => self.open = other,
        }
    }

    /// Valida os atributos e concatena os valores dos atributos habilitados.
    fn attribute_suffix(&self, elem: &BytesStart, position: usize) -> Result<String> {
        let recover = self.options.recover;
        let mut suffix = String::new();
        let mut attributes = elem.attributes();
        attributes.with_checks(!recover);

        for attr in attributes {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) if recover => {
                    debug!(position, error = %err, "pulando atributo malformado");
                    continue;
                }
                Err(err) => return Err(self.malformed(position, err.to_string())),
            };
            let key = String::from_utf8_lossy(attr.key.as_ref());
            if !self.options.allowed_attrs.contains(key.as_ref()) {
                continue;
            }
            match attr.unescape_value() {
                Ok(value) => suffix.push_str(&value),
                Err(_) if recover => suffix.push_str(&String::from_utf8_lossy(&attr.value)),
                Err(err) => return Err(self.malformed(position, err.to_string())),
            }
        }
        Ok(suffix)
    }

    fn finish(mut self, position: usize) -> Result<ParsedAnnotation> {
        if let Some(unclosed) = self.stack.first() {
            if !self.options.recover {
                let message = format!("tag <{}> não fechada", unclosed);
                return Err(self.malformed(position, message));
            }
            debug!(tag = %unclosed, "tag não fechada estendida até o fim do texto");
            self.stack.clear();
            self.close_open_from(0);
        }
        Ok(ParsedAnnotation {
            plain_text: self.plain_text,
            spans: self.spans,
        })
    }
}

/// Parseia um fragmento anotado em texto limpo + spans.
///
/// # Erros
/// - [`IobError::NestedAnnotation`] se duas tags registradas ficarem abertas ao mesmo tempo
///   (em qualquer modo).
/// - [`IobError::MalformedAnnotation`] para sintaxe inválida; com `recover = true` apenas
///   os erros léxicos que o leitor XML não consegue pular chegam aqui.
pub fn parse_annotation(text: &str, options: &ParseOptions) -> Result<ParsedAnnotation> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(false);
    reader.expand_empty_elements(false);
    reader.check_end_names(!options.recover);

    let mut state = AnnotationState::new(text, options);

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => state.start_element(&e, position)?,
            Ok(Event::Empty(e)) => state.empty_element(&e, position)?,
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                state.end_element(&name, position)?;
            }
            Ok(Event::Text(e)) => {
                let decoded = match e.unescape() {
                    Ok(decoded) => decoded.into_owned(),
                    Err(err) if options.recover => {
                        debug!(position, error = %err, "mantendo referência de entidade literal");
                        String::from_utf8_lossy(&*e).into_owned()
                    }
                    Err(err) => return Err(state.malformed(position, err.to_string())),
                };
                state.push_text(&decoded);
            }
            Ok(Event::CData(e)) => state.push_text(&String::from_utf8_lossy(&*e)),
            Ok(Event::Eof) => break,
            // Comentários, declarações e instruções de processamento não carregam texto
            Ok(_) => {}
            Err(err) => {
                return Err(state.malformed(reader.buffer_position(), err.to_string()));
            }
        }
    }

    state.finish(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENT: &str = "<C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．";
    const SENT_ATTR: &str = "<C value=\"N\">関節液貯留</C>は認めない．";

    fn tuples(spans: &[Span]) -> Vec<(usize, usize, String, &str)> {
        spans
            .iter()
            .map(|s| (s.start, s.end, s.label_type(), s.text.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_all_types() {
        let parsed = parse_annotation(SENT, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.plain_text, "脳梗塞を認め，医薬品の投与を行った．");
        assert_eq!(
            tuples(&parsed.spans),
            vec![
                (0, 3, "C".to_string(), "脳梗塞"),
                (7, 10, "M".to_string(), "医薬品"),
            ]
        );
    }

    #[test]
    fn test_parse_restricted_types() {
        let options = ParseOptions::new().with_types(["C"]);
        let parsed = parse_annotation(SENT, &options).unwrap();
        assert_eq!(parsed.plain_text, "脳梗塞を認め，医薬品の投与を行った．");
        assert_eq!(tuples(&parsed.spans), vec![(0, 3, "C".to_string(), "脳梗塞")]);
    }

    #[test]
    fn test_parse_attrs_ignored_by_default() {
        let parsed = parse_annotation(SENT_ATTR, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.plain_text, "関節液貯留は認めない．");
        assert_eq!(tuples(&parsed.spans), vec![(0, 5, "C".to_string(), "関節液貯留")]);
    }

    #[test]
    fn test_parse_attr_compound_type() {
        let options = ParseOptions::new().with_attrs(["value"]);
        let parsed = parse_annotation(SENT_ATTR, &options).unwrap();
        assert_eq!(parsed.spans[0].entity_type, "C");
        assert_eq!(parsed.spans[0].attrs, "N");
        assert_eq!(tuples(&parsed.spans), vec![(0, 5, "CN".to_string(), "関節液貯留")]);
    }

    #[test]
    fn test_attrs_concatenate_in_declaration_order() {
        let options = ParseOptions::new().with_attrs(["b", "a"]);
        let parsed = parse_annotation("<D a=\"1\" x=\"9\" b=\"2\">t</D>", &options).unwrap();
        assert_eq!(parsed.spans[0].label_type(), "D12");
    }

    #[test]
    fn test_nested_is_fatal() {
        let err = parse_annotation("<C>a<M>b</M></C>", &ParseOptions::default()).unwrap_err();
        match err {
            IobError::NestedAnnotation { outer, inner, document } => {
                assert_eq!(outer, "C");
                assert_eq!(inner, "M");
                assert_eq!(document, "<C>a<M>b</M></C>");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_nested_is_fatal_even_when_recovering() {
        let options = ParseOptions::new().recovering(true);
        let err = parse_annotation("<C>a<C>b</C></C>", &options).unwrap_err();
        assert!(matches!(err, IobError::NestedAnnotation { .. }));
    }

    #[test]
    fn test_transparent_tags_bypass_nesting() {
        let options = ParseOptions::new().with_types(["C"]);
        let parsed = parse_annotation("<X>pre<C>a<Y>b</Y>c</C></X>post", &options).unwrap();
        assert_eq!(parsed.plain_text, "preabcpost");
        assert_eq!(tuples(&parsed.spans), vec![(3, 6, "C".to_string(), "abc")]);
    }

    #[test]
    fn test_unclosed_tag_strict() {
        let err = parse_annotation("<C>脳梗塞を認め", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, IobError::MalformedAnnotation { .. }));
    }

    #[test]
    fn test_unclosed_tag_recovered_to_end() {
        let options = ParseOptions::new().recovering(true);
        let parsed = parse_annotation("前<C>脳梗塞を認め", &options).unwrap();
        assert_eq!(parsed.plain_text, "前脳梗塞を認め");
        assert_eq!(tuples(&parsed.spans), vec![(1, 7, "C".to_string(), "脳梗塞を認め")]);
    }

    #[test]
    fn test_mismatched_end_strict() {
        let err = parse_annotation("<C>a</M>", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, IobError::MalformedAnnotation { .. }));
    }

    #[test]
    fn test_stray_end_recovered() {
        let options = ParseOptions::new().recovering(true);
        let parsed = parse_annotation("a</M><C>b</C>", &options).unwrap();
        assert_eq!(parsed.plain_text, "ab");
        assert_eq!(tuples(&parsed.spans), vec![(1, 2, "C".to_string(), "b")]);
    }

    #[test]
    fn test_out_of_order_end_recovered() {
        let options = ParseOptions::new().with_types(["C"]).recovering(true);
        let parsed = parse_annotation("<X><C>ab</X>cd", &options).unwrap();
        assert_eq!(parsed.plain_text, "abcd");
        assert_eq!(tuples(&parsed.spans), vec![(0, 2, "C".to_string(), "ab")]);
    }

    #[test]
    fn test_broken_attribute() {
        let text = "<C value=N>x</C>y";
        let strict = ParseOptions::new().with_attrs(["value"]);
        assert!(matches!(
            parse_annotation(text, &strict),
            Err(IobError::MalformedAnnotation { .. })
        ));

        let lenient = strict.recovering(true);
        let parsed = parse_annotation(text, &lenient).unwrap();
        assert_eq!(tuples(&parsed.spans), vec![(0, 1, "C".to_string(), "x")]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let parsed = parse_annotation("a &amp; <C>b&lt;c</C>", &ParseOptions::default()).unwrap();
        assert_eq!(parsed.plain_text, "a & b<c");
        assert_eq!(tuples(&parsed.spans), vec![(4, 7, "C".to_string(), "b<c")]);
    }

    #[test]
    fn test_empty_element_is_zero_length() {
        let parsed = parse_annotation("ab<C/>cd", &ParseOptions::default()).unwrap();
        assert_eq!(parsed.plain_text, "abcd");
        assert_eq!(parsed.spans, vec![Span::new(2, 2, "C", "")]);
    }

    #[test]
    fn test_plain_text_without_tags() {
        let parsed = parse_annotation("タグなし", &ParseOptions::default()).unwrap();
        assert_eq!(parsed.plain_text, "タグなし");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"allowed_types":["C"]}"#).unwrap();
        assert_eq!(options, ParseOptions::new().with_types(["C"]));
        assert!(!options.recover);
    }
}
