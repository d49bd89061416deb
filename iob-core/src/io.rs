//! # Arquivos IOB2
//!
//! Formato texto UTF-8, um documento por bloco, blocos separados por linha em branco:
//!
//! ```text
//! 脳	B-C
//! 梗	I-C
//! 塞	I-C
//! を	O
//!
//! 頭	B-M
//! ```
//!
//! Cada linha é `token<TAB>rótulo`. A leitura devolve pares por documento
//! ([`IobLayout::Pairs`]) ou colunas paralelas ([`IobLayout::Columns`]).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IobError, Result};
use crate::label::{unzip_tagged, Label, TaggedToken};

/// Formato de saída da leitura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IobLayout {
    /// `[(token, rótulo)]` por documento
    #[default]
    Pairs,
    /// `(tokens, rótulos)` por documento
    Columns,
}

/// Corpus IOB2 carregado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IobCorpus {
    Pairs(Vec<Vec<TaggedToken>>),
    Columns {
        tokens: Vec<Vec<String>>,
        labels: Vec<Vec<Label>>,
    },
}

impl IobCorpus {
    fn from_documents(documents: Vec<Vec<TaggedToken>>, layout: IobLayout) -> Self {
        match layout {
            IobLayout::Pairs => IobCorpus::Pairs(documents),
            IobLayout::Columns => {
                let (tokens, labels) = documents.into_iter().map(unzip_tagged).unzip();
                IobCorpus::Columns { tokens, labels }
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IobCorpus::Pairs(docs) => docs.len(),
            IobCorpus::Columns { tokens, .. } => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parseia o conteúdo de um arquivo IOB2.
///
/// Linhas em branco (uma ou mais) separam documentos; `\r\n` é aceito.
pub fn parse_iob(text: &str) -> Result<Vec<Vec<TaggedToken>>> {
    let mut documents = Vec::new();
    let mut current = Vec::new();

    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                documents.push(std::mem::take(&mut current));
            }
            continue;
        }

        let malformed = || IobError::MalformedIobLine {
            line: n + 1,
            content: line.to_string(),
        };
        let (token, label) = line.split_once('\t').ok_or_else(malformed)?;
        let label = Label::from_label(label).map_err(|_| malformed())?;
        current.push(TaggedToken::new(token, label));
    }

    if !current.is_empty() {
        documents.push(current);
    }
    Ok(documents)
}

/// Lê um arquivo IOB2 no formato pedido.
pub fn read_iob(path: impl AsRef<Path>, layout: IobLayout) -> Result<IobCorpus> {
    let text = fs::read_to_string(path)?;
    Ok(IobCorpus::from_documents(parse_iob(&text)?, layout))
}

/// Formata um documento, uma linha `token\trótulo` por token.
pub fn format_iob(tagged: &[TaggedToken]) -> String {
    tagged
        .iter()
        .map(|t| format!("{}\t{}\n", t.token, t.label))
        .collect()
}

/// Grava documentos separados por uma linha em branco.
pub fn write_iob(path: impl AsRef<Path>, documents: &[Vec<TaggedToken>]) -> Result<()> {
    let body = documents
        .iter()
        .map(|doc| format_iob(doc))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, body)?;
    Ok(())
}
