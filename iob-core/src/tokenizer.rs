//! # Tokenizadores
//!
//! O conversor não depende de nenhum segmentador linguístico: qualquer função
//! `&str -> Vec<String>` serve, desde que seja determinística e **particione o texto**
//! da esquerda para a direita (a concatenação dos tokens reconstrói o texto).
//!
//! ## Modos embutidos
//!
//! - **CharLevel**: cada caractere é um token. Torna o alinhamento sem perdas e é o padrão.
//! - **Grapheme**: clusters de grafemas estendidos (ex: "👍🏽" é um único token).
//! - **WordBounds**: fronteiras de palavra UAX#29. Espaços viram tokens próprios,
//!   que o alinhador descarta.
//!
//! Para um segmentador externo (ex: MeCab), basta passar um closure:
//!
//! ```rust
//! use iob_core::tokenizer::Tokenizer;
//!
//! let by_space = |text: &str| -> Vec<String> {
//!     text.split_inclusive(' ').map(str::to_string).collect()
//! };
//! assert_eq!(by_space.tokenize("a b"), vec!["a ", "b"]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Função de tokenização fornecida pelo chamador.
///
/// `Sync` é exigido porque o driver de lote processa documentos em paralelo.
pub trait Tokenizer: Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String> + Sync,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Estratégias de tokenização disponíveis sem dependências externas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// **Caractere**: um token por valor escalar Unicode.
    #[default]
    CharLevel,
    /// **Grafema**: um token por cluster de grafemas estendido.
    Grapheme,
    /// **Palavra**: segmentos entre fronteiras de palavra, incluindo espaços.
    WordBounds,
}

impl Tokenizer for TokenizerMode {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize_with_mode(text, *self)
    }
}

/// Tokeniza um texto com o modo especificado.
pub fn tokenize_with_mode(text: &str, mode: TokenizerMode) -> Vec<String> {
    match mode {
        TokenizerMode::CharLevel => tokenize_char_level(text),
        TokenizerMode::Grapheme => text.graphemes(true).map(str::to_string).collect(),
        TokenizerMode::WordBounds => text.split_word_bounds().map(str::to_string).collect(),
    }
}

fn tokenize_char_level(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

/// Token composto apenas por espaços (ou vazio). Estes tokens não recebem rótulo.
pub fn is_blank(token: &str) -> bool {
    token.chars().all(char::is_whitespace)
}
