//! # Corpus de Demonstração com Anotação XML Inline
//!
//! Pequeno conjunto de documentos anotados usado pelo servidor web e pelos testes.
//! Mistura prontuários em japonês (tags `C` = condição, `M` = medicamento, com o
//! atributo `value` marcando negação) e frases em português com `PER`/`ORG`/`LOC`/`MISC`.

/// Um documento anotado em XML inline
pub struct AnnotatedDocument {
    /// Texto com as tags
    pub text: &'static str,
    /// Domínio temático
    pub domain: &'static str,
    /// Se o documento só é aceito com `recover = true`
    pub needs_recovery: bool,
}

/// Retorna o corpus completo
pub fn get_corpus() -> Vec<AnnotatedDocument> {
    vec![
        // ===== PRONTUÁRIOS (JA) =====
        AnnotatedDocument {
            text: "<C>脳梗塞</C>を認め，<M>医薬品</M>の投与を行った．",
            domain: "prontuário",
            needs_recovery: false,
        },
        AnnotatedDocument {
            text: "<C value=\"N\">関節液貯留</C>は認めない．",
            domain: "prontuário",
            needs_recovery: false,
        },
        AnnotatedDocument {
            text: "<C>頭痛</C>と<C value=\"N\">発熱</C>の訴えなし，<M>ロキソプロフェン</M>を処方．",
            domain: "prontuário",
            needs_recovery: false,
        },
        AnnotatedDocument {
            text: "<C>高血圧</C>の既往あり，<M>アムロジピン</M>内服中",
            domain: "prontuário",
            needs_recovery: false,
        },
        // anotação manual com a tag esquecida aberta
        AnnotatedDocument {
            text: "<C>心房細動</C>に対し<M>ワルファリン",
            domain: "prontuário",
            needs_recovery: true,
        },

        // ===== SAÚDE (PT-BR) =====
        AnnotatedDocument {
            text: "A <ORG>Fiocruz</ORG> desenvolveu a vacina contra a <MISC>dengue</MISC> aprovada pela <ORG>Anvisa</ORG> em 2023.",
            domain: "saúde",
            needs_recovery: false,
        },
        AnnotatedDocument {
            text: "O <ORG>Hospital Albert Einstein</ORG> em <LOC>São Paulo</LOC> é referência em cardiologia e oncologia no <LOC>Brasil</LOC>.",
            domain: "saúde",
            needs_recovery: false,
        },

        // ===== HISTÓRIA =====
        AnnotatedDocument {
            text: "Em 1822, <PER>Dom Pedro I</PER> proclamou a <MISC>Independência do Brasil</MISC> às margens do <LOC>Rio Ipiranga</LOC>.",
            domain: "história",
            needs_recovery: false,
        },
        AnnotatedDocument {
            text: "A <PER>Princesa Isabel</PER> sancionou a <MISC>Lei Áurea</MISC> em 13 de maio de 1888.",
            domain: "história",
            needs_recovery: false,
        },

        // ===== TECNOLOGIA =====
        AnnotatedDocument {
            text: "A <ORG>Embraer</ORG> anunciou uma parceria com a <ORG>Boeing</ORG> &amp; fornecedores de <LOC>São José dos Campos</LOC>.",
            domain: "tecnologia",
            needs_recovery: false,
        },
    ]
}

/// Textos de demonstração para a UI: `(domínio, xml)`
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    get_corpus().iter().map(|doc| (doc.domain, doc.text)).collect()
}
