//! Portuguese prompt builders for catalog generation.
//!
//! Every prompt demands a bare JSON array and embeds the requested quantity;
//! the `emphasize` variant is used on retries when the model returned the
//! wrong item count or unparseable output.

fn exact_count_note(quantidade: u32) -> String {
    format!(
        "\nIMPORTANTE: o array deve conter EXATAMENTE {quantidade} itens, nem mais nem menos. \
         Responda apenas com o array JSON, sem nenhum texto antes ou depois."
    )
}

pub fn categorias_prompt(quantidade: u32, emphasize: bool) -> String {
    let mut p = format!(
        "Gere {quantidade} categorias de instrumentos musicais (por exemplo: Cordas, Sopro, \
         Percussão, Teclas). Responda APENAS com um array JSON válido no formato:\n\
         [{{\"nome\": \"Cordas\", \"descricao\": \"Instrumentos de cordas friccionadas ou dedilhadas\"}}]"
    );
    if emphasize {
        p.push_str(&exact_count_note(quantidade));
    }
    p
}

pub fn sub_categorias_prompt(quantidade: u32, categoria_nome: &str, emphasize: bool) -> String {
    let mut p = format!(
        "Gere {quantidade} sub-categorias de instrumentos musicais pertencentes à categoria \
         \"{categoria_nome}\". Responda APENAS com um array JSON válido no formato:\n\
         [{{\"nome\": \"Violão\", \"descricao\": \"Instrumento de cordas dedilhadas\"}}]"
    );
    if emphasize {
        p.push_str(&exact_count_note(quantidade));
    }
    p
}

pub fn marcas_prompt(quantidade: u32, emphasize: bool) -> String {
    let mut p = format!(
        "Gere {quantidade} marcas reais e conhecidas de instrumentos musicais. Responda APENAS \
         com um array JSON válido no formato:\n\
         [{{\"nome\": \"Fender\", \"descricao\": \"Fabricante de guitarras e baixos\", \
         \"pais_origem\": \"Estados Unidos\", \"website\": \"https://www.fender.com\"}}]"
    );
    if emphasize {
        p.push_str(&exact_count_note(quantidade));
    }
    p
}

pub fn modelos_prompt(quantidade: u32, marca_nome: &str, emphasize: bool) -> String {
    let mut p = format!(
        "Gere {quantidade} modelos reais de instrumentos musicais da marca \"{marca_nome}\". \
         Informe também a categoria e a sub-categoria de cada modelo. Responda APENAS com um \
         array JSON válido no formato:\n\
         [{{\"nome\": \"Stratocaster\", \"descricao\": \"Guitarra elétrica de corpo sólido\", \
         \"categoria\": \"Cordas\", \"sub_categoria\": \"Guitarra\"}}]"
    );
    if emphasize {
        p.push_str(&exact_count_note(quantidade));
    }
    p
}

pub fn instrumentos_prompt(
    quantidade: u32,
    modelo_nome: &str,
    marca_nome: &str,
    emphasize: bool,
) -> String {
    let mut p = format!(
        "Gere {quantidade} instrumentos de inventário plausíveis do modelo \"{modelo_nome}\" \
         da marca \"{marca_nome}\". Use códigos únicos curtos, anos de fabricação realistas e \
         valores em reais. Responda APENAS com um array JSON válido no formato:\n\
         [{{\"codigo\": \"FEN-STR-001\", \"ano_fabricacao\": 2015, \"preco\": 8500.00, \
         \"valor_mercado\": 9200.00, \"estado_conservacao\": \"excelente\", \
         \"status\": \"disponivel\", \"descricao\": \"Acabamento sunburst\"}}]\n\
         Valores aceitos para estado_conservacao: novo, excelente, bom, regular, ruim. \
         Valores aceitos para status: disponivel, vendido, reservado, manutencao."
    );
    if emphasize {
        p.push_str(&exact_count_note(quantidade));
    }
    p
}

/// One-line textual logo description, the degraded fallback when no logo
/// image could be fetched.
pub fn logo_descricao_prompt(marca_nome: &str) -> String {
    format!(
        "Descreva em uma única frase curta, em português, o logotipo da marca de instrumentos \
         musicais \"{marca_nome}\". Responda apenas com a frase, sem aspas."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_quantity_and_parent() {
        let p = sub_categorias_prompt(5, "Cordas", false);
        assert!(p.contains('5'));
        assert!(p.contains("\"Cordas\""));

        let p = modelos_prompt(3, "Fender", false);
        assert!(p.contains('3'));
        assert!(p.contains("\"Fender\""));

        let p = instrumentos_prompt(2, "Stratocaster", "Fender", false);
        assert!(p.contains("\"Stratocaster\""));
        assert!(p.contains("\"Fender\""));
    }

    #[test]
    fn emphasized_prompt_repeats_exact_count() {
        let plain = marcas_prompt(10, false);
        let emphasized = marcas_prompt(10, true);
        assert!(!plain.contains("EXATAMENTE"));
        assert!(emphasized.contains("EXATAMENTE 10"));
    }
}
