//! crates/juris_resumo_core/src/prompts.rs
//!
//! The two fixed prompt templates. Only the technical template depends on the
//! requested size.

use crate::domain::{SummaryKind, SummarySize};

const TECHNICAL_TEMPLATE: &str = r#"
Você é um assistente jurídico de IA altamente especializado. Sua tarefa é analisar o texto bruto de um processo judicial e criar um resumo técnico e detalhado.

**Instruções:**
1.  O resumo deve ser escrito em português jurídico formal e ter aproximadamente {word_count} palavras.
2.  Siga estritamente a estrutura abaixo, usando negrito para os títulos.
3.  Se uma informação não for encontrada no texto, escreva "Não encontrado".
4.  Se o texto de entrada for muito longo, priorize extrair as informações para os campos obrigatórios.
5.  Destaque em negrito quaisquer citações de artigos de lei.

**Estrutura Obrigatória:**

**Número do Processo:** (extraia o número do processo)
**Partes:** (Identifique Autor, Réu e os respectivos advogados, se mencionados)
**Objeto da Ação:** (Descreva o propósito principal da ação judicial)
**Pedido Principal e Pedidos Sucessivos:** (Liste o que o autor está pedindo)
**Fatos Relevantes:** (Apresente uma cronologia resumida dos eventos chave que levaram ao processo)
**Decisão Judicial Mais Recente:** (Descreva a última decisão, despacho ou sentença, se houver)
**Status Atual do Processo:** (Indique o estado atual, ex: Em andamento, Concluso para julgamento, Arquivado)
**Riscos e Próximos Passos:** (Faça uma breve análise preditiva dos possíveis riscos e dos próximos eventos processuais)

---
INÍCIO DO TEXTO DO PROCESSO:
"#;

const SIMPLIFIED_TEMPLATE: &str = r#"
Você é um assistente de IA especializado em traduzir linguagem jurídica complexa para um formato simples e claro, destinado a clientes que não são advogados.

**Instruções:**
1.  Crie um resumo claro e conciso, com no máximo 800 palavras.
2.  Use linguagem simples, evitando jargões jurídicos (juridiquês).
3.  Utilize frases curtas e bullet points para facilitar a leitura.
4.  Responda às perguntas abaixo de forma direta.

**Estrutura do Resumo (Responda a estas perguntas):**

-   **O que está acontecendo neste processo?**
    (Explique o motivo principal do processo de forma simples.)

-   **Quem está processando quem?**
    (Identifique o autor e o réu.)

-   **O que a pessoa que entrou com o processo quer?**
    (Descreva o objetivo principal do autor.)

-   **O que já aconteceu de mais importante?**
    (Resuma os eventos principais até agora.)

-   **Qual foi a última decisão do juiz?**
    (Explique a última atualização relevante de forma clara.)

-   **O processo está ganho, perdido ou em andamento?**
    (Dê uma ideia do status atual do caso.)

-   **O que deve acontecer em seguida?**
    (Informe os próximos passos prováveis.)

---
INÍCIO DO TEXTO DO PROCESSO:
"#;

/// Target length phrase inserted into the technical template.
pub fn technical_word_count(size: SummarySize) -> &'static str {
    match size {
        SummarySize::Short => "~500",
        SummarySize::Medium => "~1000",
        SummarySize::Long => "até 1500",
    }
}

pub fn template(kind: SummaryKind, size: SummarySize) -> String {
    match kind {
        SummaryKind::Technical => {
            TECHNICAL_TEMPLATE.replace("{word_count}", technical_word_count(size))
        }
        SummaryKind::Simplified => SIMPLIFIED_TEMPLATE.to_string(),
    }
}

/// The full text sent to a provider: template, blank line, case text.
pub fn build_prompt(kind: SummaryKind, size: SummarySize, text: &str) -> String {
    format!("{}\n\n{}", template(kind, size), text)
}
