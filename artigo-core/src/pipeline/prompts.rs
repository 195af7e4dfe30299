//! Prompt builders for the two pipeline roles.
//!
//! The classifier is forced to ground its answer in the article index; the
//! extractor answers in raw JSON only. Wording changes here change model
//! behavior, so the phrasing is deliberately rigid.

/// System prompt for the classifier role.
pub fn classifier_system() -> String {
    "You are a strict scientific taxonomist.\n\
     You MUST map any scientific topic into one of these three buckets: \
     [Computacao, Medicina, Quimica].\n\
     Even if the topic is Physics, Biology, or Mathematics, you MUST force \
     it into the closest bucket above."
        .to_string()
}

/// Task prompt for the classifier role. `summary` is the article text
/// already truncated to the classifier input budget.
pub fn classifier_task(summary: &str) -> String {
    format!(
        "Input Summary: \"{summary}...\"\n\
         \n\
         CRITICAL INSTRUCTION:\n\
         You are FORBIDDEN from using your internal training knowledge to \
         classify this.\n\
         You MUST validate the classification against the article index.\n\
         \n\
         1. Use the search_articles tool to find similar reference articles.\n\
         2. Use get_article_content if you need more detail on a result.\n\
         3. Choose EXACTLY one area: Computacao, Medicina or Quimica.\n\
         \n\
         EVIDENCE REQUIREMENT:\n\
         You must justify your choice by citing the ID of the article found \
         in the index (e.g., \"Classified as Medicina because it is similar \
         to reference ID: doc.pdf_chunk_15\").\n\
         \n\
         Output: The Area Name and the Reference ID used as proof."
    )
}

/// System prompt for the extractor role.
pub fn extractor_system() -> String {
    "You are a precise scientific data analyst.\n\
     1. You extract technical details maintaining the SOURCE TEXT LANGUAGE \
     (e.g., if the input is English, the extraction is English).\n\
     2. You write the review ONLY in Portuguese."
        .to_string()
}

/// Task prompt for the extractor role. `text` is the article truncated to
/// the extractor input budget; `findings` is the classifier's answer;
/// `language` is a detection hint, when available.
pub fn extractor_task(text: &str, findings: &str, language: Option<&str>) -> String {
    let language_hint = match language {
        Some(language) => format!("Detected input language: {language}.\n"),
        None => String::new(),
    };

    format!(
        "Analyze the ORIGINAL INPUT below.\n\
         \n\
         === ORIGINAL INPUT START ===\n\
         {text}\n\
         === ORIGINAL INPUT END ===\n\
         \n\
         Classifier findings: {findings}\n\
         {language_hint}\
         \n\
         Generate a JSON object strictly following these rules:\n\
         \n\
         1. AREA (CRITICAL):\n\
            - You MUST output EXACTLY one of these strings: \"Computacao\", \
         \"Medicina\", \"Quimica\".\n\
            - Even if the article is Physics, Biology, or Math, map it to \
         the closest allowed category based on the classifier findings.\n\
            - Trust the classifier's choice.\n\
         \n\
         2. EXTRACTION (Same Language as Input):\n\
            - Extract the problem the article proposes to solve, the step \
         by step on how it is solved, and the conclusion, using THE INPUT \
         LANGUAGE.\n\
            - DO NOT TRANSLATE THESE FIELDS TO PORTUGUESE if the text is in \
         English.\n\
         \n\
         3. REVIEW (Must be in PORTUGUESE):\n\
            - You MUST write a critical review in PT-BR.\n\
            - CRITICAL REQUIREMENT: You MUST explicitly cover these points:\n\
              * Aspectos Positivos\n\
              * Possíveis Falhas ou Limitações\n\
              * Metodologia e Validade\n\
         \n\
         REQUIRED JSON FORMAT:\n\
         {{\n\
             \"area\": \"...\",\n\
             \"extraction\": {{\n\
                 \"problem\": \"...\",\n\
                 \"steps\": [\"...\"],\n\
                 \"conclusion\": \"...\"\n\
             }},\n\
             \"review_markdown\": \"## Resenha Crítica\\n\\n**Aspectos \
         Positivos:** ...\\n\\n**Possíveis Falhas:** ...\\n\\n**Metodologia \
         e Validade:** ...\"\n\
         }}\n\
         \n\
         IMPORTANT: Output ONLY the raw JSON string."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_task_embeds_summary() {
        let prompt = classifier_task("redes neurais para triagem");
        assert!(prompt.contains("redes neurais para triagem"));
        assert!(prompt.contains("search_articles"));
        assert!(prompt.contains("EVIDENCE REQUIREMENT"));
    }

    #[test]
    fn test_extractor_task_keys() {
        let prompt = extractor_task("corpo do artigo", "Medicina, ID doc_chunk_1", None);
        assert!(prompt.contains("\"problem\""));
        assert!(prompt.contains("\"steps\""));
        assert!(prompt.contains("\"conclusion\""));
        assert!(prompt.contains("\"review_markdown\""));
        assert!(!prompt.contains("Detected input language"));
    }

    #[test]
    fn test_extractor_task_language_hint() {
        let prompt = extractor_task("body", "findings", Some("English"));
        assert!(prompt.contains("Detected input language: English."));
    }
}
