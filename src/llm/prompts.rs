//! Prompt templates for grounded answers

use std::collections::HashMap;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template in a single pass
    ///
    /// Placeholders without a value render as empty text. Substituted values
    /// are never scanned for placeholders themselves.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find("{{") {
            let Some(close) = rest[open + 2..].find("}}") else {
                break;
            };
            result.push_str(&rest[..open]);
            let name = &rest[open + 2..open + 2 + close];
            result.push_str(values.get(name).copied().unwrap_or_default());
            rest = &rest[open + 2 + close + 2..];
        }
        result.push_str(rest);
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let name = rest[open + 2..open + 2 + close].to_string();
        if !name.is_empty() && !variables.contains(&name) {
            variables.push(name);
        }
        rest = &rest[open + 2 + close + 2..];
    }

    variables
}

/// Standard RAG prompt templates
pub struct RagPrompts;

impl RagPrompts {
    /// Answer strictly from retrieved context
    ///
    /// Variables: `context`, `examples`, `query_text`.
    #[must_use]
    pub fn graphrag() -> PromptTemplate {
        PromptTemplate::new(
            r"You are a helpful AI assistant. Your task is to answer questions using ONLY the information provided in the context below.
DO NOT use any external knowledge or make up information.
If the answer cannot be found in the context, simply state that you cannot answer based on the available information.

When answering questions:
1. Focus on information explicitly stated in the context
2. If multiple pieces of evidence exist, consider all of them
3. If there are contradictions, mention them
4. If the information is unclear or ambiguous, say so

Context:
{{context}}

Examples:
{{examples}}

Question:
{{query_text}}

Answer (using ONLY information from the context above):",
        )
    }
}
