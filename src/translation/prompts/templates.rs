/*!
 * Prompt templates for documentation translation.
 *
 * Prompts are deterministic: the same document and language pair always
 * produce byte-identical messages, which keeps retranslations of unchanged
 * text as stable as the model allows.
 */

use crate::language_utils::TargetLanguage;

/// Proper nouns that must survive translation unchanged
pub const PRESERVED_TERMS: &[&str] = &["New API", "Cherry Studio"];

/// Terminology table appended to every prompt
pub const GLOSSARY: &str = "\
| 中文 | English | 说明 | Description |
|------|---------|------|-------------|
| 倍率 | Ratio | 用于计算价格的乘数因子 | Multiplier factor used for price calculation |
| 令牌 | Token | API访问凭证，也指模型处理的文本单元 | API access credentials or text units processed by models |
| 渠道 | Channel | API服务提供商的接入通道 | Access channel for API service providers |
| 分组 | Group | 用户或令牌的分类，影响价格倍率 | Classification of users or tokens, affecting price ratios |
| 额度 | Quota | 用户可用的服务额度 | Available service quota for users |";

/// System and user prompt templates.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// System message sent with every request.
    pub const DOCUMENT_TRANSLATOR: &'static str = "You are a professional technical documentation translator. \
Translate accurately while preserving Markdown formatting, code blocks, and technical terms.";

    /// Instructions placed before the glossary and the document.
    pub const TRANSLATION_RULES: &'static str = r#"You are an expert technical documentation translator. Translate the following Markdown document from {source_language} to {target_language}.

Translation rules:
1. Keep the Markdown structure intact, including headings, lists, code blocks, tables and links, each in its original position
2. Do not translate the contents of fenced code blocks
3. Use industry-standard translations for technical terms
4. Keep the text technically accurate and professional
5. Keep image paths and link paths unchanged, even when they contain {source_language} directory names
6. Translate the values in the YAML front matter
7. Keep the tone and style of the original
8. Keep these proper nouns unchanged: {preserved_terms}
9. Replace the language code in paths: /{source_code}/ becomes /{target_code}/ (for example href="/{source_code}/docs/guide" becomes href="/{target_code}/docs/guide")

Glossary (for reference only, do not include it in the translation):
{glossary}

Return only the translated document, without any explanation or commentary.

Source document:

"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default rules template.
    pub fn translation_rules() -> Self {
        Self::new(Self::TRANSLATION_RULES)
    }

    /// Render the template for one language pair.
    pub fn render(
        &self,
        source_code: &str,
        source_language: &str,
        target: &TargetLanguage,
    ) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", &target.name)
            .replace("{source_code}", source_code)
            .replace("{target_code}", &target.dir)
            .replace("{preserved_terms}", &quoted_terms())
            .replace("{glossary}", GLOSSARY)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::translation_rules()
    }
}

fn quoted_terms() -> String {
    PRESERVED_TERMS
        .iter()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the messages for translating one document into one language.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    source_code: String,
    source_language: String,
    template: PromptTemplate,
}

impl TranslationPromptBuilder {
    /// Create a builder for documents written in `source_language`.
    pub fn new(source_code: &str, source_language: &str) -> Self {
        Self {
            source_code: source_code.to_string(),
            source_language: source_language.to_string(),
            template: PromptTemplate::default(),
        }
    }

    /// Build the system prompt.
    pub fn build_system_prompt(&self) -> String {
        PromptTemplate::DOCUMENT_TRANSLATOR.to_string()
    }

    /// Build the user prompt: rules, glossary, then the document verbatim.
    pub fn build_user_prompt(&self, target: &TargetLanguage, content: &str) -> String {
        let mut prompt = self
            .template
            .render(&self.source_code, &self.source_language, target);
        prompt.push_str(content);
        prompt.push('\n');
        prompt
    }
}
