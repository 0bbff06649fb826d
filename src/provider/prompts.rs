//! Prompt templates for paper enrichment
//!
//! Templates contain a single `{text}` placeholder for the abstract.

/// Abstract → fluent Chinese translation, keeping field terms in English
pub const TRANSLATION_PROMPT: &str = "我将给你一个人工智能领域的论文摘要，你需要翻译成中文，注意通顺流畅，领域专有用语（如transformer, token, logit）不用翻译。\n{text}";

/// Abstract → one-sentence Chinese summary of the core contribution
pub const CONTRIBUTION_PROMPT: &str = "我将给你一个人工智能领域的论文摘要，你需要使用中文，将最核心的内容用一句话说明，一般格式为：用了什么办法解决了什么问题。注意通顺流畅，领域专有用语（如transformer, token, logit）不用翻译。\n{text}";

/// Substitute `text` for every `{text}` placeholder
pub fn render_prompt(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}
