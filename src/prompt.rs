pub const MAX_ARTICLE_CHARS: usize = 8000;

const STRUCTURED_SUMMARY_INSTRUCTION: &str = "以下の記事を、Markdown形式で構造化して要約してください。見出し、太字、箇条書きリストなどを効果的に使用し、最も重要なポイントがひと目で分かるようにまとめてください。";

const KEY_POINTS_INSTRUCTION: &str = "以下のニュース記事の本文を読み、最も重要なポイントを正確に3つの箇条書きで日本語で要約してください。";

pub fn build_structured_prompt(article_text: &str) -> String {
    let mut result = String::with_capacity(article_text.len() + STRUCTURED_SUMMARY_INSTRUCTION.len() + 32);
    result.push_str(STRUCTURED_SUMMARY_INSTRUCTION);
    result.push_str("\n\n記事本文：\n");
    result.push_str(article_text);
    result
}

// Fetched pages are cut to MAX_ARTICLE_CHARS characters.
pub fn build_key_points_prompt(article_text: &str) -> String {
    let excerpt = truncate_chars(article_text, MAX_ARTICLE_CHARS);

    let mut result = String::with_capacity(excerpt.len() + KEY_POINTS_INSTRUCTION.len() + 32);
    result.push_str(KEY_POINTS_INSTRUCTION);
    result.push_str("\n\n記事本文：\n");
    result.push_str(excerpt);
    result
}

pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
