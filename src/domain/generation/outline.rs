//! 大纲与章节内容的文本清洗
//!
//! LLM 回复可能带有 Markdown 代码围栏、说明文字或完整 HTML 文档外壳，
//! 这里统一提取出可用的部分。

use super::GenerationStateError;

/// 单个章节标题最大长度
const MAX_SECTION_TITLE_LEN: usize = 200;

/// 从 LLM 回复中解析大纲
///
/// 取回复中第一个 JSON 字符串数组；标题去除首尾空白、序号前缀，
/// 丢弃空标题，最多保留 `max_sections` 个。
pub fn parse_outline(reply: &str, max_sections: usize) -> Result<Vec<String>, GenerationStateError> {
    let body = strip_code_fence(reply);
    let start = body.find('[').ok_or(GenerationStateError::EmptyOutline)?;

    // 只读取第一个完整的 JSON 值，其后的说明文字（即使带方括号）忽略
    let raw: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Vec<serde_json::Value>>()
        .next()
        .ok_or(GenerationStateError::EmptyOutline)?
        .map_err(|e| GenerationStateError::MalformedOutline(e.to_string()))?;

    let outline: Vec<String> = raw
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .get("title")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string()),
            _ => None,
        })
        .map(|title| normalize_title(&title))
        .filter(|title| !title.is_empty())
        .take(max_sections)
        .collect();

    if outline.is_empty() {
        return Err(GenerationStateError::EmptyOutline);
    }
    Ok(outline)
}

/// 清洗章节 HTML：去掉代码围栏与 `<html>`/`<body>` 外壳
pub fn clean_html_fragment(reply: &str) -> String {
    let body = strip_code_fence(reply);

    let lower = body.to_ascii_lowercase();
    let inner = match (lower.find("<body"), lower.rfind("</body>")) {
        (Some(open), Some(close)) if open < close => match body[open..].find('>') {
            Some(tag_end) if open + tag_end + 1 <= close => &body[open + tag_end + 1..close],
            _ => body,
        },
        _ => body,
    };

    inner.trim().to_string()
}

/// 序号前缀最多两位数字，如 "1. " / "12) "
const MAX_NUMBER_PREFIX_DIGITS: usize = 2;

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    let title = strip_number_prefix(trimmed)
        .unwrap_or_else(|| trimmed.trim_start_matches(&['-', '*'][..]).trim_start());
    title.chars().take(MAX_SECTION_TITLE_LEN).collect()
}

/// "1. Intro" / "2) Intro" / "3: Intro" → "Intro"；"2001: A Space Odyssey" 原样保留
fn strip_number_prefix(title: &str) -> Option<&str> {
    let digits = title.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > MAX_NUMBER_PREFIX_DIGITS {
        return None;
    }
    let rest = title[digits..].strip_prefix(&['.', ')', '-', ':'][..])?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    (!rest.is_empty()).then_some(rest)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记所在的行
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let outline = parse_outline(r#"["Intro", "Starter", "Baking"]"#, 10).unwrap();
        assert_eq!(outline, vec!["Intro", "Starter", "Baking"]);
    }

    #[test]
    fn test_parse_fenced_array_with_prose() {
        let reply = "```json\nHere you go:\n[\"  1. Intro \", \"\", \"2) Flour\"]\n```";
        let outline = parse_outline(reply, 10).unwrap();
        assert_eq!(outline, vec!["Intro", "Flour"]);
    }

    #[test]
    fn test_parse_object_entries() {
        let outline = parse_outline(r#"[{"title": "Intro"}, {"name": "x"}, "Outro"]"#, 10).unwrap();
        assert_eq!(outline, vec!["Intro", "Outro"]);
    }

    #[test]
    fn test_parse_truncates_to_max() {
        let outline = parse_outline(r#"["a", "b", "c", "d"]"#, 2).unwrap();
        assert_eq!(outline.len(), 2);
    }

    #[test]
    fn test_parse_rejects_missing_or_empty() {
        assert!(matches!(
            parse_outline("no list here", 10),
            Err(GenerationStateError::EmptyOutline)
        ));
        assert!(matches!(
            parse_outline(r#"["", "   "]"#, 10),
            Err(GenerationStateError::EmptyOutline)
        ));
        assert!(matches!(
            parse_outline("[1, 2,", 10),
            Err(GenerationStateError::EmptyOutline) | Err(GenerationStateError::MalformedOutline(_))
        ));
    }

    #[test]
    fn test_parse_ignores_bracketed_prose_after_array() {
        let reply = "[\"Intro\", \"Starter\"]\n\nNote: adjust [as needed].";
        let outline = parse_outline(reply, 8).unwrap();
        assert_eq!(outline, vec!["Intro", "Starter"]);
    }

    #[test]
    fn test_number_prefix_only_stripped_when_short_and_spaced() {
        let outline = parse_outline(
            r#"["2001: A Space Odyssey", "12) Shaping", "3.Proofing", "4. Baking"]"#,
            10,
        )
        .unwrap();
        assert_eq!(
            outline,
            vec!["2001: A Space Odyssey", "Shaping", "3.Proofing", "Baking"]
        );
    }

    #[test]
    fn test_numeric_title_is_kept() {
        let outline = parse_outline(r#"["1984"]"#, 10).unwrap();
        assert_eq!(outline, vec!["1984"]);
    }

    #[test]
    fn test_clean_html_strips_fence_and_body() {
        let reply = "```html\n<html><body class=\"x\"><h2>Starter</h2><p>Feed it.</p></body></html>\n```";
        assert_eq!(clean_html_fragment(reply), "<h2>Starter</h2><p>Feed it.</p>");
    }

    #[test]
    fn test_clean_html_keeps_plain_fragment() {
        assert_eq!(clean_html_fragment("  <p>Hi</p> "), "<p>Hi</p>");
    }
}
