// src/caption.rs
//
// Renders canonical items into the channel's message texts. Messages are
// posted with parse_mode=HTML, so the single-item title is bolded with
// <b> tags.

use crate::feeds::normalize::CanonicalItem;

pub const DIGEST_HEADER: &str = "⚡ Свежие тренды: мода, кроссовки, музыка";
pub const HASHTAG_LINE: &str = "#мода #музыка #streetwear #youthculture";
pub const NEWS_HEADER: &str = "🔥 Новость дня";

pub const NO_TRENDS_TEXT: &str =
    "Сегодня не удалось собрать новости по моде и музыке — источники ничего не вернули.";
pub const NO_FRESH_NEWS_TEXT: &str =
    "Сегодня свежих новостей по моде и музыке нет — источники молчат.";
pub const TEST_TEXT: &str = "🔥 Тестовый пост от бота\n\nЕсли ты видишь это сообщение в своем канале, значит бот и канал связаны правильно.";

/// Description snippets are cut at this many characters.
pub const DESCRIPTION_LIMIT: usize = 400;

/// Numbered digest: header, one block per item (title line, link line,
/// spacer), hashtag line.
pub fn digest_caption(items: &[CanonicalItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() * 3 + 3);
    lines.push(DIGEST_HEADER.to_string());
    lines.push(String::new());

    for (index, item) in items.iter().enumerate() {
        lines.push(format!("{}. {} — {}", index + 1, item.title, item.source.section));
        lines.push(item.link.clone());
        lines.push(String::new());
    }

    lines.push(HASHTAG_LINE.to_string());
    lines.join("\n")
}

/// Single-item caption: header, bolded title, truncated description
/// snippet (omitted when the item has none), source attribution, link,
/// hashtag line.
pub fn news_caption(item: &CanonicalItem) -> String {
    let mut lines = vec![
        NEWS_HEADER.to_string(),
        String::new(),
        format!("<b>{}</b>", item.title),
        String::new(),
    ];

    if let Some(description) = &item.description {
        lines.push(truncate_at_word(description, DESCRIPTION_LIMIT));
        lines.push(String::new());
    }

    let source_label = if item.source.section.is_empty() {
        &item.source.name
    } else {
        &item.source.section
    };
    lines.push(format!("Источник: {source_label}"));
    lines.push(item.link.clone());
    lines.push(String::new());
    lines.push(HASHTAG_LINE.to_string());

    lines.join("\n")
}

/// Cut `s` to at most `limit` characters without splitting a word, and
/// append an ellipsis. Strings within the limit come back unmodified; when
/// no whitespace exists before the cutoff, the cut lands at the raw limit.
///
/// The limit counts characters, not bytes: the channel's text is Cyrillic.
pub fn truncate_at_word(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }

    let head: String = s.chars().take(limit).collect();
    match head.rfind(char::is_whitespace) {
        Some(cut) => format!("{}…", head[..cut].trim_end()),
        None => format!("{head}…"),
    }
}
