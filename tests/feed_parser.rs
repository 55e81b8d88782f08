// tests/feed_parser.rs
use std::fs;

use trend_channel_bot::feeds::parser::parse_feed;

#[test]
fn rss_fixture_parses_all_items_with_extensions() {
    let xml = fs::read_to_string("tests/fixtures/trendfeed_rss.xml")
        .expect("missing tests/fixtures/trendfeed_rss.xml");

    let items = parse_feed(&xml, "https://crispculture.com/feed");
    assert_eq!(items.len(), 4, "every <item> should parse, even bad ones");

    let first = &items[0];
    assert_eq!(
        first.title.as_deref(),
        Some("Nike ACG Returns With a Trail-Ready Capsule")
    );
    assert_eq!(
        first.link.as_deref(),
        Some("https://crispculture.com/nike-acg-capsule")
    );
    assert_eq!(
        first.pub_date.as_deref(),
        Some("Mon, 21 Jul 2025 10:00:00 +0000")
    );
    let enclosure = first.enclosure.as_ref().expect("enclosure captured");
    assert_eq!(
        enclosure.url.as_deref(),
        Some("https://crispculture.com/img/acg-hero.jpg")
    );
    assert_eq!(enclosure.mime.as_deref(), Some("image/jpeg"));

    let second = &items[1];
    assert!(second.pub_date.is_none());
    assert_eq!(second.dc_date.as_deref(), Some("2025-07-22T09:30:00Z"));
    assert!(second.content_encoded.is_some());
    assert_eq!(
        second.media_content.len(),
        2,
        "repeated media:content collects into a sequence"
    );
    assert_eq!(second.media_thumbnail.len(), 1);
}

#[test]
fn bare_channel_root_with_single_item_yields_one_entry() {
    let xml = fs::read_to_string("tests/fixtures/single_item_rss.xml")
        .expect("missing tests/fixtures/single_item_rss.xml");

    let items = parse_feed(&xml, "https://justfreshkicks.com/feed");
    assert_eq!(items.len(), 1, "one bare item becomes a one-element list");
    assert_eq!(
        items[0].title.as_deref(),
        Some("Air Max Day Restock Hits Tomorrow")
    );
}

#[test]
fn atom_document_degrades_to_no_items() {
    let xml = fs::read_to_string("tests/fixtures/atom_feed.xml")
        .expect("missing tests/fixtures/atom_feed.xml");

    let items = parse_feed(&xml, "https://uproxx.com/music/feed");
    assert!(items.is_empty(), "Atom feeds are tolerated as empty, not an error");
}

#[test]
fn garbage_input_degrades_to_no_items() {
    let items = parse_feed("this is not even xml <<<", "https://example.test/feed");
    assert!(items.is_empty());
}

#[test]
fn undefined_html_entities_do_not_break_parsing() {
    let xml = r#"<rss><channel><item>
        <title>Drop recap &ndash; week 30 &nbsp;edition</title>
        <link>https://example.test/recap</link>
    </item></channel></rss>"#;

    let items = parse_feed(xml, "https://example.test/feed");
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].title.as_deref(),
        Some("Drop recap - week 30  edition")
    );
}
