use birthday_card::card::CardImage;
use birthday_card::photo::to_data_url;
use birthday_card::RenderedCard;
use scraper::{Html, Selector};

fn select_text(doc: &Html, selector: &str) -> String {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default()
}

fn select_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .next()
        .and_then(|n| n.value().attr(attr).map(|s| s.to_string()))
}

#[test]
fn card_document_structure() {
    let url = url::Url::parse("https://images.example.com/cake.jpg?w=600&h=400").unwrap();
    let card = RenderedCard::new("Sam", CardImage::Stock { url }, "Line one\n\nLine two".into());
    let doc = Html::parse_document(&card.to_html().expect("render"));

    assert_eq!(select_text(&doc, "title"), "Dear Sam,");
    assert_eq!(select_text(&doc, "#card-recipient"), "Dear Sam,");
    assert_eq!(select_text(&doc, "#card-message"), "Line one\n\nLine two");
    assert_eq!(select_text(&doc, "#card-signature"), "Have an amazing day!");
    assert_eq!(
        select_attr(&doc, "#card-image", "src").as_deref(),
        Some("https://images.example.com/cake.jpg?w=600&h=400")
    );
    assert_eq!(
        select_attr(&doc, "#card-image", "alt").as_deref(),
        Some("Birthday celebration for Sam")
    );
    assert_eq!(select_attr(&doc, "#card-section", "aria-hidden").as_deref(), Some("false"));
}

#[test]
fn user_markup_is_rendered_as_text() {
    let url = url::Url::parse("https://images.example.com/cake.jpg").unwrap();
    let card = RenderedCard::new(
        "<script>alert(1)</script>",
        CardImage::Stock { url },
        "<img src=x onerror=alert(1)>".into(),
    );
    let doc = Html::parse_document(&card.to_html().expect("render"));

    let scripts = Selector::parse("script").unwrap();
    assert_eq!(doc.select(&scripts).count(), 0);
    let imgs = Selector::parse("img").unwrap();
    assert_eq!(doc.select(&imgs).count(), 1);
    assert_eq!(select_text(&doc, "#card-message"), "<img src=x onerror=alert(1)>");
}

#[test]
fn photo_card_embeds_data_url() {
    let data_url = to_data_url("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]);
    let card = RenderedCard::new(
        "Sam",
        CardImage::Photo {
            media_type: "image/jpeg".into(),
            data_url: data_url.clone(),
        },
        "Hi".into(),
    );
    let doc = Html::parse_document(&card.to_html().expect("render"));
    assert_eq!(select_attr(&doc, "#card-image", "src"), Some(data_url));
}

#[test]
fn card_serializes_to_json() {
    let url = url::Url::parse("https://images.example.com/cake.jpg").unwrap();
    let card = RenderedCard::new("Sam", CardImage::Stock { url }, "Hi".into());
    let value = serde_json::to_value(&card).expect("serialize");

    assert_eq!(value["recipient"], "Dear Sam,");
    assert_eq!(value["image"]["kind"], "stock");
    assert_eq!(value["image"]["url"], "https://images.example.com/cake.jpg");
}
