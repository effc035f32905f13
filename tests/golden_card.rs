use std::fs;
use std::path::PathBuf;

use birthday_card::{CardConfig, CardController, CardRequest, NoopView};
use sha2::{Digest, Sha256};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

async fn render_text(config: CardConfig, request: CardRequest) -> String {
    let mut controller = CardController::new(config, NoopView::new()).expect("controller");
    assert!(controller.submit(request).await);
    controller.card().expect("card").to_text()
}

#[tokio::test]
async fn golden_card_text_matches_fixture() {
    let config = CardConfig {
        seed: Some(1234),
        ..Default::default()
    };
    let text = render_text(config, CardRequest::new("Sam", "30")).await;
    let digest = hex::encode(Sha256::digest(text.as_bytes()));

    let text_path = golden_path("card_sam.txt");
    let digest_path = golden_path("card_sam.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all(golden_path("")).expect("golden dir");
        fs::write(&text_path, format!("{}\n", text)).expect("write golden text");
        fs::write(&digest_path, format!("{}\n", digest)).expect("write golden digest");
        println!("Updated goldens: {:?}, {:?}", text_path, digest_path);
        return;
    }

    let expected_text = fs::read_to_string(&text_path)
        .unwrap_or_else(|e| panic!("missing golden {:?} ({}); run with UPDATE_GOLDENS=1", text_path, e));
    let expected_digest = fs::read_to_string(&digest_path)
        .unwrap_or_else(|e| panic!("missing golden {:?} ({}); run with UPDATE_GOLDENS=1", digest_path, e));

    assert_eq!(text, expected_text.trim_end());
    assert_eq!(digest, expected_digest.trim());
}

#[tokio::test]
async fn card_text_does_not_depend_on_seed_without_traits() {
    let mut texts = Vec::new();
    for seed in [1, 2, 3] {
        let config = CardConfig {
            seed: Some(seed),
            ..Default::default()
        };
        texts.push(render_text(config, CardRequest::new("Sam", "30")).await);
    }
    assert!(texts.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn seeded_render_is_stable_within_a_run() {
    let render = || async {
        let config = CardConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut c = CardController::new(config, NoopView::new()).expect("controller");
        c.submit(CardRequest::new("Alex", "41").with_traits("brave; curious")).await;
        c.card().expect("card").to_html().expect("render")
    };
    assert_eq!(render().await, render().await);
}
