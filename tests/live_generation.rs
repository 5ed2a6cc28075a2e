use std::{env, sync::Once};

use pdfbrief::{
    config,
    generation::{GeminiClient, GenerationClient},
    processing::prompts::{FLOWCHART_MARKER, flowchart_prompt},
};

static INIT: Once = Once::new();

fn set_default_env(key: &str, value: &str) {
    let needs_value = env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true);
    if needs_value {
        // SAFETY: Tests run serially via Once and we intentionally mutate process env.
        unsafe {
            env::set_var(key, value);
        }
    }
}

fn live_config() -> &'static config::Config {
    INIT.call_once(|| {
        set_default_env("GENERATION_MODEL", config::DEFAULT_GENERATION_MODEL);
        set_default_env("GENERATION_TIMEOUT_SECS", "60");
    });
    config::init_config().expect("live configuration should load")
}

#[tokio::test]
#[ignore = "Requires GEMINI_API_KEY and network access"]
async fn live_gemini_generates_text() {
    let config = live_config();
    assert!(
        config.gemini_api_key.is_some(),
        "GEMINI_API_KEY must be set for live tests"
    );
    let client = GeminiClient::from_config(config).expect("client should build");

    let reply = client
        .generate("Reply with the single word: ready")
        .await
        .expect("live generation call");
    assert!(!reply.is_empty(), "expected non-empty reply");
    assert_eq!(reply, reply.trim(), "reply should already be trimmed");
}

#[tokio::test]
#[ignore = "Requires GEMINI_API_KEY and network access"]
async fn live_gemini_flowchart_contains_marker() {
    let config = live_config();
    let client = GeminiClient::from_config(config).expect("client should build");

    let reply = client
        .generate(&flowchart_prompt(
            "Water evaporates, condenses into clouds, and falls back as rain.",
        ))
        .await
        .expect("live generation call");
    assert!(
        reply.contains(FLOWCHART_MARKER),
        "expected a Mermaid flowchart: {reply}"
    );
}
