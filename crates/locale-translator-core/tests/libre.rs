//! LibreTranslate engine against a mock HTTP server

use locale_translator_core::{Error, Language, LanguageTable, LibreConfig, LibreTranslateEngine, TranslationEngine};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_languages() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"code": "en", "name": "English"},
            {"code": "fr", "name": "French"},
            {"code": "ja", "name": "japanese"},
            {"code": "zh", "name": "Chinese"},
            {"code": "eo", "name": "Esperanto"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    server
}

fn engine(server: &MockServer) -> LibreTranslateEngine {
    let config = LibreConfig {
        retry_delay_ms: 10,
        ..LibreConfig::new(server.uri(), Some("secret".to_string()))
    };
    LibreTranslateEngine::new(&config).unwrap()
}

#[tokio::test]
async fn test_translate_posts_form_and_parses_result() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_string_contains("q=hello"))
        .and(body_string_contains("source=en"))
        .and(body_string_contains("target=fr"))
        .and(body_string_contains("format=text"))
        .and(body_string_contains("api_key=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .mount(&server)
        .await;
    let engine = engine(&server);

    let result = engine.translate("hello", Language::English, Language::French).await.unwrap();

    assert_eq!(result.translated_text, "bonjour");
    assert_eq!(result.source_language, Language::English);
    assert_eq!(result.target_language, Language::French);
}

#[tokio::test]
async fn test_language_table_is_fetched_once_and_filtered() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "ok"})))
        .mount(&server)
        .await;
    let engine = engine(&server);

    engine.translate("a", Language::English, Language::French).await.unwrap();
    engine.translate("b", Language::English, Language::Japanese).await.unwrap();

    let table = engine.languages().await.unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[&Language::Japanese], "ja");
    // "Chinese" does not name a known language and is dropped
    assert!(!table.contains_key(&Language::ChineseSimplified));
    // the `expect(1)` on /languages is verified when the server drops
}

#[tokio::test]
async fn test_known_language_table_skips_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_string_contains("source=en-US"))
        .and(body_string_contains("target=fr-FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .mount(&server)
        .await;
    let table = LanguageTable::from([
        (Language::English, "en-US".to_string()),
        (Language::French, "fr-FR".to_string()),
    ]);
    let engine = engine(&server).with_languages(table);

    let result = engine.translate("hello", Language::English, Language::French).await.unwrap();

    assert_eq!(result.translated_text, "bonjour");
    let err = engine.translate("hello", Language::English, Language::German).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage(Language::German)));
}

#[tokio::test]
async fn test_unmapped_language_is_unsupported() {
    let server = server_with_languages().await;
    let engine = engine(&server);

    let err = engine
        .translate("hello", Language::English, Language::ChineseSimplified)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedLanguage(Language::ChineseSimplified)));
}

#[tokio::test]
async fn test_unparseable_body_is_a_parse_error() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let engine = engine(&server);

    let err = engine.translate("hello", Language::English, Language::French).await.unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_http_error_is_reported() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid request"})))
        .mount(&server)
        .await;
    let engine = engine(&server);

    let err = engine.translate("hello", Language::English, Language::French).await.unwrap_err();

    assert!(matches!(err, Error::Request(ref msg) if msg.contains("400") && msg.contains("Invalid request")));
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .mount(&server)
        .await;
    let engine = engine(&server);

    let result = engine.translate("hello", Language::English, Language::French).await.unwrap();

    assert_eq!(result.translated_text, "bonjour");
}

#[tokio::test]
async fn test_oversized_retry_after_is_capped() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "18446744073709551615"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .mount(&server)
        .await;
    let config = LibreConfig {
        timeout_secs: 1,
        retry_count: 2,
        ..LibreConfig::new(server.uri(), None)
    };
    let engine = LibreTranslateEngine::new(&config).unwrap();

    let started = std::time::Instant::now();
    let result = engine.translate("hello", Language::English, Language::French).await.unwrap();

    assert_eq!(result.translated_text, "bonjour");
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_persistent_rate_limit_gives_up() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;
    let engine = engine(&server);

    let err = engine.translate("hello", Language::English, Language::French).await.unwrap_err();

    assert!(matches!(err, Error::RateLimited { retry_after: None }));
}

#[tokio::test]
async fn test_translate_document_walks_leaves() {
    let server = server_with_languages().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_string_contains("q=hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_string_contains("q=bye"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "au revoir"})))
        .mount(&server)
        .await;
    let engine = engine(&server);
    let doc = match json!({"greeting": "hello", "nested": {"farewell": "bye"}, "count": 2}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };

    let out = engine
        .translate_document(doc, Language::English, Language::French)
        .await
        .unwrap();

    assert_eq!(
        serde_json::Value::Object(out),
        json!({"greeting": "bonjour", "nested": {"farewell": "au revoir"}, "count": 2})
    );
}

#[tokio::test]
async fn test_translate_many_keeps_input_order() {
    let server = server_with_languages().await;
    for (q, translated) in [("one", "un"), ("two", "deux"), ("three", "trois")] {
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_string_contains(format!("q={q}&")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": translated})))
            .mount(&server)
            .await;
    }
    let engine = engine(&server);
    let texts = vec!["three".to_string(), "one".to_string(), "two".to_string()];

    let results = engine
        .translate_many(&texts, Language::English, Language::French)
        .await
        .unwrap();

    let translated: Vec<_> = results.iter().map(|r| r.translated_text.as_str()).collect();
    assert_eq!(translated, vec!["trois", "un", "deux"]);
}
