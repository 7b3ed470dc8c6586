mod common;

use common::{
    docx_part, docx_texts, fixture_store, harness, harness_with, html_texts, markup_in_pdf,
    section_titles, EngineMode, LogCapture, Person,
};
use cv_forge::models::{CategoryRecord, PersonalRecord};
use cv_forge::template::StyleSlot;
use cv_forge::{GenerateRequest, PreviewRequest, SectionKey, TemplateId};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

const DOCX_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[tokio::test]
async fn test_generate_pdf_example() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request = GenerateRequest::new(42, "modern", "pdf", &["education", "books"]);

    let response = h.service.generate(&request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/pdf");
    assert!(response.body.starts_with(b"%PDF-"));
    let filename = response.filename.clone().unwrap();
    assert!(filename.starts_with("CV_AshaRao_modern_"), "{}", filename);
    assert!(filename.ends_with(".pdf"));
    assert_eq!(
        response.content_disposition().unwrap(),
        format!("attachment; filename=\"{}\"", filename)
    );
}

#[tokio::test]
async fn test_generate_word_example() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request = GenerateRequest::new(42, "classic", "word", &["books", "financial_support"]);

    let response = h.service.generate(&request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, DOCX_TYPE);
    assert!(response.filename.as_deref().unwrap().ends_with(".docx"));
    assert!(response.body.starts_with(b"PK"));
    // 不经过浏览器
    assert!(h.engine.last_markup().is_none());
}

#[tokio::test]
async fn test_unknown_template_rejected_before_any_fetch() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request = GenerateRequest::new(42, "futuristic", "pdf", &["education", "books"]);

    let response = h.service.generate(&request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(h.store.fetches(), 0);
    let body = response.error_body().unwrap();
    assert!(body.message.unwrap().contains("futuristic"));
}

#[tokio::test]
async fn test_invalid_requests_never_touch_the_store() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let bad: Vec<Value> = vec![
        json!({ "personId": 0, "template": "modern", "format": "pdf", "sections": ["books"] }),
        json!({ "personId": "x1", "template": "modern", "format": "pdf", "sections": ["books"] }),
        json!({ "personId": 42, "template": "modern", "format": "rtf", "sections": ["books"] }),
        json!({ "personId": 42, "template": "modern", "format": "pdf", "sections": [] }),
        json!({ "personId": 42, "template": "modern", "format": "pdf", "sections": ["hobbies"] }),
        json!({ "template": "modern", "format": "pdf", "sections": ["books"] }),
    ];

    for value in bad {
        let request: GenerateRequest = serde_json::from_value(value.clone()).unwrap();
        let response = h.service.generate(&request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", value);
        assert!(response.filename.is_none());
    }
    assert_eq!(h.store.fetches(), 0);
}

#[tokio::test]
async fn test_missing_identity_returns_422_without_binary() {
    let h = harness(fixture_store(), EngineMode::Ok, false);

    for format in ["pdf", "word"] {
        let request = GenerateRequest::new(13, "classic", format, &["education"]);
        let response = h.service.generate(&request).await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.content_type, "application/json");
        assert!(response.filename.is_none());
        assert_eq!(
            response.error_body().unwrap().error,
            "personal information required"
        );
    }
    assert!(h.engine.last_markup().is_none());
}

#[tokio::test]
async fn test_unknown_person_is_missing_identity() {
    let h = harness(fixture_store(), EngineMode::Ok, true);
    let response = h
        .service
        .generate(&GenerateRequest::new(9999, "minimal", "pdf", &["awards"]))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_failed_section_still_renders_as_empty_section() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let h = harness(
        fixture_store().failing(SectionKey::Books),
        EngineMode::Ok,
        false,
    );
    let request = GenerateRequest::new(42, "academic", "pdf", &["books", "education"]);

    let response = h.service.generate(&request).await;

    assert_eq!(response.status, StatusCode::OK);
    let texts = html_texts(&markup_in_pdf(&response.body));
    assert_eq!(section_titles(&texts), vec!["Education", "Books and Chapters"]);
    assert!(!texts.iter().any(|(_, t)| t.contains("Compilers")));

    let warnings = logs.warn_lines();
    assert!(
        warnings
            .iter()
            .any(|l| l.contains("section 'books'") && l.contains("connection reset")),
        "{:#?}",
        warnings
    );
}

#[tokio::test]
async fn test_empty_section_keeps_its_title() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request = GenerateRequest::new(7, "modern", "word", &["awards", "consultancy", "education"]);

    let response = h.service.generate(&request).await;

    assert_eq!(response.status, StatusCode::OK);
    let texts = docx_texts(&response.body);
    assert_eq!(
        section_titles(&texts),
        vec!["Education", "Consultancy", "Awards and Honours"]
    );
}

#[tokio::test]
async fn test_render_timeout_is_500_and_hides_detail_in_production() {
    let store = fixture_store();
    let h = harness_with(
        store,
        EngineMode::Slow(Duration::from_millis(500)),
        true,
        Duration::from_secs(1),
        Duration::from_millis(50),
    );
    let response = h
        .service
        .generate(&GenerateRequest::new(42, "classic", "pdf", &["education"]))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.filename.is_none());
    let body = response.error_body().unwrap();
    assert_eq!(body.error, "generation failed");
    assert!(body.message.is_none());
}

#[tokio::test]
async fn test_engine_crash_is_500_with_detail_outside_production() {
    let h = harness(fixture_store(), EngineMode::Crash, false);
    let response = h
        .service
        .generate(&GenerateRequest::new(42, "classic", "pdf", &["education"]))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.body.starts_with(b"%PDF-"));
    assert!(response
        .error_body()
        .unwrap()
        .message
        .unwrap()
        .contains("crashed"));
}

#[tokio::test]
async fn test_renderers_agree_on_section_order_and_content() {
    let sections = [
        "talks",
        "financial_support",
        "papers",
        "awards",
        "books",
        "education",
        "guidance",
    ];

    for template in TemplateId::ALL {
        let h = harness(fixture_store(), EngineMode::Ok, false);

        let pdf = h
            .service
            .generate(&GenerateRequest::new(42, template.as_str(), "pdf", &sections))
            .await;
        let word = h
            .service
            .generate(&GenerateRequest::new(42, template.as_str(), "word", &sections))
            .await;
        assert_eq!(pdf.status, StatusCode::OK);
        assert_eq!(word.status, StatusCode::OK);

        let from_html = html_texts(&h.engine.last_markup().unwrap());
        let from_docx = docx_texts(&word.body);

        assert_eq!(
            section_titles(&from_html),
            vec![
                "Education",
                "Research Papers",
                "Books and Chapters",
                "Research Guidance",
                "Invited Talks",
                "Awards and Honours",
                "Financial Support",
            ],
            "{}",
            template
        );
        assert_eq!(from_html, from_docx, "{}", template);
        assert!(from_docx
            .iter()
            .any(|(slot, text)| *slot == StyleSlot::ItemTitle && text == "Practical <Compilers>"));
    }
}

#[tokio::test]
async fn test_control_characters_do_not_break_parity() {
    let mut person = Person {
        personal: Some(PersonalRecord::new("Meera\u{1} Iyer")),
        ..Person::default()
    };
    person.sections.insert(
        SectionKey::Books,
        vec![CategoryRecord::new("Lex\u{1}ing\u{FFFF} Tools")
            .with_institution("Acme\u{B} Press")
            .with_detail("isbn", "978\u{FFFE}-1")],
    );
    let h = harness(fixture_store().with_person(99, person), EngineMode::Ok, false);
    let sections = ["books"];

    let pdf = h
        .service
        .generate(&GenerateRequest::new(99, "classic", "pdf", &sections))
        .await;
    let word = h
        .service
        .generate(&GenerateRequest::new(99, "classic", "word", &sections))
        .await;
    assert_eq!(pdf.status, StatusCode::OK);
    assert_eq!(word.status, StatusCode::OK);

    let from_html = html_texts(&h.engine.last_markup().unwrap());
    let from_docx = docx_texts(&word.body);
    assert_eq!(from_html, from_docx);

    let all: Vec<&str> = from_docx.iter().map(|(_, t)| t.as_str()).collect();
    assert!(all.contains(&"Meera Iyer"));
    assert!(all.contains(&"Lexing Tools"));
    assert!(all.contains(&"Isbn: 978-1"));
}

#[tokio::test]
async fn test_docx_uses_template_fonts() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let response = h
        .service
        .generate(&GenerateRequest::new(42, "academic", "word", &["education"]))
        .await;

    let styles = docx_part(&response.body, "word/styles.xml");
    assert!(styles.contains("w:ascii=\"Georgia\""));
    assert!(styles.contains("w:styleId=\"CvSectionTitle\""));
}

#[tokio::test]
async fn test_concurrent_requests_do_not_mix_content() {
    let h = harness(
        fixture_store().with_delay(Duration::from_millis(5)),
        EngineMode::Ok,
        false,
    );
    let service = &h.service;
    let sections = ["education", "books"];

    let mut futures = Vec::new();
    for i in 0..8 {
        let person = if i % 2 == 0 { 42 } else { 7 };
        futures.push(async move {
            let response = service
                .generate(&GenerateRequest::new(person, "minimal", "word", &sections))
                .await;
            (person, response)
        });
    }

    for (person, response) in futures::future::join_all(futures).await {
        assert_eq!(response.status, StatusCode::OK);
        let texts = docx_texts(&response.body);
        let all: Vec<&str> = texts.iter().map(|(_, t)| t.as_str()).collect();
        if person == 42 {
            assert!(all.contains(&"Asha Rao"));
            assert!(all.contains(&"Practical <Compilers>"));
            assert!(!all.iter().any(|t| t.contains("Li Wei") || t.contains("Quantum")));
        } else {
            assert!(all.contains(&"Li Wei"));
            assert!(all.contains(&"Quantum Optics Notes"));
            assert!(!all.iter().any(|t| t.contains("Asha") || t.contains("Compilers")));
        }
    }
}

#[tokio::test]
async fn test_preview_returns_document_model_json() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request: PreviewRequest =
        serde_json::from_value(json!({ "personId": "42", "sections": ["talks", "education"] }))
            .unwrap();

    let response = h.service.preview(&request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    let value: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(value["personal"]["name"], "Asha Rao");
    assert_eq!(value["sections"]["education"].as_array().unwrap().len(), 2);
    assert_eq!(value["sections"]["talks"][0]["title"], "Parsing at scale");

    // 规范顺序
    let raw = String::from_utf8(response.body).unwrap();
    assert!(raw.find("\"education\"").unwrap() < raw.find("\"talks\"").unwrap());
    assert!(h.engine.last_markup().is_none());
}

#[tokio::test]
async fn test_preview_defaults_to_all_sections() {
    let h = harness(fixture_store(), EngineMode::Ok, false);
    let request: PreviewRequest = serde_json::from_value(json!({ "personId": 7 })).unwrap();

    let response = h.service.preview(&request).await;

    let value: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(
        value["sections"].as_object().unwrap().len(),
        SectionKey::CANONICAL_ORDER.len()
    );
}

