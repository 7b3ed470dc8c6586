use cv_forge::{App, Config};
use std::fs;

const ASHA: &str = r#"
[personal]
name = "Asha Rao"
designation = "Professor"
institution = "Deccan University"

[[education]]
title = "PhD, Computer Science"
institution = "IISc Bangalore"
date = "2012"

[[financial_support]]
title = "Conference travel"
institution = "DST"
date = "2023"

[financial_support.details]
amount = "50000"
"#;

#[tokio::test]
async fn test_batch_writes_documents_and_counts_failures() {
    let records = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    fs::write(records.path().join("42.toml"), ASHA).unwrap();

    let request_file = work.path().join("requests.json");
    fs::write(
        &request_file,
        r#"[
            { "personId": 42, "template": "classic", "format": "word", "sections": ["financial_support", "education"] },
            { "personId": 42, "template": "futuristic", "format": "word", "sections": ["education"] },
            { "personId": 5, "template": "modern", "format": "word", "sections": ["education"] }
        ]"#,
    )
    .unwrap();

    let config = Config {
        record_store_dir: records.path().to_path_buf(),
        request_file,
        output_dir: work.path().join("out"),
        max_concurrent_requests: 2,
        ..Config::default()
    };

    let stats = App::initialize(config).await.unwrap().run().await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.written.len(), 1);

    let written = &stats.written[0];
    let name = written.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("CV_AshaRao_classic_"), "{}", name);
    assert!(name.ends_with(".docx"));
    assert!(fs::read(written).unwrap().starts_with(b"PK"));
}

#[tokio::test]
async fn test_single_request_file() {
    let records = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    fs::write(records.path().join("42.toml"), ASHA).unwrap();

    let request_file = work.path().join("one.json");
    fs::write(
        &request_file,
        r#"{ "personId": "42", "template": "minimal", "format": "docx", "sections": ["awards"] }"#,
    )
    .unwrap();

    let config = Config {
        record_store_dir: records.path().to_path_buf(),
        request_file,
        output_dir: work.path().join("out"),
        ..Config::default()
    };

    let stats = App::initialize(config).await.unwrap().run().await.unwrap();
    assert_eq!((stats.success, stats.failed), (1, 0));
}

#[tokio::test]
async fn test_missing_request_file_is_an_error() {
    let work = tempfile::tempdir().unwrap();
    let config = Config {
        record_store_dir: work.path().to_path_buf(),
        request_file: work.path().join("absent.json"),
        output_dir: work.path().join("out"),
        ..Config::default()
    };

    let app = App::initialize(config).await.unwrap();
    assert!(app.run().await.is_err());
}
