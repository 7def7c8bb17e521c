//! Document migration tests
//!
//! Legacy XML in, current XML out, including compressed inputs and mixed
//! batches.

use news_archive::{
    ArchiveError, LegacyArticle, LegacyComment, MigrationConfig, Migrator, SchemaVersion,
    decode_document, detect_version, encode_gzip, migrate_document, parse_legacy_article,
    parse_news_article,
};

/// Route library logs to the test harness; RUST_LOG=news_archive=trace for detail
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const CRAWLED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<newsArticle>
    <author>Political correspondent</author>
    <date>2016-03-01 10:15</date>
    <title>Budget passed in parliament</title>
    <body>
        The budget was passed with a majority of 40 votes.
    </body>
    <url>http://news.example.lk/local/budget-passed</url>
    <comments>
        <comment>
            <author>kamal</author>
            <date>2016-03-01 11:02</date>
            <body>Finally some good news &amp; relief.</body>
        </comment>
        <comment>
            <body>Let's see if it works.</body>
        </comment>
    </comments>
</newsArticle>
"#;

#[test]
fn test_parse_crawled_document() {
    init_tracing();
    let article = parse_legacy_article(CRAWLED).unwrap();

    assert_eq!(article.author(), Some("Political correspondent"));
    assert_eq!(article.title(), "Budget passed in parliament");
    assert!(article.body().unwrap().starts_with("\n        The budget"));
    assert_eq!(article.comments().len(), 2);
    assert_eq!(
        article.comments()[0].body(),
        "Finally some good news & relief."
    );
    assert_eq!(article.comments()[1].author(), None);
}

#[test]
fn test_migrate_crawled_document() {
    init_tracing();
    let xml = migrate_document(CRAWLED, 2016, &MigrationConfig::default()).unwrap();
    assert_eq!(detect_version(&xml).unwrap(), SchemaVersion::Current);

    let current = parse_news_article(&xml).unwrap();
    assert_eq!(current.id(), 2016);
    assert_eq!(
        current.body(),
        "The budget was passed with a majority of 40 votes."
    );
    assert_eq!(current.url(), Some("http://news.example.lk/local/budget-passed"));
    assert_eq!(current.comments()[0].id(), 0);
    assert_eq!(current.comments()[1].id(), 1);
    assert_eq!(current.comments()[1].body(), "Let's see if it works.");
    assert!(current.published().is_some());
}

#[test]
fn test_render_after_parse() {
    let article = parse_legacy_article(CRAWLED).unwrap();
    let text = article.render_comments_only_text();
    assert_eq!(
        text,
        "Budget passed in parliament\n\n\nkamal (2016-03-01 11:02)\nFinally some good news & relief.\n\nLet's see if it works."
    );
}

#[test]
fn test_written_document_roundtrips() {
    let article = LegacyArticle::builder()
        .title("Flood warning")
        .body("Residents near the river <Kelani> should move.\n\nMore later.")
        .add_comment(LegacyComment::new("Stay safe").with_author("nimal"))
        .build();
    let xml = article.to_xml(&MigrationConfig::default()).unwrap();
    assert_eq!(parse_legacy_article(&xml).unwrap(), article);
}

#[test]
fn test_mixed_batch() {
    init_tracing();
    let already_current = LegacyArticle::new("old", "migrated before", vec![])
        .convert_to_current(9000)
        .to_xml(&MigrationConfig::default())
        .unwrap();
    let compressed = encode_gzip(CRAWLED).unwrap();
    let no_body = "<newsArticle><title>Empty</title></newsArticle>";

    let documents: Vec<&[u8]> = vec![
        CRAWLED.as_bytes(),
        already_current.as_bytes(),
        compressed.as_slice(),
        &b"<newsArticle><title>oops</newsArticle>"[..],
        no_body.as_bytes(),
    ];

    let mut migrator = Migrator::new(1, MigrationConfig::strict());
    let results = migrator.migrate_all(documents);

    assert_eq!(results[0].as_ref().unwrap().article.id(), 1);
    assert_eq!(results[1].as_ref().unwrap().article.id(), 9000);
    assert_eq!(
        results[1].as_ref().unwrap().source_version,
        SchemaVersion::Current
    );
    assert_eq!(results[2].as_ref().unwrap().article.id(), 2);
    assert!(matches!(results[3], Err(ArchiveError::Xml(_))));
    assert!(matches!(
        results[4],
        Err(ArchiveError::MissingField("body"))
    ));

    let stats = migrator.stats();
    assert_eq!(stats.migrated, 2);
    assert_eq!(stats.already_current, 1);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.comments_converted, 4);
    assert_eq!(migrator.next_id(), Some(3));
}

#[test]
fn test_gzip_roundtrip_through_decode() {
    let compressed = encode_gzip(CRAWLED).unwrap();
    assert!(compressed.len() < CRAWLED.len());
    assert_eq!(decode_document(&compressed).unwrap(), CRAWLED);
}
