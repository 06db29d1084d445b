//! Integration tests for the collector
//!
//! These tests use wiremock to serve listing and detail pages in the site's
//! section layout and run whole collections end-to-end against them.

use nppa_isbn::config::{
    CollectorConfig, Config, FetcherConfig, NotificationConfig, SchemeKind, SourceConfig,
    StorageConfig, UserAgentConfig,
};
use nppa_isbn::crawler::{collect, CollectMode};
use nppa_isbn::storage::{persist, JsonStorage, MemoryBaseline, RecheckPolicy, SqliteStorage};
use nppa_isbn::url::Listing;
use nppa_isbn::{Channel, IsbnError, StubOutcome};
use std::collections::BTreeMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECTION: &str = "/bsfw/jggs/yxspjg/";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, channels: Vec<Channel>) -> Config {
    Config {
        fetcher: FetcherConfig {
            max_attempts: 2,
            retry_delay_ms: 1,
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        source: SourceConfig {
            scheme: SchemeKind::Section,
            base_url: format!("{}{}", server.uri(), SECTION),
            channel_ids: BTreeMap::new(),
        },
        collector: CollectorConfig {
            channels,
            incremental_pages: 3,
            full_pages: 5,
        },
        storage: StorageConfig::default(),
        notification: NotificationConfig::default(),
    }
}

fn listing_path(channel: Channel, page: u32) -> String {
    if page == 0 {
        format!("{}{}/index.html", SECTION, channel.code())
    } else {
        format!("{}{}/index_{}.html", SECTION, channel.code(), page)
    }
}

/// Listing page with `(href, title, date)` entries
fn listing_html(entries: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body><ul>");
    for (href, title, date) in entries {
        html.push_str(&format!(
            r#"<li><div class="ellipsis"><a href="{}">{}</a></div><span>[{}]</span></li>"#,
            href, title, date
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

fn not_found_html() -> String {
    r#"<html><body>
    <div class="g-font-size-140 g-font-size-100--2xs g-line-height-1 g-mb-10">404</div>
    </body></html>"#
        .to_string()
}

/// Detail page with a header row and the given data rows
fn detail_html(rows: &[Vec<&str>]) -> String {
    let mut html = String::from(
        r#"<html><body><table class="tableOrder"><tr><td>序号</td><td>名称</td></tr>"#,
    );
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table></body></html>");
    html
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// One electronic game bulletin on page 0, sentinel on page 1
async fn mount_electronic_channel(server: &MockServer, approval_number: &str) {
    mount_page(
        server,
        &listing_path(Channel::ImportElectronicGame, 0),
        200,
        listing_html(&[(
            "./202401/t20240110_1.html",
            "2024年1月进口电子游戏审批信息",
            "2024-01-10",
        )]),
    )
    .await;
    mount_page(
        server,
        &listing_path(Channel::ImportElectronicGame, 1),
        200,
        not_found_html(),
    )
    .await;
    mount_page(
        server,
        &format!("{}jkdzyxspxx/202401/t20240110_1.html", SECTION),
        200,
        detail_html(&[
            vec!["1", "Game X", "PubCo", approval_number, "2024-01-10"],
            vec!["2", "Game Y", "PubCo", "GA00002", "2024-01-10"],
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_sentinel_ends_channel_without_failure() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;

    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .expect("collection should succeed");

    assert!(report.is_clean());
    assert_eq!(report.stats.pages_walked(), 1);
    assert_eq!(report.reported.len(), 1);

    let content = &report.reported[0];
    assert_eq!(content.channel, Channel::ImportElectronicGame);
    assert_eq!(content.id, "t20240110_1");
    assert_eq!(content.url, "jkdzyxspxx/202401/t20240110_1.html");
    assert_eq!(content.items.len(), 2);
    assert_eq!(content.items[0].approval_number, "GA00001");
    assert_eq!(content.items[1].publisher.as_deref(), Some("PubCo"));
    assert_eq!(content.items[0].isbn, None);
}

#[tokio::test]
async fn test_aggregate_listing_keeps_configured_channels() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;
    mount_page(
        &server,
        &format!("{}index.html", SECTION),
        200,
        listing_html(&[
            (
                "./yxspbgxx/202402/t20240201_2.html",
                "2024年2月游戏审批变更信息",
                "2024-02-01",
            ),
            (
                "./jkdzyxspxx/202401/t20240110_1.html",
                "2024年1月进口电子游戏审批信息",
                "2024-01-10",
            ),
        ]),
    )
    .await;
    mount_page(
        &server,
        &format!("{}index_1.html", SECTION),
        200,
        not_found_html(),
    )
    .await;

    let mut config = create_test_config(&server, vec![Channel::ImportElectronicGame]);
    config.source.scheme = SchemeKind::Aggregate;
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    // The changed-game detail page is not mounted; it must never be fetched
    assert!(report.is_clean());
    assert_eq!(report.stats.pages_walked(), 1);
    assert_eq!(report.stats.stubs_seen(), 1);
    assert_eq!(report.reported.len(), 1);
    assert_eq!(report.reported[0].channel, Channel::ImportElectronicGame);
    assert_eq!(report.reported[0].url, "jkdzyxspxx/202401/t20240110_1.html");
}

#[tokio::test]
async fn test_aggregate_listing_failure_is_recorded_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        &format!("{}index.html", SECTION),
        500,
        "server error".to_string(),
    )
    .await;

    let mut config = create_test_config(&server, Channel::ALL.to_vec());
    config.source.scheme = SchemeKind::Aggregate;
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].listing, Listing::Aggregate);
    assert!(report.reported.is_empty());
}

#[tokio::test]
async fn test_http_404_listing_ends_channel() {
    let server = MockServer::start().await;
    // Page 0 of the changed channel is not mounted, so the server answers 404
    mount_electronic_channel(&server, "GA00001").await;

    let config = create_test_config(
        &server,
        vec![Channel::GameChanged, Channel::ImportElectronicGame],
    );
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.reported.len(), 1);
}

#[tokio::test]
async fn test_second_run_with_absorbed_baseline_reports_nothing() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;
    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);

    let mut baseline = MemoryBaseline::new();
    let first = collect(&config, CollectMode::Incremental, &baseline)
        .await
        .unwrap();
    assert_eq!(first.reported.len(), 1);
    baseline.absorb(&first.reported);

    let second = collect(&config, CollectMode::Incremental, &baseline)
        .await
        .unwrap();
    assert!(second.reported.is_empty());
    assert_eq!(second.stats.count(StubOutcome::Skipped), 1);
    assert_eq!(second.stats.hydrated(), 0);
}

#[tokio::test]
async fn test_second_run_with_sqlite_store_reports_nothing() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;
    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let first = collect(&config, CollectMode::Incremental, &storage)
        .await
        .unwrap();
    persist(&mut storage, &first.reported).unwrap();
    assert!(storage
        .has_item(Channel::ImportElectronicGame, "t20240110_1", "2")
        .unwrap());

    let second = collect(&config, CollectMode::Incremental, &storage)
        .await
        .unwrap();
    assert!(second.reported.is_empty());
}

#[tokio::test]
async fn test_json_store_detects_changed_rows() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;
    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);

    let dir = tempfile::tempdir().unwrap();
    let policy = RecheckPolicy {
        enabled: true,
        year: 2024,
        frozen: vec![],
    };
    let mut storage = JsonStorage::new(dir.path(), policy).unwrap();

    let first = collect(&config, CollectMode::Incremental, &storage)
        .await
        .unwrap();
    assert_eq!(first.reported.len(), 1);
    persist(&mut storage, &first.reported).unwrap();

    // Same rows: re-hydrated because the title names the re-check year
    let second = collect(&config, CollectMode::Incremental, &storage)
        .await
        .unwrap();
    assert!(second.reported.is_empty());
    assert_eq!(second.stats.count(StubOutcome::Unchanged), 1);

    // One field differs: reported as changed
    server.reset().await;
    mount_electronic_channel(&server, "GA99999").await;
    let third = collect(&config, CollectMode::Incremental, &storage)
        .await
        .unwrap();
    assert_eq!(third.reported.len(), 1);
    assert_eq!(third.reported[0].items[0].approval_number, "GA99999");
}

#[tokio::test]
async fn test_empty_table_is_dropped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        &listing_path(Channel::ImportElectronicGame, 0),
        200,
        listing_html(&[("./202403/t20240301_9.html", "2024年3月进口电子游戏审批信息", "2024-03-01")]),
    )
    .await;
    mount_page(
        &server,
        &format!("{}jkdzyxspxx/202403/t20240301_9.html", SECTION),
        200,
        detail_html(&[]),
    )
    .await;

    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert!(report.is_clean());
    assert!(report.reported.is_empty());
    assert_eq!(report.stats.count(StubOutcome::EmptyDropped), 1);
}

#[tokio::test]
async fn test_duplicate_entry_in_run_is_skipped() {
    let server = MockServer::start().await;
    // Page 1 repeats the entry of page 0, as when the listing shifts while paging
    mount_page(
        &server,
        &listing_path(Channel::ImportElectronicGame, 0),
        200,
        listing_html(&[("./202401/t20240110_1.html", "2024年1月进口电子游戏审批信息", "2024-01-10")]),
    )
    .await;
    mount_page(
        &server,
        &listing_path(Channel::ImportElectronicGame, 1),
        200,
        listing_html(&[("./202401/t20240110_1.html", "2024年1月进口电子游戏审批信息", "2024-01-10")]),
    )
    .await;
    mount_page(
        &server,
        &format!("{}jkdzyxspxx/202401/t20240110_1.html", SECTION),
        200,
        detail_html(&[vec!["1", "Game X", "PubCo", "GA00001", "2024-01-10"]]),
    )
    .await;

    let config = create_test_config(&server, vec![Channel::ImportElectronicGame]);
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert_eq!(report.reported.len(), 1);
    assert_eq!(report.stats.pages_walked(), 2);
    assert_eq!(report.stats.count(StubOutcome::Skipped), 1);
}

#[tokio::test]
async fn test_page_error_keeps_earlier_channels() {
    let server = MockServer::start().await;
    mount_electronic_channel(&server, "GA00001").await;
    mount_page(
        &server,
        &listing_path(Channel::GameChanged, 0),
        500,
        "server error".to_string(),
    )
    .await;

    let config = create_test_config(
        &server,
        vec![Channel::ImportElectronicGame, Channel::GameChanged],
    );
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert_eq!(report.reported.len(), 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.listing, Listing::Channel(Channel::GameChanged));
    assert_eq!(failure.page, 0);
    assert!(failure.content_id.is_none());
    assert!(matches!(failure.error, IsbnError::Fetch(_)));
}

/// Listing with one changed-game bulletin whose only row is one cell short
async fn mount_broken_changed_channel(server: &MockServer) {
    mount_page(
        server,
        &listing_path(Channel::GameChanged, 0),
        200,
        listing_html(&[("./202402/t20240201_2.html", "2024年2月游戏审批变更信息", "2024-02-01")]),
    )
    .await;
    mount_page(
        server,
        &format!("{}yxspbgxx/202402/t20240201_2.html", SECTION),
        200,
        detail_html(&[vec!["1", "Game Z", "移动", "Pub", "Op", "更名", "GA3"]]),
    )
    .await;
}

#[tokio::test]
async fn test_incremental_mode_records_content_error() {
    let server = MockServer::start().await;
    mount_broken_changed_channel(&server).await;
    mount_electronic_channel(&server, "GA00001").await;

    let config = create_test_config(
        &server,
        vec![Channel::GameChanged, Channel::ImportElectronicGame],
    );
    let report = collect(&config, CollectMode::Incremental, &MemoryBaseline::new())
        .await
        .unwrap();

    assert_eq!(report.reported.len(), 1);
    assert_eq!(report.stats.count(StubOutcome::Failed), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.content_id.as_deref(), Some("t20240201_2"));
    assert!(matches!(failure.error, IsbnError::Extract { .. }));
}

#[tokio::test]
async fn test_full_mode_aborts_on_content_error() {
    let server = MockServer::start().await;
    mount_broken_changed_channel(&server).await;

    let config = create_test_config(&server, vec![Channel::GameChanged]);
    let result = collect(&config, CollectMode::Full, &MemoryBaseline::new()).await;

    match result {
        Err(IsbnError::Extract {
            channel,
            content_id,
            ..
        }) => {
            assert_eq!(channel, Channel::GameChanged);
            assert_eq!(content_id, "t20240201_2");
        }
        other => panic!("expected extraction error, got {:?}", other.map(|r| r.reported)),
    }
}
