//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_auditor::config::{AuditConfig, Config, CrawlerConfig, HttpConfig};
use site_auditor::crawler::Coordinator;
use site_auditor::output::{DetectionMethod, ThresholdCategory};
use site_auditor::{AuditError, CrawlJob, CrawlPhase};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no delays and short timeouts
fn create_test_config(use_sitemap: bool, check_links: bool, check_images: bool) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages: 50,
            page_delay_ms: 0,
            use_sitemap,
        },
        http: HttpConfig {
            page_timeout_secs: 2,
            probe_timeout_secs: 2,
            ..HttpConfig::default()
        },
        audit: AuditConfig {
            probe_delay_ms: 0,
            check_links,
            check_images,
        },
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(
            format!(
                r#"<html><head><title>{}</title></head><body>{}</body></html>"#,
                title, body
            ),
            "text/html",
        )
}

/// HEAD response declaring `size_bytes` via Content-Length
fn sized(size_bytes: usize) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(vec![0u8; size_bytes])
        .insert_header("content-length", size_bytes.to_string().as_str())
}

/// Minimal PNG signature plus IHDR chunk declaring the given size
fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[0x08, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    bytes
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            &format!(
                r#"<a href="{}/page1">Page 1</a>
                   <a href="/page2">Page 2</a>
                   <a href="{}/elsewhere">Elsewhere</a>"#,
                base_url,
                external_server.uri()
            ),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page("Page 1", r#"<p>Content 1</p><a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page("Page 2", "<p>Content 2</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The external page must never be crawled
    Mock::given(method("GET"))
        .respond_with(html_page("External", "<p>Nope</p>"))
        .expect(0)
        .mount(&external_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(true, false, false))
        .expect("Failed to create coordinator");
    let mut job = CrawlJob::new(&base_url, 10).expect("Failed to create job");
    let pages = coordinator.run(&mut job).await.expect("Crawl failed");

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].title, "Home");
    assert_eq!(pages[1].title, "Page 1");
    assert_eq!(pages[2].title, "Page 2");
    assert_eq!(pages[1].content, "Page 1 Content 1 Home");

    assert_eq!(pages[0].links.len(), 2);
    assert!(pages[0]
        .links
        .iter()
        .all(|link| link.starts_with(&base_url)));

    assert_eq!(job.phase(), CrawlPhase::Done);
    assert_eq!(job.frontier_len(), 0);
    assert_eq!(job.visited_count(), 3);
}

#[tokio::test]
async fn test_single_page_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    for page_path in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(html_page("Unreached", ""))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let coordinator = Coordinator::new(create_test_config(false, false, false))
        .expect("Failed to create coordinator");
    let mut job = CrawlJob::new(&mock_server.uri(), 1).expect("Failed to create job");
    let pages = coordinator.run(&mut job).await.expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].links.len(), 3);
    assert_eq!(job.visited_count(), 1);
    assert_eq!(job.frontier_len(), 3);
    for url in job.frontier() {
        assert!(!job.visited().contains(url));
    }
}

#[tokio::test]
async fn test_broken_link_detection() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            &format!(
                r#"<a href="/ok">Working link</a>
                   <a href="/missing">Missing link</a>
                   <a href="{}/gone">External gone</a>"#,
                external_server.uri()
            ),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    // External links are probed too
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&external_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(false, true, false))
        .expect("Failed to create coordinator");
    let pages = coordinator
        .crawl(&mock_server.uri(), 1)
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    let broken = &pages[0].broken_links;
    assert_eq!(broken.len(), 2);

    assert_eq!(broken[0].url, format!("{}/missing", mock_server.uri()));
    assert_eq!(broken[0].status_code, 404);
    assert_eq!(broken[0].link_text, "Missing link");
    assert_eq!(broken[0].found_on_page, mock_server.uri());

    assert_eq!(broken[1].status_code, 410);
    assert_eq!(broken[1].link_text, "External gone");
}

#[tokio::test]
async fn test_large_image_detection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Gallery",
            r#"<img src="/photo.jpg" alt="A photo">
               <img src="/exact.jpg">
               <img src="/large-photo.jpg">
               <img src="/photo.jpg">"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/photo.jpg"))
        .respond_with(sized(450 * 1024))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/exact.jpg"))
        .respond_with(sized(400 * 1024))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/large-photo.jpg"))
        .respond_with(sized(2100 * 1024))
        .mount(&mock_server)
        .await;

    // Small, square images: measured but never banners
    for image_path in ["/photo.jpg", "/exact.jpg"] {
        Mock::given(method("GET"))
            .and(path(image_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_header(800, 600)))
            .mount(&mock_server)
            .await;
    }

    // The size heuristic fires first, so the large image is never downloaded
    Mock::given(method("GET"))
        .and(path("/large-photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_header(800, 600)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(false, false, true))
        .expect("Failed to create coordinator");
    let pages = coordinator
        .crawl(&mock_server.uri(), 1)
        .await
        .expect("Crawl failed");

    let images = &pages[0].large_images;
    assert_eq!(images.len(), 2);

    // Sorted largest first
    let banner = &images[0];
    assert_eq!(banner.filename, "large-photo.jpg");
    assert!(banner.is_banner);
    assert_eq!(banner.detection_method, DetectionMethod::SizeHeuristic);
    assert_eq!(banner.threshold_type, ThresholdCategory::Banner);
    assert_eq!(banner.max_allowed_kb, 2048);
    assert_eq!(banner.percentage_over, 103);

    let regular = &images[1];
    assert_eq!(regular.filename, "photo.jpg");
    assert!(!regular.is_banner);
    assert_eq!(regular.detection_method, DetectionMethod::None);
    assert_eq!(regular.threshold_type, ThresholdCategory::Regular);
    assert_eq!(regular.percentage_over, 112);
    assert_eq!(regular.alt_text, "A photo");
    assert_eq!(regular.dimensions.map(|d| d.width), Some(800));
}

#[tokio::test]
async fn test_sitemap_seeding() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/</loc></url>
  <url><loc>{0}/hidden</loc></url>
  <url><loc>https://elsewhere.example/page</loc></url>
</urlset>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", "<p>No links here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html_page("Hidden", "<p>Only in the sitemap</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(true, false, false))
        .expect("Failed to create coordinator");
    let pages = coordinator.crawl(&base_url, 10).await.expect("Crawl failed");

    let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Hidden"]);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/data">Data</a><a href="/report.pdf">Report</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"links": "<a href='/never'>x</a>"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    // Links to non-page files are never followed
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(false, false, false))
        .expect("Failed to create coordinator");
    let pages = coordinator
        .crawl(&mock_server.uri(), 10)
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 2);
    let data = &pages[1];
    assert_eq!(data.status_code, 200);
    assert_eq!(data.title, "Non-HTML content: application/json");
    assert!(data.content.is_empty());
    assert_eq!(data.word_count, 0);
    assert!(data.links.is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_is_not_fatal() {
    let coordinator = Coordinator::new(create_test_config(true, true, true))
        .expect("Failed to create coordinator");
    let pages = coordinator
        .crawl("http://127.0.0.1:1/", 5)
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].status_code, 0);
    assert!(pages[0].title.starts_with("Error: "));
}

#[tokio::test]
async fn test_invalid_base_url() {
    let result = site_auditor::crawl("http://", 5).await;
    assert!(matches!(result, Err(AuditError::InvalidBaseUrl { .. })));
}
