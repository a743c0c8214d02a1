use anyhow::Result;
use cms_aggregator::{
    GlobalSiteData, HttpContentRepository, MediaResolver, PageAggregator,
};
use httpmock::prelude::*;
use serde_json::json;

const FALLBACK_LOGO: &str = "/images/logo-fallback.svg";

fn aggregator(server: &MockServer) -> PageAggregator<HttpContentRepository> {
    let repo = HttpContentRepository::new(server.base_url(), 5).unwrap();
    let media = MediaResolver::new(server.base_url(), FALLBACK_LOGO);
    PageAggregator::new(repo, media)
}

fn mock_page_shell(server: &MockServer, slug: &str) {
    let slug = slug.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/api/pages")
            .query_param("filters[slug][$eq]", slug.clone())
            .query_param("populate", "dynamicZone");
        then.status(200).json_body(json!({
            "data": [{"id": 1, "attributes": {"slug": slug, "dynamicZone": []}}]
        }));
    });
}

#[tokio::test]
async fn test_broad_global_failure_retries_with_explicit_populate() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    let broad_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/global")
            .query_param("populate", "*");
        then.status(500);
    });

    let explicit_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/global")
            .query_param("populate[navbar][populate]", "*")
            .query_param("populate[footer][populate]", "*");
        then.status(200).json_body(json!({
            "data": {
                "id": 1,
                "attributes": {"navbar": {"logo": {"url": "/uploads/nav.png"}}}
            }
        }));
    });

    let page = aggregator(&server)
        .get_page("home", None)
        .await?
        .into_page()
        .expect("page should be found");

    broad_mock.assert();
    explicit_mock.assert();
    assert!(page.navbar.is_some());
    assert_eq!(
        page.resolved_logo_urls.navbar,
        format!("{}/uploads/nav.png", server.base_url())
    );
    Ok(())
}

#[tokio::test]
async fn test_global_failure_on_both_attempts_degrades_to_empty_sections() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    let global_mock = server.mock(|when, then| {
        when.method(GET).path("/api/global");
        then.status(500);
    });

    let page = aggregator(&server)
        .get_page("home", None)
        .await?
        .into_page()
        .expect("global failure must not sink the page");

    // Broad attempt plus exactly one retry.
    global_mock.assert_hits(2);
    assert!(page.navbar.is_none());
    assert!(page.footer.is_none());
    assert!(page.contact.is_none());
    assert!(page.seo.is_none());
    Ok(())
}

#[tokio::test]
async fn test_bare_numeric_logo_id_is_fetched_and_resolved() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/global")
            .query_param("populate", "*");
        then.status(200).json_body(json!({
            "data": {"id": 1, "attributes": {"navbar": {"logo": 42}}}
        }));
    });

    let media_mock = server.mock(|when, then| {
        when.method(GET).path("/api/upload/files/42");
        then.status(200).json_body(json!({"url": "/uploads/a.png"}));
    });

    let page = aggregator(&server)
        .get_page("home", None)
        .await?
        .into_page()
        .expect("page should be found");

    media_mock.assert();
    assert_eq!(
        page.resolved_logo_urls.navbar,
        format!("{}/uploads/a.png", server.base_url())
    );
    // The fetched media object is spliced into the navbar itself.
    assert_eq!(
        page.navbar.as_ref().unwrap().get("logo").unwrap(),
        &json!({"url": "/uploads/a.png"})
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_media_lookup_degrades_to_fallback() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/global")
            .query_param("populate", "*");
        then.status(200).json_body(json!({
            "data": {"id": 1, "attributes": {"navbar": {"logo": 42}}}
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/upload/files/42");
        then.status(500);
    });

    let page = aggregator(&server)
        .get_page("home", None)
        .await?
        .into_page()
        .expect("page should be found");

    // The id stays unresolved and every slot ends at the fallback.
    assert_eq!(page.resolved_logo_urls.navbar, FALLBACK_LOGO);
    assert_eq!(page.navbar.as_ref().unwrap().get("logo").unwrap(), &json!(42));
    Ok(())
}

#[tokio::test]
async fn test_all_null_logo_candidates_use_fallback_everywhere() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/global")
            .query_param("populate", "*");
        then.status(200).json_body(json!({
            "data": {
                "id": 1,
                "attributes": {
                    "navbar": {"links": []},
                    "footer": {"text": "© Example"}
                }
            }
        }));
    });

    let page = aggregator(&server)
        .get_page("home", None)
        .await?
        .into_page()
        .expect("page should be found");

    assert_eq!(page.resolved_logo_urls.navbar, FALLBACK_LOGO);
    assert_eq!(page.resolved_logo_urls.footer, FALLBACK_LOGO);
    assert_eq!(page.resolved_logo_urls.page, FALLBACK_LOGO);
    Ok(())
}

#[tokio::test]
async fn test_caller_supplied_global_data_skips_fetch() -> Result<()> {
    let server = MockServer::start();
    mock_page_shell(&server, "home");

    let global_mock = server.mock(|when, then| {
        when.method(GET).path("/api/global");
        then.status(200).json_body(json!({"data": {"id": 1, "attributes": {}}}));
    });

    let cached = GlobalSiteData {
        navbar: Some(json!({"logo": {"url": "/uploads/cached.png"}})),
        footer: None,
        contact: None,
        seo: Some(json!({"metaTitle": "Cached"})),
    };

    let page = aggregator(&server)
        .get_page("home", Some(cached))
        .await?
        .into_page()
        .expect("page should be found");

    global_mock.assert_hits(0);
    assert_eq!(page.seo.as_ref().unwrap().get("metaTitle").unwrap(), "Cached");
    assert_eq!(
        page.resolved_logo_urls.navbar,
        format!("{}/uploads/cached.png", server.base_url())
    );

    println!("✅ Cached global data reused without a refetch");
    Ok(())
}
