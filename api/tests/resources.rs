//! Resource facades: routes, query strings, bodies and response shapes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use newsdesk_api::resources::campaigns::CampaignStatus;
use newsdesk_api::resources::news::{NewsFilter, NewsStatus};
use newsdesk_api::resources::placements::PlacementUpdate;
use newsdesk_api::resources::public::PublicNewsQuery;
use newsdesk_api::{AuthenticatedHttpClient, ClientConfig, PageRequest};
use newsdesk_testing::{MockBackend, fixtures, signed_in_session};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn signed_in(backend: &MockBackend) -> AuthenticatedHttpClient {
    backend.accept_token("T1");
    let (session, _store) = signed_in_session("T1", "R1");
    AuthenticatedHttpClient::new(ClientConfig::new(backend.uri()), session).unwrap()
}

#[tokio::test]
async fn test_users_list_keeps_pagination_totals() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/auth/get-all-users"))
        .and(query_param("page", "1"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::paged_envelope(
            json!([fixtures::user(3, "jane", "EDITOR"), fixtures::user(4, "omar", "ADMIN")]),
            4,
            2,
        )))
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let page = client.users().list(PageRequest::new(1, 2)).await.unwrap();

    assert_eq!(page.elements, Some(4));
    assert_eq!(page.pages, Some(2));
    let users = page.data.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].summary().role, newsdesk_auth::Role::Editor);
}

#[tokio::test]
async fn test_news_list_sends_filter_as_query() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/news"))
        .and(query_param("status", "PUBLISHED"))
        .and(query_param("categoryId", "2"))
        .and(query_param("lang", "uz"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::page(vec![fixtures::news(9, "Derby", "PUBLISHED")], 1)),
        )
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let filter = NewsFilter {
        status: Some(NewsStatus::Published),
        category_id: Some(2),
        lang: Some("uz".to_string()),
        ..NewsFilter::default()
    };
    let page = client.news().list(&filter, PageRequest::default()).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, 9);
    assert_eq!(page.content[0].status, Some(NewsStatus::Published));
    assert_eq!(page.content[0].translations["uz"].title, "Derby");
    let query = backend.requests_to("/admin/news").await[0].url.query().unwrap().to_string();
    assert!(!query.contains("authorId"), "unset filters are omitted: {query}");
}

#[tokio::test]
async fn test_news_status_change_body() {
    let backend = MockBackend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/news/9/status"))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({"status": "ARCHIVED"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::news(9, "Derby", "ARCHIVED")),
        )
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let news = client.news().update_status(9, NewsStatus::Archived).await.unwrap();

    assert_eq!(news.status, Some(NewsStatus::Archived));
}

#[tokio::test]
async fn test_deletes_accept_empty_and_message_bodies() {
    let backend = MockBackend::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/tags/4"))
        .respond_with(ResponseTemplate::new(204))
        .mount(backend.server())
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/ads/campaigns/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Campaign deleted", "status": "OK"})),
        )
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    client.tags().delete(4).await.unwrap();
    client.campaigns().delete(3).await.unwrap();
}

#[tokio::test]
async fn test_campaign_status_change() {
    let backend = MockBackend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/ads/campaigns/3/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::envelope(
            fixtures::campaign(3, "Spring sale", "PAUSED"),
        )))
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let campaign = client
        .campaigns()
        .update_status(3, CampaignStatus::Paused)
        .await
        .unwrap();

    assert_eq!(campaign.status, Some(CampaignStatus::Paused));
    let received = backend.requests_to("/admin/ads/campaigns/3/status").await;
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body, json!({"status": "PAUSED"}));
}

#[tokio::test]
async fn test_placement_update_is_partial_patch() {
    let backend = MockBackend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/ads/placements/1"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::envelope(json!({
            "id": 1,
            "code": "home-top",
            "title": "Home top banner",
            "isActive": false
        }))))
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let update = PlacementUpdate {
        is_active: Some(false),
        ..PlacementUpdate::default()
    };
    let placement = client.placements().update(1, &update).await.unwrap();

    assert_eq!(placement.code, "home-top");
    assert_eq!(placement.is_active, Some(false));
}

#[tokio::test]
async fn test_categories_read_translation_list() {
    let backend = MockBackend::start().await;
    backend
        .mount_protected(
            "GET",
            "/admin/categories/get-all",
            fixtures::envelope(json!([{
                "id": 2,
                "isActive": true,
                "translationsDtoList": [
                    {"lang": "uz", "title": "Sport", "slug": "sport"},
                    {"lang": "ru", "title": "Спорт", "slug": "sport-ru"}
                ]
            }])),
        )
        .await;
    let client = signed_in(&backend).await;

    let categories = client.categories().list().await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].translations.len(), 2);
    assert_eq!(categories[0].translations[1].lang, "ru");
}

#[tokio::test]
async fn test_media_upload_is_multipart_and_replayed_after_refresh() {
    let backend = MockBackend::start().await;
    backend.mount_refresh("R1", "T2", "R2").await;
    backend
        .mount_protected(
            "POST",
            "/admin/media",
            json!({
                "id": 11,
                "url": "https://cdn.example.com/logo.png",
                "mimeType": "image/png",
                "size": 4
            }),
        )
        .await;
    let (session, _store) = signed_in_session("T1", "R1");
    let client = AuthenticatedHttpClient::new(ClientConfig::new(backend.uri()), session).unwrap();

    let media = client
        .media()
        .upload("logo.png", Some("image/png"), vec![0x89, b'P', b'N', b'G'])
        .await
        .unwrap();

    assert_eq!(media.id, 11);
    let received = backend.requests_to("/admin/media").await;
    assert_eq!(received.len(), 2);
    for request in &received {
        let content_type = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"logo.png\""));
    }
    assert_eq!(
        backend.bearer_tokens_to("/admin/media").await,
        vec![Some("T1".to_string()), Some("T2".to_string())]
    );
}

#[tokio::test]
async fn test_public_news_feed_envelope() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/public/news"))
        .and(query_param("lang", "uz"))
        .and(query_param("tag", "sport"))
        .and(query_param("from", "2025-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::paged_envelope(
            json!([fixtures::public_news(1, "derby"), fixtures::public_news(2, "final")]),
            12,
            6,
        )))
        .mount(backend.server())
        .await;
    let (session, _store) = newsdesk_testing::anonymous_session();
    let client = AuthenticatedHttpClient::new(ClientConfig::new(backend.uri()), session).unwrap();

    let query = PublicNewsQuery {
        tag: Some("sport".to_string()),
        from: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
        page: PageRequest::new(0, 2),
        ..PublicNewsQuery::default()
    };
    let feed = client.public().news(&query).await.unwrap();

    assert_eq!(feed.elements, Some(12));
    assert_eq!(feed.pages, Some(6));
    let items = feed.data.unwrap();
    assert_eq!(items[1].slug.as_deref(), Some("final"));
}

#[tokio::test]
async fn test_ad_for_placement_passes_filters() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/public/ads/home-top"))
        .and(query_param("lang", "ru"))
        .and(query_param("categoryId", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::envelope(fixtures::assignment(5, "home-top"))),
        )
        .mount(backend.server())
        .await;
    Mock::given(method("GET"))
        .and(path("/public/ads/sidebar"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(fixtures::error("No active ad for placement")),
        )
        .mount(backend.server())
        .await;
    let (session, _store) = newsdesk_testing::anonymous_session();
    let client = AuthenticatedHttpClient::new(ClientConfig::new(backend.uri()), session).unwrap();

    let ad = client
        .public()
        .ad_for_placement("home-top", "ru", Some(2))
        .await
        .unwrap();
    assert_eq!(ad.id, 5);
    assert_eq!(ad.placement_code.as_deref(), Some("home-top"));

    let missing = client
        .public()
        .ad_for_placement("sidebar", "uz", None)
        .await
        .unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn test_missing_envelope_data_is_a_parse_error() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/ads/creatives/8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "ok", "status": "OK"})),
        )
        .mount(backend.server())
        .await;
    let client = signed_in(&backend).await;

    let err = client.creatives().get(8).await.unwrap_err();

    assert!(matches!(err, newsdesk_api::ApiError::ResponseParseFailed(_)));
}
