//! JSON bodies in the backend's wire shapes.

use serde_json::{Value, json};

/// Bare token response of `login` and `refresh`.
#[must_use]
pub fn jwt_response(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "accessTokenExpireDate": "2030-01-01T00:15:00.000+00:00",
        "refreshTokenExpireDate": "2030-01-08T00:00:00.000+00:00"
    })
}

/// Success envelope around `data`.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({
        "message": "Success",
        "status": "OK",
        "data": data
    })
}

/// Success envelope with pagination totals.
#[must_use]
pub fn paged_envelope(data: Value, elements: i64, pages: i64) -> Value {
    json!({
        "status": "OK",
        "data": data,
        "elements": elements,
        "pages": pages
    })
}

/// Bare Spring page.
#[must_use]
pub fn page(content: Vec<Value>, total: i64) -> Value {
    let size = i64::try_from(content.len()).unwrap_or(i64::MAX).max(1);
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": (total + size - 1) / size,
        "number": 0,
        "size": size,
        "sort": {"sorted": false}
    })
}

/// Error body returned with non-2xx statuses.
#[must_use]
pub fn error(message: &str) -> Value {
    json!({ "message": message })
}

/// A tag.
#[must_use]
pub fn tag(id: i64, code: &str) -> Value {
    json!({
        "id": id,
        "code": code,
        "isActive": true,
        "createdAt": "2025-01-10T09:30:00"
    })
}

/// An operator account.
#[must_use]
pub fn user(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": "Test Operator",
        "username": username,
        "email": format!("{username}@newsdesk.test"),
        "roleNames": [role],
        "roleIds": [1],
        "isActive": true
    })
}

/// A campaign.
#[must_use]
pub fn campaign(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "advertiser": "Acme",
        "status": status,
        "startAt": "2025-03-01T00:00:00",
        "dailyCapImpressions": 1000
    })
}

/// An admin article.
#[must_use]
pub fn news(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "authorId": 1,
        "authorName": "Test Operator",
        "categoryId": 2,
        "status": status,
        "isFeatured": false,
        "isDeleted": false,
        "translations": {
            "uz": {"id": id, "lang": "uz", "title": title, "slug": title.to_lowercase()}
        },
        "tags": ["sport"]
    })
}

/// A published article as served to the public site.
#[must_use]
pub fn public_news(id: i64, slug: &str) -> Value {
    json!({
        "id": id,
        "title": "Yangilik",
        "slug": slug,
        "summary": "Qisqacha",
        "categoryId": 2,
        "categorySlug": "sport",
        "tags": ["sport"],
        "isFeatured": true,
        "publishedAt": "2025-02-01T08:00:00"
    })
}

/// An assignment selected for a placement.
#[must_use]
pub fn assignment(id: i64, placement_code: &str) -> Value {
    json!({
        "id": id,
        "placementId": 1,
        "placementCode": placement_code,
        "campaignId": 3,
        "creativeId": 4,
        "weight": 50,
        "langFilter": ["uz"],
        "startAt": "2025-03-01T00:00:00",
        "isActive": true
    })
}
