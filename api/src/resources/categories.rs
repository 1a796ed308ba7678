//! Categories.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One language version of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTranslation {
    /// Translation id.
    pub id: Option<i64>,
    /// Language code.
    pub lang: String,
    /// Display title.
    pub title: String,
    /// URL slug.
    pub slug: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Category with all its translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    /// Category id.
    pub id: i64,
    /// Parent category, for nested categories.
    pub parent_id: Option<i64>,
    /// Translations.
    #[serde(default, rename = "translationsDtoList")]
    pub translations: Vec<CategoryTranslation>,
    /// `false` when hidden.
    pub is_active: Option<bool>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

/// Category resolved to one language, with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithLang {
    /// Category id.
    pub id: i64,
    /// Parent category.
    pub parent_id: Option<i64>,
    /// `false` when hidden.
    pub is_active: Option<bool>,
    /// Language code.
    pub lang: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Child categories.
    #[serde(default)]
    pub children: Vec<CategoryWithLang>,
}

/// Translation part of [`CategoryInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTranslationInput {
    /// Language code ("uz", "ru", "en").
    pub lang: String,
    /// Display title.
    pub title: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `create` and `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Parent category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Translations.
    #[serde(rename = "translationsDtoList")]
    pub translations: Vec<CategoryTranslationInput>,
}

facade! {
    /// Categories.
    CategoriesApi
}

impl CategoriesApi<'_> {
    /// All categories with every translation.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self) -> Result<Vec<CategoryDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/categories/get-all",
                Access::Protected,
            ))
            .await
    }

    /// Category tree in one language.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list_by_lang(&self, lang: &str) -> Result<Vec<CategoryWithLang>> {
        let request = ApiRequest::new(
            HttpMethod::Get,
            "/admin/categories/get-all-by-lang",
            Access::Protected,
        )
        .query("lang", lang);
        self.client.data(request).await
    }

    /// One category.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<CategoryDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/categories/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// One category in one language.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get_by_lang(&self, id: i64, lang: &str) -> Result<CategoryWithLang> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/categories/{id}/lang/{lang}"),
                Access::Protected,
            ))
            .await
    }

    /// Look a category up by slug.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get_by_slug(&self, slug: &str, lang: &str) -> Result<CategoryWithLang> {
        let request = ApiRequest::new(
            HttpMethod::Get,
            format!("/admin/categories/slug/{slug}"),
            Access::Protected,
        )
        .query("lang", lang);
        self.client.data(request).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, category: &CategoryInput) -> Result<CategoryDto> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/categories/add", Access::Protected)
            .json(category)?;
        self.client.data(request).await
    }

    /// Replace a category's parent and translations.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, category: &CategoryInput) -> Result<CategoryDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/categories/{id}"),
            Access::Protected,
        )
        .json(category)?;
        self.client.data(request).await
    }

    /// Flip a category between active and hidden.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn toggle_status(&self, id: i64) -> Result<CategoryDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Patch,
                format!("/admin/categories/{id}/toggle-status"),
                Access::Protected,
            ))
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/categories/{id}"),
                Access::Protected,
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_translations_field_name() {
        let category: CategoryDto = serde_json::from_str(
            r#"{"id":4,"parentId":null,"isActive":true,
                "translationsDtoList":[{"id":9,"lang":"ru","title":"Спорт","slug":"sport"}]}"#,
        )
        .unwrap();
        assert_eq!(category.translations.len(), 1);
        assert_eq!(category.translations[0].lang, "ru");

        let input = CategoryInput {
            parent_id: None,
            translations: vec![CategoryTranslationInput {
                lang: "uz".to_string(),
                title: "Sport".to_string(),
                description: None,
            }],
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"translationsDtoList": [{"lang": "uz", "title": "Sport"}]})
        );
    }
}
