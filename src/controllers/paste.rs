use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, Database};
use crate::models::{Paste, PasteSummary};
use crate::types::api::CreatePaste;
use crate::{ApiError, ApiResult};

/// How many pastes the front page lists.
pub const RECENT_LIMIT: i64 = 10;

pub async fn create(db: &Database, body: CreatePaste) -> ApiResult<Paste> {
    let id = generate_id();
    let title = match body.title {
        Some(title) if !title.is_empty() => title,
        _ => "Untitled".to_string(),
    };
    // empty or malformed expiry means the paste never expires
    let expires_in = body
        .expires_in
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok());

    info!(
        "new paste: id='{id}', title='{title}', size={size}",
        size = body.content.len()
    );

    let paste = db.insert_paste(&id, &title, &body.content, expires_in).await?;
    Ok(paste)
}

/// Look up a paste for its detail page, counting the view.
///
/// An expired paste is deleted on the spot and reported as absent; the whole
/// check-delete-count sequence runs in one transaction so a paste cannot
/// expire between the liveness check and the increment.
pub async fn view(db: &Database, id: &str) -> ApiResult<Paste> {
    let mut tx = db.begin().await?;

    let Some(paste) = db::fetch_paste(&mut tx, id).await? else {
        return Err(ApiError::NotFound);
    };

    if paste.is_expired(Utc::now()) {
        db::delete_paste(&mut tx, id).await?;
        tx.commit().await?;
        info!("deleted expired paste: {id}");
        return Err(ApiError::NotFound);
    }

    db::bump_views(&mut tx, id).await?;
    let paste = db::fetch_paste(&mut tx, id).await?.ok_or(ApiError::NotFound)?;
    tx.commit().await?;

    Ok(paste)
}

/// Bare content lookup for the raw endpoint. Does not count a view and does
/// not enforce expiry.
pub async fn raw(db: &Database, id: &str) -> ApiResult<String> {
    db.get_content(id).await?.ok_or(ApiError::NotFound)
}

pub async fn list_recent(db: &Database) -> ApiResult<Vec<PasteSummary>> {
    Ok(db.recent_pastes(RECENT_LIMIT).await?)
}

/// First 8 hex characters of a random UUID.
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(title: Option<&str>, content: &str, expires_in: Option<&str>) -> CreatePaste {
        CreatePaste {
            title: title.map(str::to_string),
            content: content.to_string(),
            expires_in: expires_in.map(str::to_string),
        }
    }

    #[test]
    fn test_generated_ids_are_short_hex() {
        let id = generate_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_id());
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(None, "hello", None)).await.unwrap();

        assert_eq!(paste.title, "Untitled");
        assert_eq!(paste.expires_in, None);
        assert_eq!(paste.views(), 0);
    }

    #[tokio::test]
    async fn test_create_treats_blank_title_as_missing() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(Some(""), "hello", None)).await.unwrap();
        assert_eq!(paste.title, "Untitled");
    }

    #[tokio::test]
    async fn test_create_normalizes_bad_expiry() {
        let db = Database::open_in_memory().await.unwrap();
        for raw in ["", "soon", "1.5"] {
            let paste = create(&db, body(None, "hello", Some(raw))).await.unwrap();
            assert_eq!(paste.expires_in, None, "expiry {raw:?} should be dropped");
        }

        let paste = create(&db, body(None, "hello", Some("90"))).await.unwrap();
        assert_eq!(paste.expires_in, Some(90));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        let created = create(&db, body(Some("T"), "C", Some(""))).await.unwrap();

        let viewed = view(&db, &created.id).await.unwrap();
        assert_eq!(viewed.title, "T");
        assert_eq!(viewed.content, "C");
        assert_eq!(viewed.expires_in, None);
    }

    #[tokio::test]
    async fn test_view_increments_by_one_each_time() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(None, "hello", None)).await.unwrap();

        for expected in 1..=3 {
            let viewed = view(&db, &paste.id).await.unwrap();
            assert_eq!(viewed.views(), expected);
        }
    }

    #[tokio::test]
    async fn test_view_of_unknown_id_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(matches!(view(&db, "deadbeef").await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_expired_view_deletes_the_row() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(None, "hello", Some("1"))).await.unwrap();
        db.backdate(&paste.id, 2).await.unwrap();

        assert!(matches!(view(&db, &paste.id).await, Err(ApiError::NotFound)));
        // the row is gone, so absence is idempotent
        assert!(db.get_paste(&paste.id).await.unwrap().is_none());
        assert!(matches!(view(&db, &paste.id).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_expired_view_is_never_counted() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(None, "hello", Some("1"))).await.unwrap();
        db.backdate(&paste.id, 2).await.unwrap();

        let _ = view(&db, &paste.id).await;
        assert!(db.get_paste(&paste.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_raw_skips_expiry_and_views() {
        let db = Database::open_in_memory().await.unwrap();
        let paste = create(&db, body(None, "hello", Some("1"))).await.unwrap();
        db.backdate(&paste.id, 2).await.unwrap();

        // expired but not yet lazily deleted: raw still serves it
        assert_eq!(raw(&db, &paste.id).await.unwrap(), "hello");
        let stored = db.get_paste(&paste.id).await.unwrap().unwrap();
        assert_eq!(stored.views(), 0);
    }

    #[tokio::test]
    async fn test_raw_of_unknown_id_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(matches!(raw(&db, "deadbeef").await, Err(ApiError::NotFound)));
    }
}
