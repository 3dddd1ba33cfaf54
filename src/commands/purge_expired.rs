use chrono::Utc;
use tracing::info;

use crate::App;

/// Delete every paste past its expiration instant. The web read path only
/// deletes lazily, so this is the operator's broom.
pub async fn run(app: App) -> anyhow::Result<()> {
    let pastes = app.database.get_all_pastes().await?;

    let now = Utc::now();

    let mut count = 0;
    for paste in pastes {
        if paste.is_expired(now) {
            info!("deleting expired paste: {}", paste.id);
            app.database.delete_paste(&paste.id).await?;
            count += 1;
        }
    }

    info!("deleted {count} expired pastes");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;

    #[tokio::test]
    async fn test_purge_deletes_only_expired_pastes() {
        let database = Database::open_in_memory().await.unwrap();
        database
            .insert_paste("live0001", "Untitled", "keep me", None)
            .await
            .unwrap();
        database
            .insert_paste("live0002", "Untitled", "keep me too", Some(60))
            .await
            .unwrap();
        database
            .insert_paste("dead0001", "Untitled", "drop me", Some(1))
            .await
            .unwrap();
        database.backdate("dead0001", 2).await.unwrap();

        let app = App {
            config: Config::default(),
            database: database.clone(),
        };
        run(app).await.unwrap();

        assert!(database.get_paste("live0001").await.unwrap().is_some());
        assert!(database.get_paste("live0002").await.unwrap().is_some());
        assert!(database.get_paste("dead0001").await.unwrap().is_none());
    }
}
