//! Redis item store
//!
//! Layout: `item_id_counter` holds the last allocated id, `items` is the
//! membership set of live ids, and each record lives in an `item:{id}` hash
//! with `name` and `description` fields.
//!
//! Create and delete are multi-command sequences without a transaction. A
//! crash between commands can leave a record without membership or the
//! reverse; the record hash is the source of truth, and `list` skips set
//! members whose hash is gone.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use shelf_types::Item;
use std::collections::HashMap;

use super::ItemStore;

const COUNTER_KEY: &str = "item_id_counter";
const MEMBERS_KEY: &str = "items";

pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::info!("Connecting to Redis...");

        let client = redis::Client::open(url).context("Invalid Redis URL")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        let store = Self { conn };
        store.init().await.context("Failed to initialize Redis store")?;

        tracing::info!("Redis connection established");
        Ok(store)
    }

    /// Seeds the id counter so a fresh database starts allocating at 1.
    async fn init(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: bool = conn.set_nx(COUNTER_KEY, 0).await?;
        Ok(())
    }

    fn item_key(id: i64) -> String {
        format!("item:{id}")
    }
}

fn item_from_hash(id: i64, mut fields: HashMap<String, String>) -> Item {
    Item {
        id,
        name: fields.remove("name").unwrap_or_default(),
        description: fields.remove("description").unwrap_or_default(),
    }
}

#[async_trait]
impl ItemStore for RedisStore {
    async fn list(&self) -> Result<Vec<Item>> {
        let mut conn = self.conn.clone();

        let ids: Vec<i64> = conn.smembers(MEMBERS_KEY).await?;
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let fields: HashMap<String, String> = conn.hgetall(Self::item_key(id)).await?;
            // A member without a record is a torn create/delete; skip it.
            if !fields.is_empty() {
                items.push(item_from_hash(id, fields));
            }
        }

        Ok(items)
    }

    async fn get(&self, id: i64) -> Result<Option<Item>> {
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = conn.hgetall(Self::item_key(id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(item_from_hash(id, fields)))
    }

    async fn insert(&self, name: &str, description: &str) -> Result<Item> {
        let mut conn = self.conn.clone();

        let id: i64 = conn.incr(COUNTER_KEY, 1).await?;
        let key = Self::item_key(id);
        let _: () = conn
            .hset_multiple(&key, &[("name", name), ("description", description)])
            .await?;
        let _: () = conn.sadd(MEMBERS_KEY, id).await?;

        Ok(Item {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    async fn update(&self, id: i64, name: &str, description: &str) -> Result<bool> {
        let mut conn = self.conn.clone();

        let key = Self::item_key(id);
        let exists: bool = conn.exists(&key).await?;
        if !exists {
            return Ok(false);
        }

        let _: () = conn
            .hset_multiple(&key, &[("name", name), ("description", description)])
            .await?;

        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn.clone();

        let removed: i64 = conn.del(Self::item_key(id)).await?;
        if removed == 0 {
            return Ok(false);
        }
        let _: () = conn.srem(MEMBERS_KEY, id).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys_match_the_persisted_layout() {
        assert_eq!(RedisStore::item_key(1), "item:1");
        assert_eq!(RedisStore::item_key(9001), "item:9001");
    }

    #[test]
    fn hash_without_description_maps_to_empty_string() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "bolt".to_string());

        let item = item_from_hash(3, fields);
        assert_eq!(item.id, 3);
        assert_eq!(item.name, "bolt");
        assert_eq!(item.description, "");
    }
}
