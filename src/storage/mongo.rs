//! MongoDB 存储实现

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::MongoConfig;
use crate::model::FaqRecord;
use crate::storage::{FaqStore, StoreResult};

/// 服务器选择超时，连不上时尽快失败而不是等驱动默认的 30 秒
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// 基于 MongoDB 的 FAQ 存储
pub struct MongoFaqStore {
    db: Database,
    collection: Collection<FaqRecord>,
}

impl MongoFaqStore {
    /// 连接数据库并立即验证连通性
    ///
    /// 与缓存层不同，存储是硬依赖，连接失败直接让启动失败。
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.connection_string).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)?;
        let db = client.database(&config.database_name);
        let collection = db.collection::<FaqRecord>(&config.collection_name);

        let store = Self { db, collection };
        store.ping().await?;

        tracing::info!(
            "MongoDB 连接成功: {}/{}",
            config.database_name,
            config.collection_name
        );
        Ok(store)
    }

    /// 创建列表查询使用的排序索引
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl FaqStore for MongoFaqStore {
    async fn find_all(&self) -> StoreResult<Vec<FaqRecord>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?;

        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>> {
        let record = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(record)
    }

    async fn save(&self, record: &FaqRecord) -> StoreResult<()> {
        self.collection
            .replace_one(doc! { "_id": &record.id }, record)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
