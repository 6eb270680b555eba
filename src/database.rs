use crate::{config::AppConfig, constants::*};
use futures::stream::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::Result as MongoResult;
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, IndexOptions, InsertOneOptions,
    ReplaceOptions, UpdateOptions,
};
use mongodb::results::{InsertOneResult, UpdateResult};
use mongodb::{options::ClientOptions, Client, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub struct AppDatabase(Client);

impl AppDatabase {
    pub async fn new(config: &AppConfig) -> MongoResult<Self> {
        let timeout = Duration::from_secs(MONGO_CONN_TIMEOUT);
        // create the mongodb client options
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.max_pool_size = Some(config.mongodb_max_pool);
        client_options.min_pool_size = Some(config.mongodb_min_pool);
        client_options.connect_timeout = Some(timeout);
        // the client connects lazily, nothing is sent to the server here
        let client = Client::with_options(client_options)?;
        Ok(Self(client))
    }

    pub async fn find_one<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOneOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one(filter, options).await
    }

    pub async fn find<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOptions>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        let mut cursor = coll.find(filter, options).await?;
        let mut data = vec![];
        while let Some(doc) = cursor.next().await {
            data.push(doc?);
        }
        Ok(data)
    }

    pub async fn insert_one<T>(
        &self,
        db: &str,
        coll: &str,
        doc: &T,
        options: Option<InsertOneOptions>,
    ) -> MongoResult<InsertOneResult>
    where
        T: Serialize + Send + Sync,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.insert_one(doc, options).await
    }

    pub async fn update_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> MongoResult<UpdateResult> {
        let coll = self.0.database(db).collection::<Document>(coll);
        coll.update_one(filter, update, options).await
    }

    pub async fn replace_one<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        replacement: &T,
        options: Option<ReplaceOptions>,
    ) -> MongoResult<UpdateResult>
    where
        T: Serialize + Send + Sync,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.replace_one(filter, replacement, options).await
    }

    pub async fn find_one_and_update<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<FindOneAndUpdateOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one_and_update(filter, update, options).await
    }

    pub async fn create_index(
        &self,
        db: &str,
        coll: &str,
        keys: Document,
        unique: bool,
    ) -> MongoResult<()> {
        let coll = self.0.database(db).collection::<Document>(coll);
        let options = IndexOptions::builder().unique(Some(unique)).build();
        let index = IndexModel::builder()
            .keys(keys)
            .options(Some(options))
            .build();
        coll.create_index(index, None).await?;
        Ok(())
    }

    /// Create the indexes the queries rely on
    pub async fn ensure_indexes(&self) -> MongoResult<()> {
        self.create_index(DB_NAME, COLL_USERS, doc! {"email": 1}, true)
            .await?;
        let review_keys = doc! {"targetId": 1, "targetType": 1, "status": 1, "createdAt": -1};
        self.create_index(DB_NAME, COLL_REVIEWS, review_keys, false)
            .await?;
        self.create_index(DB_NAME, COLL_SETTINGS, doc! {"key": 1}, true)
            .await?;
        Ok(())
    }
}
