use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod catalog;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use catalog::CatalogReader;
pub use memory::MemoryCatalog;
pub use models::{Airline, Airport, Coordinates, FlightLeg, Route, RouteKey};

pub struct StorageFactory;

impl StorageFactory {
    /// 根据全局配置创建目录存储，数据库类型从 URL 推断
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let storage = SeaOrmStorage::new(&config.database).await?;
        Ok(Arc::new(storage))
    }
}
