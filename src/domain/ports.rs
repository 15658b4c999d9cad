use crate::domain::model::{RawTable, SheetRef};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub trait TableSource: Send + Sync {
    fn fetch_table(
        &self,
        sheet: &SheetRef,
    ) -> impl std::future::Future<Output = Result<RawTable>> + Send;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of "the current year"; read once per run.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Serialize + Send + Sync;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<RawTable>;
    async fn transform(&self, table: RawTable) -> Result<Vec<Self::Output>>;
    async fn load(&self, records: Vec<Self::Output>) -> Result<String>;
}
