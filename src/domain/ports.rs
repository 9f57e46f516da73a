use crate::domain::model::{SourceTables, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 檔案路徑皆相對於 data_dir（絕對路徑則直接使用）
pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn plans_file(&self) -> &str;
    fn zips_file(&self) -> &str;
    fn slcsp_file(&self) -> &str;
    fn output_file(&self) -> &str;
    fn workers(&self) -> usize;
    fn print_to_stdout(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
