use crate::core::plan_index::SilverRateIndex;
use crate::core::reader;
use crate::core::resolver::{classify, Resolution};
use crate::core::writer;
use crate::core::zip_index::ZipAreaIndex;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ResolutionStats, SlcspRow, SourceTables, TransformResult};
use crate::utils::error::{EtlError, Result};
use std::path::Path;
use std::sync::Arc;

pub struct SlcspPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SlcspPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SlcspPipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        tracing::debug!("Reading plans from: {}", self.config.plans_file());
        let plans = reader::read_plans(&self.storage.read_file(self.config.plans_file()).await?)?;

        tracing::debug!("Reading ZIP rate areas from: {}", self.config.zips_file());
        let zips = reader::read_zips(&self.storage.read_file(self.config.zips_file()).await?)?;

        tracing::debug!("Reading query ZIP codes from: {}", self.config.slcsp_file());
        let queries =
            reader::read_queries(&self.storage.read_file(self.config.slcsp_file()).await?)?;

        tracing::info!(
            "📥 Loaded {} plans, {} ZIP rows, {} query ZIP codes",
            plans.len(),
            zips.len(),
            queries.len()
        );

        Ok(SourceTables {
            plans,
            zips,
            queries,
        })
    }

    async fn transform(&self, tables: SourceTables) -> Result<TransformResult> {
        let rate_index = SilverRateIndex::build(&tables.plans)?;
        let zip_index = ZipAreaIndex::build(&tables.zips);
        tracing::info!(
            "🗂️ Indexed {} Silver rate areas and {} ZIP codes",
            rate_index.len(),
            zip_index.len()
        );

        let zipcodes: Vec<String> = tables.queries.into_iter().map(|q| q.zipcode).collect();
        let (rows, stats) = resolve_all(
            zipcodes,
            Arc::new(zip_index),
            Arc::new(rate_index),
            self.config.workers(),
        )
        .await?;

        tracing::info!(
            "🔎 Resolved {}/{} ZIP codes (unknown: {}, ambiguous: {}, no Silver plans: {}, fewer than two rates: {})",
            stats.resolved,
            stats.total(),
            stats.unknown_zip,
            stats.ambiguous_zip,
            stats.no_silver_plans,
            stats.insufficient_rates
        );

        let csv_output = writer::write_rows(&rows)?;

        Ok(TransformResult {
            rows,
            csv_output,
            stats,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = Path::new(self.config.data_dir())
            .join(self.config.output_file())
            .display()
            .to_string();

        tracing::debug!(
            "Writing {} rows ({} bytes) to storage",
            result.rows.len(),
            result.csv_output.len()
        );
        self.storage
            .write_file(self.config.output_file(), result.csv_output.as_bytes())
            .await?;

        if self.config.print_to_stdout() {
            print!("{}", result.csv_output);
        }

        Ok(output_path)
    }
}

/// 依查詢順序解析所有 ZIP。workers > 1 時切成連續區塊平行處理，
/// 再依區塊順序組回，輸出順序與輸入一致。
pub async fn resolve_all(
    zipcodes: Vec<String>,
    zip_index: Arc<ZipAreaIndex>,
    rate_index: Arc<SilverRateIndex>,
    workers: usize,
) -> Result<(Vec<SlcspRow>, ResolutionStats)> {
    let workers = workers.max(1);
    if workers == 1 || zipcodes.len() < 2 {
        return Ok(resolve_chunk(zipcodes, &zip_index, &rate_index));
    }

    let chunk_size = zipcodes.len().div_ceil(workers);
    let mut handles = Vec::with_capacity(workers);
    let mut remaining = zipcodes.into_iter();
    loop {
        let chunk: Vec<String> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let zip_index = Arc::clone(&zip_index);
        let rate_index = Arc::clone(&rate_index);
        handles.push(tokio::task::spawn_blocking(move || {
            resolve_chunk(chunk, &zip_index, &rate_index)
        }));
    }
    tracing::debug!("Resolving queries across {} tasks", handles.len());

    let mut rows = Vec::new();
    let mut stats = ResolutionStats::default();
    for handle in handles {
        let (chunk_rows, chunk_stats) = handle.await.map_err(|e| EtlError::ProcessingError {
            message: format!("Resolution task failed: {}", e),
        })?;
        rows.extend(chunk_rows);
        stats.merge(&chunk_stats);
    }

    Ok((rows, stats))
}

fn resolve_chunk(
    zipcodes: Vec<String>,
    zip_index: &ZipAreaIndex,
    rate_index: &SilverRateIndex,
) -> (Vec<SlcspRow>, ResolutionStats) {
    let mut stats = ResolutionStats::default();
    let rows = zipcodes
        .into_iter()
        .map(|zipcode| {
            let resolution = classify(&zipcode, zip_index, rate_index);
            resolution.record(&mut stats);
            if !matches!(resolution, Resolution::Rate(_)) {
                tracing::debug!("ZIP {} left blank: {:?}", zipcode, resolution);
            }
            SlcspRow {
                rate: resolution.rate(),
                zipcode,
            }
        })
        .collect();
    (rows, stats)
}
