//! Timbre reduction and correlation stages

use crate::analysis::timbre::reduce;
use crate::analysis::{correlate, CorrelationMatrix, TimbreByDecade, TimbreByYear};
use crate::config::PipelineConfig;
use crate::data::FeatureTable;
use crate::error::Result;
use crate::output::{
    read_sentiment_by_year, read_timbre_by_year, stage_correlation_long, stage_correlation_matrix,
    stage_joined_years, stage_timbre_by_decade, stage_timbre_by_year, TableBatch,
};
use crate::report::{joined_years, JoinedYear};

/// Tables produced by [`run_timbre`]
#[derive(Debug, Clone, PartialEq)]
pub struct TimbreRun {
    pub by_year: TimbreByYear,
    pub by_decade: TimbreByDecade,
}

/// Load the feature table, reduce it and write both aggregates
pub fn run_timbre(config: &PipelineConfig) -> Result<TimbreRun> {
    let table = FeatureTable::load(&config.feature_table)?;
    tracing::info!(records = table.len(), "loaded feature table");
    let (by_year, by_decade) = reduce(&table);

    let output = &config.output;
    let mut batch = TableBatch::new();
    stage_timbre_by_year(&mut batch, &output.path(&output.timbre_by_year), &by_year)?;
    stage_timbre_by_decade(&mut batch, &output.path(&output.timbre_by_decade), &by_decade)?;
    batch.commit()?;

    Ok(TimbreRun { by_year, by_decade })
}

/// Tables produced by [`run_correlate`]
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRun {
    /// Rows in the configured category order
    pub matrix: CorrelationMatrix,
    pub joined: Vec<JoinedYear>,
}

/// Correlate the persisted sentiment and timbre tables
///
/// Writes the matrix, its long form and the year-joined chart table.
pub fn run_correlate(config: &PipelineConfig) -> Result<CorrelationRun> {
    let output = &config.output;
    let sentiment = read_sentiment_by_year(output.path(&output.sentiment_by_year))?;
    let timbre = read_timbre_by_year(output.path(&output.timbre_by_year))?;

    let matrix = correlate(&sentiment, &timbre)?.with_category_order(&config.report.category_order);
    let joined = joined_years(&sentiment, &timbre);
    tracing::info!(years = joined.len(), "correlated sentiment with timbre");

    let mut batch = TableBatch::new();
    stage_correlation_matrix(&mut batch, &output.path(&output.correlation), &matrix)?;
    stage_correlation_long(
        &mut batch,
        &output.path(&output.correlation_long),
        &matrix.to_long(config.report.decimals),
    )?;
    stage_joined_years(
        &mut batch,
        &output.path(&output.joined_by_year),
        &sentiment.categories,
        &timbre.columns,
        &joined,
    )?;
    batch.commit()?;

    Ok(CorrelationRun { matrix, joined })
}
