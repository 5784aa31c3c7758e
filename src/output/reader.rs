//! Reading derived tables back for later stages

use crate::analysis::{decade_of, TimbreByYear, YearTimbre};
use crate::error::{Error, Result};
use crate::sentiment::{SentimentByYear, YearSentiment};
use csv::{Reader, StringRecord};
use std::path::Path;

/// Parse every cell of `record` except the first as a number
fn numeric_cells(path: &Path, headers: &StringRecord, record: &StringRecord) -> Result<Vec<f64>> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    record
        .iter()
        .zip(headers.iter())
        .skip(1)
        .map(|(raw, column)| {
            raw.trim().parse::<f64>().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                line,
                column: column.to_string(),
                value: raw.to_string(),
            })
        })
        .collect()
}

fn parse_key(path: &Path, column: &str, record: &StringRecord) -> Result<i32> {
    let raw = record.get(0).unwrap_or_default();
    raw.trim().parse().map_err(|_| Error::Parse {
        path: path.to_path_buf(),
        line: record.position().map(|p| p.line()).unwrap_or(0),
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn require_first_column(path: &Path, headers: &StringRecord, column: &str) -> Result<()> {
    if headers.get(0) == Some(column) {
        Ok(())
    } else {
        Err(Error::Schema {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
    }
}

/// Read a `year, <categories...>` table
pub fn read_sentiment_by_year<P: AsRef<Path>>(path: P) -> Result<SentimentByYear> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    require_first_column(path, &headers, "year")?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(YearSentiment {
            year: parse_key(path, "year", &record)?,
            shares: numeric_cells(path, &headers, &record)?,
        });
    }

    let categories = headers.iter().skip(1).map(String::from).collect();
    Ok(SentimentByYear::new(categories, rows))
}

/// Read a `year, <features...>[, decade]` table
///
/// The decade is derived from the year again rather than trusted from the
/// file.
pub fn read_timbre_by_year<P: AsRef<Path>>(path: P) -> Result<TimbreByYear> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    let mut headers = reader.headers()?.clone();
    require_first_column(path, &headers, "year")?;

    let has_decade = headers.iter().last() == Some("decade");
    if has_decade {
        headers.truncate(headers.len() - 1);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let mut record = result?;
        if has_decade {
            record.truncate(record.len().saturating_sub(1));
        }
        let year = parse_key(path, "year", &record)?;
        rows.push(YearTimbre {
            year,
            decade: decade_of(year),
            means: numeric_cells(path, &headers, &record)?,
        });
    }

    let columns = headers.iter().skip(1).map(String::from).collect();
    Ok(TimbreByYear::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mean_by_year;
    use crate::data::{FeatureRow, FeatureTable};
    use crate::output::{stage_sentiment_by_year, stage_timbre_by_year, TableBatch};
    use tempfile::tempdir;

    #[test]
    fn test_read_sentiment_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "year,neg,pos\n1921,0,1\n1920,0.25,0.75\n").unwrap();

        let table = read_sentiment_by_year(&path).unwrap();
        assert_eq!(table.categories, vec!["neg", "pos"]);
        assert_eq!(table.years(), vec![1920, 1921]);
        assert_eq!(table.share(1920, "neg"), Some(0.25));
    }

    #[test]
    fn test_sentiment_table_needs_year_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "neg,pos\n0.5,0.5\n").unwrap();

        let err = read_sentiment_by_year(&path).unwrap_err();
        assert!(matches!(err, Error::Schema { ref column, .. } if column == "year"));
    }

    #[test]
    fn test_written_tables_read_back() {
        let dir = tempdir().unwrap();
        let sentiment_path = dir.path().join("scores.csv");
        let timbre_path = dir.path().join("timbre.csv");

        let sentiment = SentimentByYear::new(
            vec!["neg".to_string(), "compound".to_string()],
            vec![YearSentiment { year: 1970, shares: vec![1.5, -0.5] }],
        );
        let timbre = mean_by_year(&FeatureTable::new(
            vec!["TimbreAvg1".to_string()],
            vec![
                FeatureRow { year: 1970, values: vec![3.0] },
                FeatureRow { year: 1981, values: vec![-1.25] },
            ],
        ));

        let mut batch = TableBatch::new();
        stage_sentiment_by_year(&mut batch, &sentiment_path, &sentiment).unwrap();
        stage_timbre_by_year(&mut batch, &timbre_path, &timbre).unwrap();
        batch.commit().unwrap();

        assert_eq!(read_sentiment_by_year(&sentiment_path).unwrap(), sentiment);
        assert_eq!(read_timbre_by_year(&timbre_path).unwrap(), timbre);
    }

    #[test]
    fn test_timbre_table_without_decade() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timbre.csv");
        std::fs::write(&path, "year,TimbreAvg1,TimbreAvg2\n1995,1,2\n").unwrap();

        let table = read_timbre_by_year(&path).unwrap();
        assert_eq!(table.columns, vec!["TimbreAvg1", "TimbreAvg2"]);
        assert_eq!(table.rows[0].decade, 1990);
        assert_eq!(table.rows[0].means, vec![1.0, 2.0]);
    }
}
