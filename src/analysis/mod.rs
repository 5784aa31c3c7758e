//! Analysis of the yearly tables: timbre reduction, correlation and word
//! frequencies.

pub mod correlation;
pub mod timbre;
pub mod words;

pub use correlation::{
    correlate, inner_join, pearson, CorrelationCell, CorrelationMatrix, JoinedColumns,
};
pub use timbre::{
    decade_label, decade_of, mean_by_decade, mean_by_year, DecadeTimbre, TimbreByDecade,
    TimbreByYear, YearTimbre,
};
pub use words::{WordCount, WordCounter};
