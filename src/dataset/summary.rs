use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::types::{AudioRecord, CoughCategory, Sex};

/// Per-label record counts and sample-rate range of a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    pub counts: BTreeMap<(Option<Sex>, CoughCategory), usize>,
    pub min_sample_rate: Option<u32>,
    pub max_sample_rate: Option<u32>,
    pub total_duration_secs: f64,
}

impl DatasetSummary {
    pub fn from_records(records: &[AudioRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            *summary
                .counts
                .entry((record.sex(), record.category()))
                .or_default() += 1;
            let rate = record.sample_rate();
            summary.min_sample_rate = Some(summary.min_sample_rate.map_or(rate, |m| m.min(rate)));
            summary.max_sample_rate = Some(summary.max_sample_rate.map_or(rate, |m| m.max(rate)));
            summary.total_duration_secs += record.duration_secs();
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn category_count(&self, category: CoughCategory) -> usize {
        self.counts
            .iter()
            .filter(|((_, c), _)| *c == category)
            .map(|(_, count)| count)
            .sum()
    }
}

impl Display for DatasetSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} recordings, {:.1}s total", self.total(), self.total_duration_secs)?;
        if let (Some(min), Some(max)) = (self.min_sample_rate, self.max_sample_rate) {
            writeln!(f, "sample rates: {} - {} Hz", min, max)?;
        }
        for ((sex, category), count) in &self.counts {
            let sex = sex.map_or("unknown", |s| s.token());
            writeln!(f, "  {:<8} {:<10} {}", sex, category.token(), count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PcmFormat, PcmSamples};

    fn record(sex: Option<Sex>, category: CoughCategory, rate: u32) -> AudioRecord {
        AudioRecord::new(
            "r",
            sex,
            category,
            rate,
            PcmFormat::mono_i16(),
            PcmSamples::Int(vec![0; rate as usize]),
        )
        .unwrap()
    }

    #[test]
    fn counts_per_label_pair() {
        let summary = DatasetSummary::from_records(&[
            record(Some(Sex::Male), CoughCategory::Covid, 8_000),
            record(Some(Sex::Male), CoughCategory::Covid, 44_100),
            record(None, CoughCategory::Wet, 11_025),
        ]);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.counts[&(Some(Sex::Male), CoughCategory::Covid)], 2);
        assert_eq!(summary.category_count(CoughCategory::Wet), 1);
        assert_eq!(summary.min_sample_rate, Some(8_000));
        assert_eq!(summary.max_sample_rate, Some(44_100));
        assert!((summary.total_duration_secs - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_has_no_rates() {
        let summary = DatasetSummary::from_records(&[]);
        assert_eq!(summary.total(), 0);
        assert!(summary.min_sample_rate.is_none());
    }
}
