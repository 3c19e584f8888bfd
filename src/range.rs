use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, ops::Sub};

/// Range where lower bound is inclusive, upper bound is exclusive. Either bound may be missing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<T>(Option<T>, Option<T>);

impl<T> Range<T>
where
    T: Ord,
{
    pub fn new(from: Option<T>, to: Option<T>) -> Self {
        if let (Some(from), Some(to)) = (&from, &to) {
            if from >= to {
                panic!("ranges must go from low to high")
            }
        }
        Range(from, to)
    }

    pub fn contains(&self, val: &T) -> bool {
        let above_start = match &self.0 {
            Some(start) => val >= start,
            None => true,
        };
        let below_end = match &self.1 {
            Some(end) => val < end,
            None => true,
        };
        above_start && below_end
    }
}

/// Displays integer ranges the way they are labelled in reports, e.g. `Under 30`, `30-44`,
/// `60 and above`.
impl<T> fmt::Display for Range<T>
where
    T: fmt::Display + Copy + Sub<Output = T> + From<u8>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.0, self.1) {
            (None, Some(end)) => write!(f, "Under {}", end),
            (Some(start), Some(end)) => write!(f, "{}-{}", start, end - T::from(1)),
            (Some(start), None) => write!(f, "{} and above", start),
            (None, None) => f.write_str("All"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSet<T> {
    ranges: Vec<Range<T>>,
}

impl<T> RangeSet<T> {
    pub fn new(ranges: Vec<Range<T>>) -> Self {
        Self { ranges }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<T>> + '_ {
        self.ranges.iter()
    }
}

impl<T> RangeSet<T>
where
    T: Ord,
{
    /// Count values into buckets.
    ///
    /// Ranges are tested in order and each value is counted in the first range containing it.
    /// Values outside every range are not counted.
    pub fn bucket_values<I, B>(self, values: I) -> RangeSetCounts<T>
    where
        I: Iterator<Item = B>,
        B: Borrow<T>,
    {
        let mut buckets = vec![0usize; self.ranges.len()];
        for value in values {
            if let Some(idx) = self
                .ranges
                .iter()
                .position(|bucket| bucket.contains(value.borrow()))
            {
                buckets[idx] += 1;
            }
        }
        RangeSetCounts {
            set: self,
            counts: buckets,
        }
    }
}

/// A range set with values bucketed, and bucket sizes recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RangeSetCounts<T> {
    set: RangeSet<T>,
    counts: Vec<usize>,
}

impl<T> RangeSetCounts<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&Range<T>, usize)> {
        self.set.iter().zip_eq(self.counts.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
