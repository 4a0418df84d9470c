//! Counters for records the reader drops without failing.

use std::{collections::BTreeMap, fmt};

/// Why a line, record, or slot filler was left out of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// A line whose tag prefix is neither `T` nor `E`.
    UnmodelledLine,
    /// A text-bound record whose type is not a span type of the schema.
    SpanType,
    /// An event record whose type is not a frame type of the schema.
    FrameType,
    /// A span lying outside every instance of the document.
    OutsideInstances,
    /// A role naming a slot its frame type does not declare.
    UnknownSlot,
    /// A role whose filler tag does not resolve to a kept span or frame.
    UnresolvedFiller,
    /// A role whose filler type the slot does not allow.
    DisallowedFiller,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnmodelledLine => "unmodelled line",
            SkipReason::SpanType => "span type not in schema",
            SkipReason::FrameType => "frame type not in schema",
            SkipReason::OutsideInstances => "span outside instances",
            SkipReason::UnknownSlot => "unknown slot",
            SkipReason::UnresolvedFiller => "unresolved filler",
            SkipReason::DisallowedFiller => "disallowed filler type",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reason skip counts for one document or a whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipStats {
    counts: BTreeMap<SkipReason, usize>,
}

impl SkipStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: SkipReason) {
        *self.counts.entry(reason).or_default() += 1;
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: &SkipStats) {
        for (reason, count) in &other.counts {
            *self.counts.entry(*reason).or_default() += count;
        }
    }

    /// Non-zero counts in reason order.
    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.counts.iter().map(|(reason, count)| (*reason, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut a = SkipStats::new();
        a.record(SkipReason::UnknownSlot);
        a.record(SkipReason::UnknownSlot);
        a.record(SkipReason::SpanType);

        let mut b = SkipStats::new();
        b.record(SkipReason::UnknownSlot);
        b.record(SkipReason::DisallowedFiller);

        a.merge(&b);
        assert_eq!(a.count(SkipReason::UnknownSlot), 3);
        assert_eq!(a.count(SkipReason::FrameType), 0);
        assert_eq!(a.total(), 5);
        assert_eq!(
            a.iter().map(|(reason, _)| reason).collect::<Vec<_>>(),
            [
                SkipReason::SpanType,
                SkipReason::UnknownSlot,
                SkipReason::DisallowedFiller
            ]
        );
    }
}
