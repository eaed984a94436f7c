use ahash::RandomState;
use hashbrown::HashMap;

/// Running statistics for one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationStats {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for StationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StationStats {
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum: 0.,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn add(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    #[inline]
    pub fn merge(&mut self, other: &StationStats) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Only meaningful once `count > 0`, which holds for every stored entry.
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Key to statistics mapping. Entries are created on first observation and
/// never removed.
#[derive(Debug, Clone)]
pub struct AggregationTable {
    entries: HashMap<String, StationStats, RandomState>,
}

impl Default for AggregationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationTable {
    pub fn new() -> Self {
        Self { entries: HashMap::with_hasher(RandomState::new()) }
    }

    #[inline]
    pub fn observe(&mut self, key: &str, value: f64) {
        self.entries
            .entry_ref(key)
            .or_insert_with(StationStats::new)
            .add(value);
    }

    pub fn merge(&mut self, other: AggregationTable) {
        for (key, stats) in other.entries {
            self.entries
                .entry(key)
                .and_modify(|e| e.merge(&stats))
                .or_insert(stats);
        }
    }

    pub fn get(&self, key: &str) -> Option<&StationStats> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StationStats)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, StationStats)> {
        self.entries.into_iter()
    }
}

impl PartialEq for AggregationTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, stats)| other.get(key) == Some(stats))
    }
}
