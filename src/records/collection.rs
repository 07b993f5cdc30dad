use std::fmt;

use crate::error::SqlSessionError;
use crate::records::Record;

type Producer = Box<dyn Iterator<Item = Result<Record, SqlSessionError>> + Send>;

/// The lazily-realized result set of one query.
///
/// Rows come from a one-shot producer: each row is pulled at most once,
/// ever, and lands in an append-only cache. Once the producer runs dry all
/// access is served from the cache, so indexing the same position twice is
/// idempotent. The cache never evicts; it lives as long as the collection.
pub struct RecordCollection {
    producer: Option<Producer>,
    cached: Vec<Record>,
}

impl RecordCollection {
    #[must_use]
    pub fn new(producer: Producer) -> Self {
        Self {
            producer: Some(producer),
            cached: Vec::new(),
        }
    }

    /// A collection whose rows are already materialized.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            producer: None,
            cached: records,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// Whether the producer has been fully drained.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.producer.is_none()
    }

    /// The rows pulled so far, without pulling more.
    #[must_use]
    pub fn materialized(&self) -> &[Record] {
        &self.cached
    }

    /// Pull rows until the cache covers `index` or the producer runs dry.
    fn materialize_to(&mut self, index: usize) -> Result<(), SqlSessionError> {
        while self.cached.len() <= index {
            let Some(producer) = self.producer.as_mut() else {
                return Ok(());
            };
            match producer.next() {
                Some(row) => self.cached.push(row?),
                None => {
                    self.producer = None;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn materialize_all(&mut self) -> Result<(), SqlSessionError> {
        if let Some(producer) = self.producer.as_mut() {
            for row in producer {
                self.cached.push(row?);
            }
            self.producer = None;
        }
        Ok(())
    }

    /// Row at `index`, materializing up to it on demand.
    ///
    /// # Errors
    /// Propagates a producer failure while materializing.
    pub fn get(&mut self, index: usize) -> Result<Option<&Record>, SqlSessionError> {
        self.materialize_to(index)?;
        Ok(self.cached.get(index))
    }

    /// First row, or `None` for an empty result.
    ///
    /// # Errors
    /// Propagates a producer failure while materializing.
    pub fn first(&mut self) -> Result<Option<&Record>, SqlSessionError> {
        self.get(0)
    }

    /// All rows, fully materialized.
    ///
    /// # Errors
    /// Propagates a producer failure while materializing.
    pub fn all(&mut self) -> Result<&[Record], SqlSessionError> {
        self.materialize_all()?;
        Ok(&self.cached)
    }

    /// Consume the collection into an owned row vector.
    ///
    /// # Errors
    /// Propagates a producer failure while materializing.
    pub fn into_vec(mut self) -> Result<Vec<Record>, SqlSessionError> {
        self.materialize_all()?;
        Ok(self.cached)
    }
}

impl fmt::Debug for RecordCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCollection")
            .field("cached", &self.cached.len())
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::SqlValue;

    fn row(n: i64) -> Record {
        Record::new(Arc::new(vec!["n".into()]), vec![SqlValue::Int(n)]).unwrap()
    }

    fn counting_collection(rows: usize) -> (RecordCollection, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let producer = (0..rows).map(move |n| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(row(n as i64))
        });
        (RecordCollection::new(Box::new(producer)), pulls)
    }

    #[test]
    fn indexing_materializes_lazily() {
        let (mut collection, pulls) = counting_collection(5);
        assert!(collection.get(1).unwrap().is_some());
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
        assert_eq!(collection.materialized().len(), 2);
    }

    #[test]
    fn cached_rows_are_never_repulled() {
        let (mut collection, pulls) = counting_collection(3);
        let first = collection.get(0).unwrap().cloned();
        let again = collection.get(0).unwrap().cloned();
        assert_eq!(first, again);
        assert_eq!(pulls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exhaustion_serves_from_cache() {
        let (mut collection, pulls) = counting_collection(2);
        assert_eq!(collection.all().unwrap().len(), 2);
        assert!(collection.is_exhausted());
        assert!(collection.get(5).unwrap().is_none());
        assert!(collection.get(1).unwrap().is_some());
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn first_on_empty_is_none() {
        let mut collection = RecordCollection::empty();
        assert!(collection.first().unwrap().is_none());
    }

    #[test]
    fn producer_error_propagates() {
        let producer = std::iter::once(Err(SqlSessionError::ExecutionError("boom".into())));
        let mut collection = RecordCollection::new(Box::new(producer));
        assert!(collection.first().is_err());
    }

    #[test]
    fn into_vec_materializes_everything() {
        let (collection, _pulls) = counting_collection(4);
        let rows = collection.into_vec().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].get("n"), Some(&SqlValue::Int(3)));
    }
}
