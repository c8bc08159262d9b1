//! Immutable model catalog with per-strip citation rankings.

use std::collections::HashMap;

use crate::{ChartError, ModelRecord, UseCase};

/// The loaded dataset plus lookup tables derived from it once.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ModelRecord>,
    by_id: HashMap<String, usize>,
    /// Record indices per use case, ascending by citations, ties in dataset order.
    rankings: HashMap<UseCase, Vec<usize>>,
    /// Rank of each record inside its use case, parallel to `records`.
    ranks: Vec<usize>,
}

impl Catalog {
    pub fn new(records: Vec<ModelRecord>) -> Result<Self, ChartError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(ChartError::DuplicateId(record.id.clone()));
            }
        }

        let mut rankings: HashMap<UseCase, Vec<usize>> = HashMap::new();
        for use_case in UseCase::ALL {
            let mut members: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.primary_use_case == use_case)
                .map(|(index, _)| index)
                .collect();
            // `sort_by_key` is stable, which keeps equal counts in dataset order.
            members.sort_by_key(|&index| records[index].citation_metric());
            rankings.insert(use_case, members);
        }

        let mut ranks = vec![0; records.len()];
        for members in rankings.values() {
            for (rank, &index) in members.iter().enumerate() {
                ranks[index] = rank;
            }
        }

        tracing::debug!(
            records = records.len(),
            strips = rankings.len(),
            "catalog built"
        );

        Ok(Self {
            records,
            by_id,
            rankings,
            ranks,
        })
    }

    /// Records in dataset order.
    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ModelRecord> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Position of `id` in dataset order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Members of a strip, lowest citation count first.
    pub fn ranking(&self, use_case: UseCase) -> impl Iterator<Item = &ModelRecord> + '_ {
        self.rankings
            .get(&use_case)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    pub fn strip_len(&self, use_case: UseCase) -> usize {
        self.rankings.get(&use_case).map_or(0, Vec::len)
    }

    /// `(rank, members)` of the record inside its strip, `None` for foreign records.
    pub fn rank_of(&self, record: &ModelRecord) -> Option<(usize, usize)> {
        let index = self.index_of(&record.id)?;
        let stored = &self.records[index];
        if stored.primary_use_case != record.primary_use_case {
            return None;
        }
        Some((self.ranks[index], self.strip_len(stored.primary_use_case)))
    }

    /// Records whose id passes `keep`, in dataset order.
    pub fn filter_ids<'a, F>(&'a self, keep: F) -> Vec<&'a ModelRecord>
    where
        F: Fn(&str) -> bool,
    {
        self.records
            .iter()
            .filter(|record| keep(&record.id))
            .collect()
    }
}
