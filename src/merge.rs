use crate::util::FreqTable;

/// Folds local tables into one global table by summing per key. The
/// result does not depend on table order or on how the input was split.
pub fn merge_tables<I>(tables: I) -> FreqTable
where
    I: IntoIterator<Item = FreqTable>,
{
    let mut tables = tables.into_iter();
    let mut total = tables.next().unwrap_or_default();
    for sub_table in tables {
        for (record, count) in sub_table {
            *total.entry(record).or_insert(0) += count;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn table(pairs: &[(&'static [u8], u64)]) -> FreqTable {
        pairs
            .iter()
            .map(|&(k, v)| (Bytes::from_static(k), v))
            .collect()
    }

    #[test]
    fn sums_counts_per_key() {
        let merged = merge_tables(vec![
            table(&[(b"a", 2), (b"b", 1)]),
            table(&[(b"a", 1), (b"c", 4)]),
        ]);
        assert_eq!(merged, table(&[(b"a", 3), (b"b", 1), (b"c", 4)]));
    }

    #[test]
    fn order_independent() {
        let t1 = table(&[(b"a", 2), (b"b", 1)]);
        let t2 = table(&[(b"b", 5)]);
        let t3 = table(&[(b"c", 1), (b"a", 1)]);

        let forward = merge_tables(vec![t1.clone(), t2.clone(), t3.clone()]);
        let backward = merge_tables(vec![t3, t2, t1]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn no_tables_yields_empty() {
        assert!(merge_tables(Vec::new()).is_empty());
    }

    #[test]
    fn single_table_passes_through() {
        let t = table(&[(b"a", 7)]);
        assert_eq!(merge_tables(vec![t.clone()]), t);
    }
}
