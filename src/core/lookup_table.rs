use more_asserts::assert_gt;

/**
 * Sampled version of a function over the query domain [0, 1]. Entry `i` holds the
 * function evaluated at `i / (n - 1)`, and a query `q` reads entry `floor(q * n)`,
 * clamped to the table. This is the quantization used by classical colormap
 * lookups, so sampling a ramp through this table reproduces their output.
 */
pub struct LookupTable<T> {
    table_entries: Vec<T>,
}

impl<T: Copy> LookupTable<T> {
    pub fn new<F>(entry_count: usize, query_to_data: F) -> LookupTable<T>
    where
        F: Fn(f64) -> T,
    {
        assert_gt!(entry_count, 1);
        let step = 1.0 / ((entry_count - 1) as f64);
        let mut table_entries: Vec<T> = Vec::with_capacity(entry_count);
        for index in 0..entry_count - 1 {
            table_entries.push(query_to_data((index as f64) * step));
        }
        table_entries.push(query_to_data(1.0));
        LookupTable { table_entries }
    }

    pub fn len(&self) -> usize {
        self.table_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_entries.is_empty()
    }

    pub fn lookup(&self, query: f64) -> T {
        let count = self.table_entries.len();
        let scaled = query * (count as f64);
        let index = if scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(count - 1)
        };
        self.table_entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table_samples_end_points() {
        let table = LookupTable::new(5, |query| query);
        assert_eq!(table.len(), 5);
        assert_eq!(table.lookup(0.0), 0.0);
        assert_eq!(table.lookup(1.0), 1.0);
    }

    #[test]
    fn test_lookup_table_quantization() {
        // entries: [0.0, 0.25, 0.5, 0.75, 1.0]
        let table = LookupTable::new(5, |query| query);
        assert_eq!(table.lookup(0.19), 0.0);
        assert_eq!(table.lookup(0.2), 0.25);
        assert_eq!(table.lookup(0.59), 0.5);
        assert_eq!(table.lookup(0.99), 1.0);
    }

    #[test]
    fn test_lookup_table_clamps_out_of_domain_queries() {
        let table = LookupTable::new(4, |query| (query * 3.0).round() as i32);
        assert_eq!(table.lookup(-3.0), 0);
        assert_eq!(table.lookup(7.5), 3);
    }

    #[test]
    #[should_panic]
    fn test_lookup_table_requires_two_entries() {
        LookupTable::new(1, |query| query);
    }
}
