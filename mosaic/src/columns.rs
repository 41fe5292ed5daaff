use alloc::vec::Vec;

const EMPTY: usize = usize::MAX;

/// Per-column bottom edges with an `O(log n)` shortest-column query.
///
/// Internally this is a tournament tree: every internal node stores the index of the shorter of
/// its two children, so the root always names the shortest column. Ties resolve to the lower
/// column index, which keeps layouts identical to a left-to-right linear scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnHeights {
    heights: Vec<u64>,
    tree: Vec<usize>, // 1-indexed, leaves start at `leaves`
    leaves: usize,
}

impl ColumnHeights {
    /// Creates `columns` columns, all at height zero.
    pub fn new(columns: usize) -> Self {
        let leaves = columns.max(1).next_power_of_two();
        let mut tree = alloc::vec![EMPTY; 2 * leaves];
        for (i, slot) in tree[leaves..leaves + columns].iter_mut().enumerate() {
            *slot = i;
        }
        let mut out = Self {
            heights: alloc::vec![0; columns],
            tree,
            leaves,
        };
        for node in (1..leaves).rev() {
            out.tree[node] = out.winner(out.tree[2 * node], out.tree[2 * node + 1]);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.heights
    }

    pub fn get(&self, column: usize) -> u64 {
        self.heights.get(column).copied().unwrap_or(0)
    }

    /// Index of the shortest column (lowest index among equal minima).
    pub fn shortest(&self) -> Option<usize> {
        match self.tree.get(1).copied() {
            Some(EMPTY) | None => None,
            Some(i) => Some(i),
        }
    }

    pub fn max(&self) -> u64 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> u64 {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    pub fn set(&mut self, column: usize, height: u64) {
        if column >= self.heights.len() {
            debug_assert!(
                column < self.heights.len(),
                "ColumnHeights: out-of-bounds column (c={column}, columns={})",
                self.heights.len()
            );
            return;
        }
        self.heights[column] = height;
        let mut node = (self.leaves + column) / 2;
        while node > 0 {
            self.tree[node] = self.winner(self.tree[2 * node], self.tree[2 * node + 1]);
            node /= 2;
        }
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.heights
    }

    fn winner(&self, left: usize, right: usize) -> usize {
        match (left, right) {
            (EMPTY, r) => r,
            (l, EMPTY) => l,
            // The left subtree always holds the lower indexes.
            (l, r) if self.heights[r] < self.heights[l] => r,
            (l, _) => l,
        }
    }
}
