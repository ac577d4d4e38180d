//! Table block detection.
//!
//! Extracted tables keep their columns as runs of two or more spaces. A block
//! of at least three consecutive lines whose gaps line up is treated as a
//! table and protected from merging and whitespace collapsing.

/// Lines examined per detection attempt.
pub const TABLE_SCAN_WINDOW: usize = 10;

/// Minimum consecutive lines with enough column gaps.
const MIN_TABLE_ROWS: usize = 3;

/// Minimum later rows aligned with the first row.
const MIN_SIMILAR_ROWS: usize = 2;

/// Minimum column gaps (and aligned gaps) per row.
const MIN_GAPS: usize = 2;

/// Allowed drift of a column gap between rows, in chars.
const ALIGN_TOLERANCE: usize = 2;

/// Half-open line range `[start, end)` recognized as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBlock {
    pub start: usize,
    pub end: usize,
}

impl TableBlock {
    /// Number of lines in the block.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the block spans no lines.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Returns true if `index` lies inside the block.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Char offsets where runs of two or more spaces begin.
fn gap_positions(line: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut run_start = 0;
    let mut run_len = 0;

    for (idx, c) in line.chars().enumerate() {
        if c == ' ' {
            if run_len == 0 {
                run_start = idx;
            }
            run_len += 1;
        } else {
            if run_len >= 2 {
                positions.push(run_start);
            }
            run_len = 0;
        }
    }
    if run_len >= 2 {
        positions.push(run_start);
    }

    positions
}

/// Counts gaps of `reference` that have a counterpart in `other` within tolerance.
fn aligned_gaps(reference: &[usize], other: &[usize]) -> usize {
    reference
        .iter()
        .filter(|&&pos| other.iter().any(|&pos2| pos.abs_diff(pos2) <= ALIGN_TOLERANCE))
        .count()
}

/// Decides whether a table starts at `start`.
///
/// Returns the block only when at least three consecutive rows carry two or
/// more column gaps and at least two later rows align with the first.
pub fn detect_table_block<S: AsRef<str>>(lines: &[S], start: usize) -> Option<TableBlock> {
    if start + 2 >= lines.len() {
        return None;
    }

    let window_end = (start + TABLE_SCAN_WINDOW).min(lines.len());
    let mut rows: Vec<Vec<usize>> = Vec::new();

    for line in &lines[start..window_end] {
        let line = line.as_ref();
        if line.trim().is_empty() {
            break;
        }
        let gaps = gap_positions(line);
        if gaps.len() < MIN_GAPS {
            break;
        }
        rows.push(gaps);
    }

    if rows.len() < MIN_TABLE_ROWS {
        return None;
    }

    let first = &rows[0];
    let similar = rows[1..]
        .iter()
        .filter(|row| aligned_gaps(first, row) >= MIN_GAPS)
        .count();

    if similar < MIN_SIMILAR_ROWS {
        return None;
    }

    Some(TableBlock {
        start,
        end: start + rows.len(),
    })
}

/// Lazy table tracker shared by the merge and whitespace stages.
///
/// Detection re-runs only once the scan position reaches or passes the end of
/// the previous block, so blocks never overlap.
#[derive(Debug, Default)]
pub struct TableScanner {
    block_end: usize,
    blocks: Vec<TableBlock>,
}

impl TableScanner {
    /// Creates a scanner with no active block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `index` falls inside a table block.
    ///
    /// Must be called with non-decreasing indices over the same line sequence.
    pub fn is_protected<S: AsRef<str>>(&mut self, lines: &[S], index: usize) -> bool {
        if index >= self.block_end {
            if let Some(block) = detect_table_block(lines, index) {
                self.block_end = block.end;
                self.blocks.push(block);
            }
        }
        index < self.block_end
    }

    /// Blocks found so far.
    pub fn blocks(&self) -> &[TableBlock] {
        &self.blocks
    }
}
