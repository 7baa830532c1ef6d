//! Contiguous-block similarity scoring.
//!
//! The score is the Ratcliff/Obershelp "gestalt" ratio: find the longest
//! common contiguous run, recurse on the unmatched pieces to its left and
//! right, and compare the total matched length against the combined length.
//! Word order and contiguity matter, so reordered tokens score lower than a
//! character-level metric would rate them.

/// Similarity of two canonical strings, in `[0, 1]`.
///
/// - `0.0` when either side is empty (including both)
/// - `1.0` when the strings are equal and nonempty
/// - otherwise `2 * M / (len(a) + len(b))`, `M` being the matched length
///
/// Symmetric: operands are put in a fixed order before matching, so ties
/// between equally long blocks resolve the same way for `(a, b)` and `(b, a)`.
pub fn score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    let matched = matched_len(&first, &second);
    let total = first.len() + second.len();

    (2 * matched) as f64 / total as f64
}

/// A common run: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    len: usize,
}

/// Total length of the matching blocks between `a` and `b`.
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let block = longest_block(a, b, alo, ahi, blo, bhi);
        if block.len == 0 {
            continue;
        }
        total += block.len;

        if alo < block.a_start && blo < block.b_start {
            pending.push((alo, block.a_start, blo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < ahi && b_end < bhi {
            pending.push((a_end, ahi, b_end, bhi));
        }
    }

    total
}

/// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the run starting earliest in `a`, then earliest in `b`.
fn longest_block(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
    let mut best = Block {
        a_start: alo,
        b_start: blo,
        len: 0,
    };

    // run[j - blo + 1]: length of the common run ending at (i, j).
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let len = prev[slot - 1] + 1;
                cur[slot] = len;
                if len > best.len {
                    best = Block {
                        a_start: i + 1 - len,
                        b_start: j + 1 - len,
                        len,
                    };
                }
            } else {
                cur[slot] = 0;
            }
        }
        core::mem::swap(&mut prev, &mut cur);
    }

    best
}
