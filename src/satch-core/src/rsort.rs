//! Stable LSD radix sort over ranked elements.
//!
//! Ported from the header-only `RSORT` macro (`rsort.h`), itself inherited
//! from CaDiCaL via Kissat: an 8-bit-radix, multi-pass counting sort with
//! two optimizations that must survive translation to Rust:
//!
//! - a running lower/upper bound over all ranks lets later passes be
//!   skipped entirely once the bound's bits agree at that radix position;
//! - within a pass, a cheap "already non-decreasing" check skips the
//!   permutation step.
//!
//! The auxiliary buffer is allocated lazily, only once an actual
//! permutation is needed, and passes ping-pong between the original slice
//! and that buffer; the final result is copied back only if it ended up in
//! the auxiliary buffer.

const RADIX_BITS: u32 = 8;
const RADIX_WIDTH: usize = 1 << RADIX_BITS;

/// Sort `items` in place by the `u32` rank produced by `rank`. Stable.
pub fn radix_sort_u32<T: Clone>(items: &mut [T], rank: impl Fn(&T) -> u32) {
    radix_sort(items, rank, 32);
}

/// Sort `items` in place by the `u64` rank produced by `rank`. Stable.
pub fn radix_sort_u64<T: Clone>(items: &mut [T], rank: impl Fn(&T) -> u64) {
    radix_sort(items, rank, 64);
}

// Generic over the rank width by passing the bit width explicitly and
// always computing through u64 internally; the 32-bit entry point above
// just narrows to a shift count of 32 instead of 64.
fn radix_sort<T: Clone, R: Copy + Into<u64>>(
    items: &mut [T],
    rank: impl Fn(&T) -> R,
    bits: u32,
) {
    let n = items.len();
    if n <= 1 {
        return;
    }

    let mut lower: u64 = !0;
    let mut upper: u64 = 0;
    let mut bounded = false;

    let mut aux: Option<Vec<T>> = None;
    // `source` tracks whether the current pass reads from `items` (true) or
    // from `aux` (false); `items` and `aux` ping-pong as the destination.
    let mut in_items = true;

    let mut shift = 0u32;
    while shift < bits {
        let mask_bits = shift;
        if bounded {
            let lower_masked = (lower >> mask_bits) & (RADIX_WIDTH as u64 - 1);
            let upper_masked = (upper >> mask_bits) & (RADIX_WIDTH as u64 - 1);
            if lower_masked == upper_masked {
                shift += RADIX_BITS;
                continue;
            }
        }

        let mut counts = [0usize; RADIX_WIDTH];
        let mut sorted = true;
        let mut last = 0u64;

        {
            let src: &[T] = if in_items {
                items
            } else {
                aux.as_ref().unwrap()
            };
            for item in src.iter() {
                let r: u64 = rank(item).into();
                if !bounded {
                    lower &= r;
                    upper |= r;
                }
                let m = (r >> shift) & (RADIX_WIDTH as u64 - 1);
                if sorted && last > m {
                    sorted = false;
                } else {
                    last = m;
                }
                counts[m as usize] += 1;
            }
        }

        if !bounded {
            bounded = true;
            let lower_masked = (lower >> shift) & (RADIX_WIDTH as u64 - 1);
            let upper_masked = (upper >> shift) & (RADIX_WIDTH as u64 - 1);
            if lower_masked == upper_masked {
                shift += RADIX_BITS;
                continue;
            }
        }

        if sorted {
            shift += RADIX_BITS;
            continue;
        }

        let mut pos = 0usize;
        for count in counts.iter_mut() {
            let delta = *count;
            *count = pos;
            pos += delta;
        }

        if aux.is_none() {
            aux = Some(items.to_vec());
        }

        if in_items {
            let aux = aux.as_mut().unwrap();
            for item in items.iter() {
                let r: u64 = rank(item).into();
                let m = ((r >> shift) & (RADIX_WIDTH as u64 - 1)) as usize;
                aux[counts[m]] = item.clone();
                counts[m] += 1;
            }
        } else {
            let aux_ref = aux.as_ref().unwrap();
            let mut dest = items.to_vec();
            for item in aux_ref.iter() {
                let r: u64 = rank(item).into();
                let m = ((r >> shift) & (RADIX_WIDTH as u64 - 1)) as usize;
                dest[counts[m]] = item.clone();
                counts[m] += 1;
            }
            items.clone_from_slice(&dest);
        }

        in_items = !in_items;
        shift += RADIX_BITS;
    }

    if !in_items {
        items.clone_from_slice(aux.as_ref().unwrap());
    }

    debug_assert!(is_sorted_by_rank(items, &rank));
}

fn is_sorted_by_rank<T, R: Copy + Into<u64>>(items: &[T], rank: &impl Fn(&T) -> R) -> bool {
    items
        .windows(2)
        .all(|w| rank(&w[0]).into() <= rank(&w[1]).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sorts_u32_ranks() {
        let mut v: Vec<u32> = vec![5, 3, 255, 0, 256, 1, 65535, 2];
        radix_sort_u32(&mut v, |x| *x);
        assert_eq!(v, vec![0, 1, 2, 3, 5, 255, 256, 65535]);
    }

    #[test]
    fn sorts_u64_ranks() {
        let mut v: Vec<u64> = vec![1u64 << 40, 3, (1u64 << 40) + 1, 0];
        radix_sort_u64(&mut v, |x| *x);
        assert_eq!(v, vec![0, 3, 1u64 << 40, (1u64 << 40) + 1]);
    }

    #[test]
    fn stable_for_equal_ranks() {
        let mut v: Vec<(u32, u32)> = vec![(0, 1), (0, 2), (0, 3), (1, 4)];
        radix_sort_u32(&mut v, |x| x.0);
        assert_eq!(v, vec![(0, 1), (0, 2), (0, 3), (1, 4)]);
    }

    #[test]
    fn handles_empty_and_singleton() {
        let mut empty: Vec<u32> = vec![];
        radix_sort_u32(&mut empty, |x| *x);
        assert!(empty.is_empty());

        let mut one = vec![42u32];
        radix_sort_u32(&mut one, |x| *x);
        assert_eq!(one, vec![42]);
    }

    proptest! {
        #[test]
        fn permutation_and_sorted(mut v in proptest::collection::vec(any::<u32>(), 0..200)) {
            let original = v.clone();
            radix_sort_u32(&mut v, |x| *x);

            let mut sorted_original = original.clone();
            sorted_original.sort_unstable();
            let mut sorted_result = v.clone();
            sorted_result.sort_unstable();
            prop_assert_eq!(sorted_original, sorted_result);

            prop_assert!(v.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
