use bitvec::prelude::*;

/// Returns the bit at position `i` of combination `index` over `width` bits, most
/// significant bit first.
///
/// # Example
/// ```
/// # use nandsim::data_structures::combination_bit;
/// assert_eq!(combination_bit(0b100, 3, 0), true);
/// assert_eq!(combination_bit(0b100, 3, 2), false);
/// ```
#[inline(always)]
pub fn combination_bit(index: usize, width: usize, i: usize) -> bool {
    (index >> (width - 1 - i)) & 1 == 1
}

/// Returns the combination index of `bits`, the first bit being the most significant.
///
/// # Example
/// ```
/// # use nandsim::data_structures::combination_index;
/// assert_eq!(combination_index(vec![true, false, true]), 5);
/// assert_eq!(combination_index(Vec::new()), 0);
/// ```
pub fn combination_index<I: IntoIterator<Item = bool>>(bits: I) -> usize {
    bits.into_iter()
        .fold(0, |index, bit| (index << 1) | bit as usize)
}

/// Iterator over every combination of `width` bits, counting up in binary with the first
/// bit being the most significant.
///
/// # Example
/// ```
/// # use nandsim::data_structures::Combinations;
/// let rows: Vec<Vec<bool>> = Combinations::new(2)
///     .map(|bits| bits.iter().by_vals().collect())
///     .collect();
///
/// assert_eq!(
///     rows,
///     vec![
///         vec![false, false],
///         vec![false, true],
///         vec![true, false],
///         vec![true, true],
///     ]
/// );
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Combinations {
    width: usize,
    next: usize,
    end: usize,
}
impl Combinations {
    /// Returns a new [Combinations] over `width` bits.
    ///
    /// # Panics
    ///
    /// Will panic if 2^`width` doesn't fit in a [usize].
    pub fn new(width: usize) -> Self {
        assert!(
            width < usize::BITS as usize,
            "Can't enumerate combinations of {} bits",
            width
        );
        Self {
            width,
            next: 0,
            end: 1 << width,
        }
    }

    /// Returns the number of bits of each combination.
    pub fn width(&self) -> usize {
        self.width
    }
}

impl Iterator for Combinations {
    type Item = BitVec;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;

        Some(
            (0..self.width)
                .map(|i| combination_bit(index, self.width, i))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for Combinations {}
