use std::ops::Range;

/// Page size used by the joke feed unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Index window of 1-based page `page_num` over a sequence of `len` items.
///
/// The window is `[(page_num - 1) * page_size, page_num * page_size)` clamped to
/// `[0, len)`. Pages that fall entirely outside the sequence, including page 0
/// and negative pages, yield an empty range rather than wrapping around.
pub fn page_range(page_num: i64, page_size: usize, len: usize) -> Range<usize> {
    let size = i64::try_from(page_size).unwrap_or(i64::MAX);
    let start = page_num.saturating_sub(1).saturating_mul(size);
    let end = start.saturating_add(size);

    let clamp = |index: i64| -> usize {
        if index <= 0 {
            0
        } else {
            usize::try_from(index).map_or(len, |index| index.min(len))
        }
    };

    let (start, end) = (clamp(start), clamp(end));
    if start >= end {
        return 0..0;
    }
    start..end
}

/// Borrows the items on page `page_num`.
pub fn page_slice<T>(items: &[T], page_num: i64, page_size: usize) -> &[T] {
    &items[page_range(page_num, page_size, items.len())]
}
