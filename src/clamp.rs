// Offset clamping used when translating a selected sub-region inside the
// addressable field. Pure integer arithmetic, total, no failure modes.

/// Clamp `offset` so that `current + offset` stays within `[min, max]`.
pub fn single(offset: i64, current: i64, min: i64, max: i64) -> i64 {
    if current + offset < min {
        min - current
    } else if current + offset > max {
        max - current
    } else {
        offset
    }
}

/// Clamp `offset` so that the sub-range `[min_in, max_in]`, anchored at
/// `current + offset`, stays within `[min_out, max_out]`.
///
/// The inner range is 1-based: its translated lower edge is
/// `current + offset + min_in - 1`. Callers working with 0-based
/// coordinates pass their bounds shifted up by one.
pub fn nested(
    offset: i64,
    current: i64,
    min_out: i64,
    max_out: i64,
    min_in: i64,
    max_in: i64,
) -> i64 {
    if current + offset + min_in - 1 < min_out {
        min_out - min_in - current + 1
    } else if current + offset + max_in - 1 > max_out {
        max_out - max_in - current + 1
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keeps_an_offset_already_in_range() {
        assert_eq!(single(-2, 4, 1, 5), -2);
    }

    #[test]
    fn single_adjusts_up_to_the_lower_bound() {
        assert_eq!(single(-2, 3, 2, 5), -1);
    }

    #[test]
    fn single_adjusts_down_to_the_upper_bound() {
        assert_eq!(single(2, 4, 2, 5), 1);
    }

    #[test]
    fn nested_keeps_an_offset_whose_range_stays_inside() {
        assert_eq!(nested(-2, 4, 1, 5, 1, 3), -2);
    }

    #[test]
    fn nested_pulls_an_overshooting_range_back_under_the_upper_bound() {
        assert_eq!(nested(-2, 9, 1, 5, 1, 3), -6);
    }

    #[test]
    fn nested_pushes_an_undershooting_range_up_to_the_lower_bound() {
        // Translated lower edge would be 3 - 5 + 1 - 1 = -2, below 1.
        assert_eq!(nested(-5, 3, 1, 10, 1, 4), -2);
    }
}
