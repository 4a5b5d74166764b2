//! Tests for gram window geometry and content ordering

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use std::cmp::Ordering;
    use texgram::spatial::GramLayout;

    fn sample_bitboard() -> Array2<u8> {
        array![[0, 1, 1, 0], [1, 0, 0, 1], [0, 0, 1, 1]]
    }

    // Tests flat indices map to row-major coordinates
    // Verified by dividing by the height
    #[test]
    fn test_anchor_coordinates() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 2);

        assert_eq!(layout.width(), 4);
        assert_eq!(layout.height(), 3);
        assert_eq!(layout.pixel_count(), 12);
        assert_eq!(layout.anchor(0), (0, 0));
        assert_eq!(layout.anchor(5), (1, 1));
        assert_eq!(layout.anchor(11), (2, 3));
    }

    // Tests only anchors whose window fits are valid
    // Verified by allowing windows to touch one pixel past the edge
    #[test]
    fn test_valid_anchors() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 2);

        let valid: Vec<usize> = (0..layout.pixel_count())
            .filter(|&index| layout.is_valid_anchor(index))
            .collect();
        assert_eq!(valid, vec![0, 1, 2, 4, 5, 6]);
        assert_eq!(layout.valid_anchor_count(), 6);
        assert!(!layout.is_valid_anchor(12));
    }

    // Tests windows larger than the image have no valid anchors
    // Verified by clamping windows at the border
    #[test]
    fn test_oversized_window() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 4);

        assert_eq!(layout.valid_anchor_count(), 0);
        assert!(layout.window(0).is_none());
    }

    // Tests window contents follow the anchor
    // Verified by anchoring at the bottom-right pixel
    #[test]
    fn test_window_contents() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 2);

        let window = layout.window(5).expect("anchor 5 is valid");
        assert_eq!(window, array![[0, 0], [0, 1]]);
        assert!(layout.window(3).is_none());
        assert!(layout.window(8).is_none());
    }

    // Tests windows compare row-major with 0 before 1
    // Verified by comparing column-major
    #[test]
    fn test_compare_contents() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 2);

        // Anchor 1 is [[1, 1], [0, 0]], anchor 2 is [[1, 0], [0, 1]]
        assert_eq!(layout.compare(1, 2), Ordering::Greater);
        assert_eq!(layout.compare(2, 1), Ordering::Less);
        assert_eq!(layout.compare(4, 4), Ordering::Equal);
    }

    // Tests invalid anchors sort after valid ones and tie with each other
    // Verified by ordering invalid anchors first
    #[test]
    fn test_compare_invalid() {
        let bitboard = sample_bitboard();
        let layout = GramLayout::new(bitboard.view(), 2);

        assert_eq!(layout.compare(3, 0), Ordering::Greater);
        assert_eq!(layout.compare(0, 3), Ordering::Less);
        assert_eq!(layout.compare(3, 11), Ordering::Equal);
    }

    // Tests identical windows at different anchors compare equal
    // Verified by breaking ties on the anchor index
    #[test]
    fn test_compare_identical_windows() {
        let bitboard = Array2::<u8>::ones((3, 3));
        let layout = GramLayout::new(bitboard.view(), 2);

        assert_eq!(layout.gram_size(), 2);
        assert_eq!(layout.compare(0, 4), Ordering::Equal);
    }
}
