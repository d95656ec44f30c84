/*!
 * Tests for on-screen layout
 */

use kbp2ass::geometry::{Alignment, Layout};

#[test]
fn test_horizontalPosition_withoutBorder_shouldUseCdgWidth() {
    let layout = Layout::new(false);

    assert_eq!(layout.horizontal_position(Alignment::Center, 0, 2, 2), 144);
    assert_eq!(layout.horizontal_position(Alignment::Left, 4, 2, 5), 6);
    assert_eq!(layout.horizontal_position(Alignment::Right, 0, 2, 5), 283);
}

#[test]
fn test_horizontalPosition_withBorder_shouldAddSidePadding() {
    let layout = Layout::new(true);

    assert_eq!(layout.horizontal_position(Alignment::Center, 0, 2, 2), 150);
    assert_eq!(layout.horizontal_position(Alignment::Left, 4, 2, 2), 12);
    assert_eq!(layout.horizontal_position(Alignment::Right, 0, 2, 2), 292);
}

/// The raw offset from the header is added as is, centre lines ignore margins
#[test]
fn test_horizontalPosition_withCenterAndOffset_shouldIgnoreMargins() {
    let layout = Layout::new(false);
    assert_eq!(layout.horizontal_position(Alignment::Center, -10, 50, 60), 134);
}

#[test]
fn test_layoutDimensions_shouldDependOnBorder() {
    assert_eq!((Layout::new(false).total_width(), Layout::new(false).total_height()), (288, 192));
    assert_eq!((Layout::new(true).total_width(), Layout::new(true).total_height()), (300, 216));
}

#[test]
fn test_alignment_assCodes_shouldMatchTopRow() {
    assert_eq!(Alignment::Left.ass_code(), 7);
    assert_eq!(Alignment::Center.ass_code(), 8);
    assert_eq!(Alignment::Right.ass_code(), 9);
}

/// Out-of-range offsets and margins saturate instead of overflowing
#[test]
fn test_horizontalPosition_withExtremeValues_shouldSaturate() {
    let layout = Layout::new(true);

    assert_eq!(layout.horizontal_position(Alignment::Center, i64::MAX, 0, 0), i64::MAX);
    assert_eq!(layout.horizontal_position(Alignment::Left, 0, i64::MAX, 0), i64::MAX);
    assert_eq!(layout.line_spacing(i64::MAX), i64::MAX);
    assert_eq!(layout.top_margin(i64::MAX), i64::MAX);
}
