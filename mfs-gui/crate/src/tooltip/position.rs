// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

/// Gap kept between the tooltip and the viewport edge or its element.
pub const OFFSET: f64 = 10.0;

/// Viewport relative box of the element a tooltip belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub bottom: f64,
}

/// Where a tooltip of `size` goes for `anchor`, as `(left, top)`.
///
/// Centered above the element, below it when there is no room above, and
/// pulled back inside the viewport horizontally.
pub fn place(anchor: Anchor, size: (f64, f64), viewport_width: f64) -> (f64, f64) {
    let (width, height) = size;

    let mut top = anchor.top - height - OFFSET;
    let mut left = anchor.left + (anchor.width - width) / 2.0;

    if top < 0.0 {
        top = anchor.bottom;
    }

    if left + width > viewport_width {
        left = viewport_width - width - OFFSET;
    } else if left < 0.0 {
        left = OFFSET;
    }

    (left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(left: f64, top: f64) -> Anchor {
        Anchor {
            left,
            top,
            width: 40.0,
            bottom: top + 20.0,
        }
    }

    #[test]
    fn test_above_and_centered() {
        assert_eq!(place(anchor(500.0, 300.0), (100.0, 50.0), 1000.0), (470.0, 240.0));
    }

    #[test]
    fn test_flips_below() {
        assert_eq!(place(anchor(500.0, 30.0), (100.0, 50.0), 1000.0), (470.0, 50.0));
    }

    #[test]
    fn test_clamps_right() {
        assert_eq!(place(anchor(960.0, 300.0), (100.0, 50.0), 1000.0), (890.0, 240.0));
    }

    #[test]
    fn test_clamps_left() {
        assert_eq!(place(anchor(0.0, 300.0), (100.0, 50.0), 1000.0), (10.0, 240.0));
    }
}
