// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! The 5x9 bitmap font axis labels are drawn with.

/// Glyph order of the sprite sheet.
const GLYPHS: &str = "0123456789.:kMGTPEZYmu% ";

/// Index of the blank glyph, used for anything the sheet lacks.
const BLANK: u32 = 23;

pub const GLYPH_WIDTH: f64 = 5.0;
pub const GLYPH_HEIGHT: f64 = 9.0;
/// Horizontal distance between two consecutive glyphs.
pub const ADVANCE: f64 = 6.0;

/// Sprite sheet with every glyph side by side.
pub const SPRITE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAH0AAAAJAQMAAAAl/bGxAAAABGdBTUEAALGPC/xhBQAAAAZQTFRFAAAAAAAApWe5zwAAAAF0Uk5TAEDm2GYAAAABYktHRACIBR1IAAAAhUlEQVQI12MolP1Yc7+4gcX1/vf/AswKPxi6lZQdGXscWPJUepgFmB06GHqZXKuYehxcrrH0sKz3AAp0srxkP1R8gNUt5TuH14kGoACHfJtKh4Obm0qLgNdJBqCAoKCbSkcHK1BAwetkQgdD+b+HlkeKOViOHmn/5/Ut4QcDCnBgYMAQAADFWizkl7UTcgAAAABJRU5ErkJggg==";

/// Position of `c` in the sprite sheet.
pub fn glyph(c: char) -> u32 {
    let c = match c {
        ',' => '.',
        'µ' => 'u',
        c => c,
    };

    GLYPHS
        .chars()
        .position(|x| x == c)
        .and_then(|x| u32::try_from(x).ok())
        .unwrap_or(BLANK)
}

/// Source x offset in the sheet and destination x offset for every glyph of `text`.
pub fn layout(text: &str) -> impl Iterator<Item = (f64, f64)> + '_ {
    text.chars()
        .enumerate()
        .map(|(i, c)| (f64::from(glyph(c)) * GLYPH_WIDTH, i as f64 * ADVANCE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph() {
        assert_eq!(glyph('0'), 0);
        assert_eq!(glyph('9'), 9);
        assert_eq!(glyph('.'), 10);
        assert_eq!(glyph(','), 10);
        assert_eq!(glyph('k'), 12);
        assert_eq!(glyph('µ'), 21);
        assert_eq!(glyph('u'), 21);
        assert_eq!(glyph('%'), 22);
        assert_eq!(glyph(' '), BLANK);
        assert_eq!(glyph('?'), BLANK);
    }

    #[test]
    fn test_layout() {
        let xs: Vec<_> = layout("1.5k").collect();

        assert_eq!(xs, vec![(5.0, 0.0), (50.0, 6.0), (25.0, 12.0), (60.0, 18.0)]);
    }
}
