use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

const GLYPH_ROWS: usize = 5;
const FILL: char = '█';

/// 3x5 block digits, `#` marks a filled cell.
const DIGITS: [[&str; GLYPH_ROWS]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

/// Horizontal and vertical cell scale for a font level. Level 1 is plain
/// text and has no glyph scale.
pub fn scale(level: u8) -> Option<(u16, u16)> {
    match level {
        0 | 1 => None,
        2 => Some((1, 1)),
        3 => Some((2, 1)),
        4 => Some((2, 2)),
        _ => Some((3, 2)),
    }
}

/// Score rendered as text rows at the given font level.
pub fn render_rows(value: u32, level: u8) -> Vec<String> {
    let text = value.to_string();
    let Some((sx, sy)) = scale(level) else {
        return vec![text];
    };

    let mut rows = Vec::with_capacity(GLYPH_ROWS * sy as usize);
    for r in 0..GLYPH_ROWS {
        let mut line = String::new();
        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = ch.to_digit(10).map(|d| DIGITS[d as usize]) else {
                continue;
            };
            if i > 0 {
                line.extend(std::iter::repeat_n(' ', sx as usize));
            }
            for cell in glyph[r].chars() {
                let c = if cell == '#' { FILL } else { ' ' };
                line.extend(std::iter::repeat_n(c, sx as usize));
            }
        }
        for _ in 0..sy {
            rows.push(line.clone());
        }
    }
    rows
}

/// Columns and rows needed to draw `value` at `level`.
pub fn rendered_size(value: u32, level: u8) -> (u16, u16) {
    let digits = value.to_string().len() as u16;
    match scale(level) {
        None => (digits, 1),
        Some((sx, sy)) => (digits * 3 * sx + (digits - 1) * sx, GLYPH_ROWS as u16 * sy),
    }
}

/// Largest level up to `level` that fits inside `area`.
pub fn fitting_level(value: u32, level: u8, area: Rect) -> u8 {
    let mut level = level.max(1);
    while level > 1 {
        let (w, h) = rendered_size(value, level);
        if w <= area.width && h <= area.height {
            break;
        }
        level -= 1;
    }
    level
}

/// A team score drawn in block digits, centered in its area. Steps down to a
/// smaller level when the area is too small.
pub struct BigScore {
    pub value: u32,
    pub level: u8,
    pub style: Style,
}

impl Widget for BigScore {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let level = fitting_level(self.value, self.level, area);
        let (w, h) = rendered_size(self.value, level);
        let x = area.x + area.width.saturating_sub(w) / 2;
        let y = area.y + area.height.saturating_sub(h) / 2;
        for (i, row) in render_rows(self.value, level).into_iter().enumerate() {
            let row_y = y + i as u16;
            if row_y >= area.bottom() {
                break;
            }
            buf.set_stringn(x, row_y, row, area.width as usize, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_is_plain_text() {
        assert_eq!(render_rows(11, 1), vec!["11".to_string()]);
        assert_eq!(rendered_size(11, 1), (2, 1));
    }

    #[test]
    fn level_two_draws_three_by_five_glyphs() {
        let rows = render_rows(7, 2);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], "███");
        assert_eq!(rows[4], "  █");
    }

    #[test]
    fn larger_levels_scale_cells() {
        let rows = render_rows(10, 4);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], rows[1]);
        assert_eq!(rows[0].chars().count() as u16, rendered_size(10, 4).0);
        assert_eq!(rendered_size(10, 5), (21, 10));
    }

    #[test]
    fn falls_back_when_area_is_small() {
        let area = Rect::new(0, 0, 8, 5);
        assert_eq!(fitting_level(3, 5, area), 3);
        assert_eq!(fitting_level(10, 5, Rect::new(0, 0, 4, 2)), 1);
    }

    #[test]
    fn widget_centers_digits() {
        let area = Rect::new(0, 0, 7, 5);
        let mut buf = Buffer::empty(area);
        BigScore {
            value: 1,
            level: 2,
            style: Style::default(),
        }
        .render(area, &mut buf);
        let top: String = (0..7)
            .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert_eq!(top, "   █   ");
    }
}
