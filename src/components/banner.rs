use crate::components::banner_frames::{
    BannerColor, BannerTheme, TITLE_WIDTH, ball_row, pickleball_frame, resolve, title_rows,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

/// Rows the full banner needs inside its border: the ball plus a subtitle.
pub const BANNER_ROWS: u16 = 6;

pub struct AnimatedBanner<'a> {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    /// Localized app name shown under the title.
    pub subtitle: &'a str,
}

impl<'a> Widget for AnimatedBanner<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" PICKLEBALL "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Primary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < TITLE_WIDTH + 12 || inner.height < BANNER_ROWS {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    render_centered(
        Line::from(Span::styled("PICKLEBALL", resolve(BannerColor::Accent, banner.theme))),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(
                banner.subtitle,
                resolve(BannerColor::Primary, banner.theme),
            )),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left_ball = pickleball_frame(banner.frame);
    let right_ball = pickleball_frame((banner.frame + 2) % FRAME_COUNT);
    let ball_y = ball_row(banner.tick, 5);
    let show_right_ball = inner.width >= TITLE_WIDTH + 24;

    for row in 0..5u16 {
        let y = inner.y + row;
        let ball_style = if row == ball_y {
            resolve(BannerColor::Accent, banner.theme)
        } else {
            resolve(BannerColor::Shadow, banner.theme)
        };
        let title_row = title.get(row as usize).copied().unwrap_or_default();

        let mut spans = vec![
            Span::styled(left_ball[row as usize], ball_style),
            Span::raw(" "),
            Span::styled(
                format!("{title_row:<width$}", width = TITLE_WIDTH as usize),
                resolve(BannerColor::Primary, banner.theme),
            ),
        ];
        if show_right_ball {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(right_ball[row as usize], ball_style));
        }
        render_centered(Line::from(spans), inner, y, buf);
    }

    render_centered(
        Line::from(Span::styled(
            format!(" {} ", banner.subtitle),
            resolve(BannerColor::Secondary, banner.theme),
        )),
        inner,
        inner.y + 5,
        buf,
    );
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let text = span.content.as_ref();
        let style: Style = span.style;
        let mut run = String::new();
        for ch in text.chars() {
            if cx >= limit {
                break;
            }
            run.push(ch);
            cx += 1;
        }
        let start = cx.saturating_sub(run.chars().count() as u16);
        if !run.is_empty() {
            buf.set_string(start, y, run, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn narrow_area_renders_compact_title() {
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            frame: 0,
            tick: 0,
            theme: BannerTheme::Dark,
            subtitle: "Scorekeeper",
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 1).contains("PICKLEBALL"));
        assert!(row_text(&buf, 2).contains("Scorekeeper"));
    }

    #[test]
    fn wide_area_renders_ascii_title() {
        let area = Rect::new(0, 0, 100, 8);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            frame: 1,
            tick: 3,
            theme: BannerTheme::Dark,
            subtitle: "Scorekeeper",
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 4).contains(r"|_| |___\___|"));
        assert!(row_text(&buf, 6).contains("Scorekeeper"));
    }
}
