use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

/// Width of [`title_rows`] in columns.
pub const TITLE_WIDTH: u16 = 47;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

/// Team 1 plays in green, team 2 in purple.
pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(21, 128, 61)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(126, 34, 206)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

/// Triangle wave over `0..height`, used to bounce the ball.
pub fn ball_row(tick: u64, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let period = 2 * h;
    let t = tick % period;
    (h.abs_diff(t)) as u16
}

/// A perforated ball; the holes rotate between frames.
pub fn pickleball_frame(frame: usize) -> [&'static str; 5] {
    const FRAMES: [[&str; 5]; FRAME_COUNT] = [
        [r"  .---.  ", r" / o   \ ", r"|   o  o|", r" \ o   / ", r"  '---'  "],
        [r"  .---.  ", r" /  o  \ ", r"|o    o |", r" \  o  / ", r"  '---'  "],
        [r"  .---.  ", r" /   o \ ", r"|o  o   |", r" \   o / ", r"  '---'  "],
        [r"  .---.  ", r" / o o \ ", r"|   o   |", r" \ o o / ", r"  '---'  "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        r" ___ ___ ___ _  ___    ___ ___   _   _    _    ",
        r"| _ \_ _/ __| |/ / |  | __| _ ) /_\ | |  | |   ",
        r"|  _/| | (__| ' <| |__| _|| _ \/ _ \| |__| |__ ",
        r"|_| |___\___|_|\_\____|___|___/_/ \_\____|____|",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rows_share_width() {
        for row in title_rows() {
            assert_eq!(row.chars().count() as u16, TITLE_WIDTH);
        }
    }

    #[test]
    fn ball_frames_are_rectangular() {
        for frame in 0..FRAME_COUNT {
            for row in pickleball_frame(frame) {
                assert_eq!(row.chars().count(), 9);
            }
        }
    }

    #[test]
    fn ball_row_bounces() {
        let rows: Vec<u16> = (0..9).map(|t| ball_row(t, 5)).collect();
        assert_eq!(rows, [4, 3, 2, 1, 0, 1, 2, 3, 4]);
        assert_eq!(ball_row(3, 1), 0);
    }
}
