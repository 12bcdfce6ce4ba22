use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::Resource;
use crate::ui::app::{App, Screen};
use crate::ui::theme::{GLOBAL_BORDER, HEADER_TEXT};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Footer;

impl Footer {
    /// Key hints for whatever currently has the keyboard.
    pub fn hints(app: &App) -> &'static str {
        if app.confirm().is_some() {
            return " y/Enter: Confirm │ n/Esc: Cancel";
        }
        if app.edit().is_some() {
            return " Tab/↑↓: Field │ ←→: Option │ Enter: Save │ Esc: Close";
        }
        if app.search_active() {
            return " Type to search │ Enter: Apply │ Esc: Cancel";
        }
        match app.screen() {
            Screen::SignIn(_) => " Tab: Next field │ Enter: Sign in │ Esc: Quit",
            Screen::Dashboard(_) => {
                " ↑↓: Select │ Enter: Expand │ r: Range │ R: Reload │ Tab: Sections │ p: Profile │ L: Sign out │ q: Quit"
            }
            Screen::Profile(_) => " e: Edit │ R: Reload │ Esc: Back │ L: Sign out │ q: Quit",
            Screen::List(list) if list.resource() == Resource::User => {
                " ↑↓: Select │ Enter: Open │ /: Search │ f: Filter │ s: Page size │ [ ]: Page │ u: Unlock │ d: Delete │ R: Reload │ q: Quit"
            }
            Screen::List(_) => {
                " ↑↓: Select │ Enter: Open │ /: Search │ f: Filter │ s: Page size │ [ ]: Page │ d: Delete │ R: Reload │ Tab: Sections │ q: Quit"
            }
            Screen::Detail(_) => {
                " e: Edit │ u: Unlock │ r: Refund │ R: Reload │ Esc: Back │ q: Quit"
            }
            Screen::NotFound(_) => " Esc: Dashboard │ q: Quit",
        }
    }

    pub fn widget(app: &App, area: Rect) -> Paragraph<'static> {
        let hints = Self::hints(app);
        let version = format!("v{} ", VERSION);

        let hints_width = hints.chars().count();
        let version_width = version.chars().count();
        let content_width = area.width.saturating_sub(2) as usize;
        let padding = content_width
            .saturating_sub(hints_width)
            .saturating_sub(version_width);

        let text_style = Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM);

        let line = Line::from(vec![
            Span::styled(hints, text_style),
            Span::styled(" ".repeat(padding), text_style),
            Span::styled(version, text_style),
        ]);

        Paragraph::new(line)
            .style(text_style)
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GLOBAL_BORDER)),
            )
    }
}
