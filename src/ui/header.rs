use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::session::Session;
use crate::ui::app::NAV;
use crate::ui::route::Route;
use crate::ui::theme::{ACCENT, GLOBAL_BORDER, HEADER_SEPARATOR, HEADER_TEXT, MUTED_TEXT};

/// Navigation tabs on the left, signed-in admin on the right.
pub struct Header<'a> {
    route: &'a Route,
    session: Option<&'a Session>,
}

impl<'a> Header<'a> {
    pub fn new(route: &'a Route, session: Option<&'a Session>) -> Self {
        Self { route, session }
    }

    pub fn widget(&self) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT);
        let separator_style = Style::default().fg(HEADER_SEPARATOR);
        let active_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(" Auction Admin ", active_style)];
        match self.session {
            Some(session) => {
                for route in NAV.iter() {
                    spans.push(Span::styled(" │ ", separator_style));
                    let style = if self.is_active(route) {
                        active_style
                    } else {
                        text_style
                    };
                    spans.push(Span::styled(route.title(), style));
                }
                spans.push(Span::styled("  │  ", separator_style));
                spans.push(Span::styled(
                    session.user.name.clone(),
                    Style::default().fg(MUTED_TEXT),
                ));
            }
            None => {
                spans.push(Span::styled(" │ ", separator_style));
                spans.push(Span::styled(self.route.title(), text_style));
            }
        }

        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }

    /// A detail screen highlights the tab of its list.
    fn is_active(&self, tab: &Route) -> bool {
        match (self.route, tab) {
            (Route::Detail(resource, _), Route::List(tab)) => resource == tab,
            (current, tab) => current == tab,
        }
    }
}
