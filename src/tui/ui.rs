//! Rendering of one [`SearchView`] frame.
//!
//! Drawing also records where the input, result rows and recent entries
//! landed on screen, so pointer presses can be mapped back to them.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::styles;
use crate::core::pointer::Region;
use crate::core::session::{Focus, SearchState, SearchView};
use crate::utils::text::{candidate_line, truncate_text_unicode};

const HEADER_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const STATUS_BAR_HEIGHT: u16 = 3;
const CODE_COLUMN_WIDTH: usize = 8;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Input,
    Candidate(usize),
    Recent(usize),
}

/// Screen placement of the search box from the last drawn frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenLayout {
    pub input: Region,
    pub results: Region,
    pub recent: Region,
    /// Visible candidate rows as (candidate index, row)
    pub candidate_rows: Vec<(usize, Region)>,
    pub recent_rows: Vec<Region>,
}

impl ScreenLayout {
    /// Regions that count as inside the search box.
    pub fn hit_regions(&self) -> Vec<Region> {
        vec![self.input, self.results, self.recent]
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        if let Some((index, _)) = self
            .candidate_rows
            .iter()
            .find(|(_, region)| region.contains(column, row))
        {
            return Some(Hit::Candidate(*index));
        }
        if let Some(index) = self
            .recent_rows
            .iter()
            .position(|region| region.contains(column, row))
        {
            return Some(Hit::Recent(index));
        }
        if self.input.contains(column, row) {
            return Some(Hit::Input);
        }
        None
    }
}

fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}

pub fn draw(frame: &mut Frame, view: &SearchView, layout: &mut ScreenLayout) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[2]);

    draw_header(frame, view, chunks[0]);
    draw_input(frame, view, chunks[1]);
    draw_results(frame, view, body[0], layout);
    draw_recent(frame, view, body[1], layout);
    draw_status_bar(frame, view, chunks[3]);

    layout.input = region(chunks[1]);
    layout.results = region(body[0]);
    layout.recent = region(body[1]);
}

fn draw_header(frame: &mut Frame, view: &SearchView, area: Rect) {
    let indicator = match view.state {
        SearchState::Idle => Span::styled(" ○ ", styles::TEXT_DIM),
        SearchState::Debouncing | SearchState::Fetching => {
            Span::styled(" ◐ ", styles::TEXT_WARNING)
        }
        SearchState::Settled => Span::styled(" ● ", styles::TEXT_SUCCESS),
        SearchState::Failed => Span::styled(" ✗ ", styles::TEXT_ERROR),
    };

    let line = Line::from(vec![
        indicator,
        Span::raw(view.state.label()),
        Span::styled(" │ ", styles::TEXT_DIM),
        Span::raw(format!("{} candidate(s)", view.candidates.len())),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .title(" sick-search ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::BORDER_UNFOCUSED),
    );
    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, view: &SearchView, area: Rect) {
    let focused = view.focus == Focus::Input;
    let input = Paragraph::new(view.query.as_str()).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );
    frame.render_widget(input, area);

    if focused && area.width > 2 && area.height > 2 {
        let max_x = area.x + area.width - 2;
        let x = (area.x + 1).saturating_add(view.query.width() as u16).min(max_x);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_results(frame: &mut Frame, view: &SearchView, area: Rect, layout: &mut ScreenLayout) {
    let title = if view.loading {
        " Results (searching...) ".to_string()
    } else {
        " Results ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::border_style(view.focus == Focus::List));
    let inner = block.inner(area);

    layout.candidate_rows.clear();

    let message = if !view.list_open || !view.has_search_started() {
        Some(Span::styled(
            "Type to search. Tab opens the list.",
            styles::TEXT_DIM,
        ))
    } else if view.error {
        let detail = view.error_message.as_deref().unwrap_or("unknown error");
        Some(Span::styled(
            format!("Lookup failed: {}", detail),
            styles::TEXT_ERROR,
        ))
    } else if view.candidates.is_empty() && view.state != SearchState::Settled {
        Some(Span::styled("Searching...", styles::TEXT_WARNING))
    } else if view.candidates.is_empty() {
        Some(Span::styled("No matches", styles::TEXT_DIM))
    } else {
        None
    };

    if let Some(message) = message {
        frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
        return;
    }

    let text_width = (inner.width as usize).saturating_sub(styles::HIGHLIGHT_SYMBOL.width());
    let items: Vec<ListItem> = view
        .candidates
        .iter()
        .map(|c| ListItem::new(candidate_line(&c.code, &c.name, CODE_COLUMN_WIDTH, text_width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::row_highlight_style())
        .highlight_symbol(styles::HIGHLIGHT_SYMBOL);

    let mut state = ListState::default().with_selected(view.selected);
    frame.render_stateful_widget(list, area, &mut state);

    let offset = state.offset();
    for index in offset..view.candidates.len() {
        let row = inner.y as usize + (index - offset);
        if row >= (inner.y + inner.height) as usize {
            break;
        }
        layout
            .candidate_rows
            .push((index, Region::new(inner.x, row as u16, inner.width, 1)));
    }
}

fn draw_recent(frame: &mut Frame, view: &SearchView, area: Rect, layout: &mut ScreenLayout) {
    let block = Block::default()
        .title(" Recent ")
        .borders(Borders::ALL)
        .border_style(styles::BORDER_UNFOCUSED);
    let inner = block.inner(area);

    layout.recent_rows.clear();

    if view.recent.is_empty() {
        let empty = Paragraph::new(Span::styled("No recent searches", styles::TEXT_DIM))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = (inner.width as usize).saturating_sub(4);
    let items: Vec<ListItem> = view
        .recent
        .iter()
        .enumerate()
        .map(|(i, query)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), styles::KEY_HINT),
                Span::raw(truncate_text_unicode(query, width)),
            ]))
        })
        .collect();

    for index in 0..view.recent.len().min(inner.height as usize) {
        layout
            .recent_rows
            .push(Region::new(inner.x, inner.y + index as u16, inner.width, 1));
    }

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, view: &SearchView, area: Rect) {
    let bindings = [
        ("↑↓", "Nav"),
        ("Enter", "Commit"),
        ("Tab", "List"),
        ("Esc", "Close"),
        ("^C", "Quit"),
    ];

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", styles::TEXT_DIM));
        }
        spans.push(Span::styled(format!(" {} ", key), styles::KEY_HINT));
        spans.push(Span::raw(*action));
    }

    if let Some(commit) = &view.last_commit {
        let message = match &commit.candidate {
            Some(c) => format!("Selected {} {}", c.code, c.name),
            None => format!("Searched '{}'", commit.query),
        };
        spans.push(Span::styled(" │ ", styles::TEXT_DIM));
        spans.push(Span::styled(message, styles::TEXT_SUCCESS));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::BORDER_UNFOCUSED),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Candidate;
    use ratatui::{Terminal, backend::TestBackend};

    fn settled_view(candidates: Vec<Candidate>) -> SearchView {
        SearchView {
            query: "asthma".to_string(),
            state: SearchState::Settled,
            loading: false,
            error: false,
            error_message: None,
            candidates,
            selected: None,
            recent: vec!["flu".to_string(), "asthma".to_string()],
            focus: Focus::Input,
            list_open: true,
            last_commit: None,
        }
    }

    fn render(view: &SearchView) -> (String, ScreenLayout) {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut layout = ScreenLayout::default();
        terminal.draw(|frame| draw(frame, view, &mut layout)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        (text, layout)
    }

    #[test]
    fn test_draw_lists_candidates_and_records_rows() {
        let view = settled_view(vec![
            Candidate::new("J45", "Asthma"),
            Candidate::new("J45.0", "Allergic asthma"),
        ]);
        let (text, layout) = render(&view);

        assert!(text.contains("Allergic asthma"));
        assert_eq!(layout.candidate_rows.len(), 2);
        assert_eq!(layout.recent_rows.len(), 2);

        let (_, second_row) = layout.candidate_rows[1];
        assert_eq!(
            layout.hit_test(second_row.x + 1, second_row.y),
            Some(Hit::Candidate(1))
        );
    }

    #[test]
    fn test_closed_list_has_no_candidate_rows() {
        let mut view = settled_view(vec![Candidate::new("J45", "Asthma")]);
        view.list_open = false;
        let (text, layout) = render(&view);

        assert!(!text.contains("J45"));
        assert!(layout.candidate_rows.is_empty());
    }

    #[test]
    fn test_failed_state_shows_error() {
        let mut view = settled_view(Vec::new());
        view.state = SearchState::Failed;
        view.error = true;
        view.error_message = Some("connection refused".to_string());
        let (text, _) = render(&view);

        assert!(text.contains("Lookup failed"));
    }

    #[test]
    fn test_hit_test_outside_everything() {
        let view = settled_view(vec![Candidate::new("J45", "Asthma")]);
        let (_, layout) = render(&view);

        // Header row is not part of the search box
        assert_eq!(layout.hit_test(1, 1), None);
        assert!(
            !layout
                .hit_regions()
                .iter()
                .any(|region| region.contains(1, 1))
        );
        assert_eq!(layout.hit_test(layout.input.x + 2, layout.input.y + 1), Some(Hit::Input));
    }
}
