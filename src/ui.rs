//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads state; the
//! one exception is the list cursors, which ratatui updates while scrolling.
//!
//! ## For contributors
//!
//! * The layout is a three-row split: tab header, the main list, and a
//!   one-line status bar.  Share menus and the topic detail view are popups
//!   drawn over the list.
//! * A popup whose target no longer exists (e.g. after a refresh) is simply
//!   not drawn.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, FavoriteStatus};
use crate::html::strip_html;
use crate::share::SharePlatform;
use crate::source::{format_date, NewsItem, Topic, TopicArticle};
use crate::view::Tab;

/// Longest summary excerpt shown under a list row.
const EXCERPT_CHARS: usize = 140;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(app, frame, header_area);
    if app.loading {
        draw_loading(frame, main_area);
    } else {
        match app.view.tab {
            Tab::Popular => draw_topic_list(app, frame, main_area),
            Tab::All | Tab::Favorites => draw_news_list(app, frame, main_area),
        }
        draw_share_menu(app, frame, main_area);
        draw_topic_detail(app, frame, main_area);
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_header(app: &App, frame: &mut Frame, area: Rect) {
    let favorites = app.favorites().count();
    let titles = Tab::ALL.iter().map(|tab| match tab {
        Tab::Favorites => format!(" {} ({favorites}) ", tab.title()),
        _ => format!(" {} ", tab.title()),
    });

    let tabs = Tabs::new(titles)
        .select(app.view.tab.index())
        .block(
            Block::default()
                .title(" AI Pulse ")
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

/// Render the scrollable news list for the All / Favorites tabs.
fn draw_news_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let rows: Vec<ListItem> = app
        .visible_news()
        .into_iter()
        .map(|item| news_row(item, app.favorite_status(item.id)))
        .collect();

    let title = format!(" {} ", app.view.tab.title());
    if rows.is_empty() {
        let hint = match app.view.tab {
            Tab::Favorites => "No favorites yet. Press f on an article to star it.",
            _ => "No articles. Press r to refresh.",
        };
        draw_empty(frame, area, &title, hint);
        return;
    }

    frame.render_stateful_widget(styled_list(rows, &title), area, &mut app.list_state);
}

fn news_row(item: &NewsItem, favorite: Option<FavoriteStatus>) -> ListItem<'static> {
    let date_str = item
        .published_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no date".into());

    let star = if item.is_favorite {
        Span::styled("★ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    };
    let sync = match favorite {
        Some(FavoriteStatus::Pending) => Span::styled(" …", Style::default().fg(Color::DarkGray)),
        Some(FavoriteStatus::Failed(_)) => Span::styled(" !", Style::default().fg(Color::Red)),
        _ => Span::raw(""),
    };

    let headline = Line::from(vec![
        star,
        Span::styled(format!("{date_str:<11}"), Style::default().fg(Color::DarkGray)),
        Span::styled(item.title.clone(), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(format!("[{}]", item.source_name), Style::default().fg(Color::Cyan)),
        sync,
    ]);
    ListItem::new(vec![headline, excerpt_line(item.summary.as_deref())])
}

/// Render the topic cluster list for the Popular tab.
fn draw_topic_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let rows: Vec<ListItem> = app.topics.iter().map(topic_row).collect();

    let title = format!(" {} ", Tab::Popular.title());
    if rows.is_empty() {
        draw_empty(frame, area, &title, "No trending topics yet.");
        return;
    }

    frame.render_stateful_widget(styled_list(rows, &title), area, &mut app.list_state);
}

fn topic_row(topic: &Topic) -> ListItem<'static> {
    let headline = Line::from(vec![
        Span::styled(
            format!("Score {:<7.1}", topic.popularity_score),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(topic.title.clone(), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(
            format!("{} sources", topic.articles.len()),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    ListItem::new(vec![headline, excerpt_line(topic.summary.as_deref())])
}

fn excerpt_line(summary: Option<&str>) -> Line<'static> {
    let text = strip_html(summary);
    Line::from(Span::styled(
        format!("   {}", truncate(text.trim(), EXCERPT_CHARS)),
        Style::default().fg(Color::DarkGray),
    ))
}

fn styled_list<'a>(rows: Vec<ListItem<'a>>, title: &str) -> List<'a> {
    List::new(rows)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ")
}

fn draw_empty(frame: &mut Frame, area: Rect, title: &str, hint: &str) {
    let empty = Paragraph::new(hint.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL),
        );
    frame.render_widget(empty, area);
}

/// Render the open share menu, if its target still exists.
fn draw_share_menu(app: &App, frame: &mut Frame, area: Rect) {
    let Some((_, _, title)) = app.share_target() else {
        return;
    };

    let mut lines: Vec<Line> = SharePlatform::ALL
        .iter()
        .map(|platform| {
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", platform.hotkey()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(platform.name()),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        " Esc to cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = popup_area(area, 50, lines.len() as u16 + 2);
    let menu = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" Share: {} ", truncate(title, 40)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(menu, popup);
}

/// Render the topic detail popup, if its topic still exists.
fn draw_topic_detail(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(topic) = app.detail_topic() else {
        return;
    };

    let popup = popup_area(area, 80, area.height.saturating_sub(2));
    let block = Block::default()
        .title(format!(" {} ", topic.title))
        .title_bottom(Line::from(" Enter: open article  Esc: close ").alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let [about_area, articles_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(1)]).areas(inner);

    let about = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("Score {:.1}", topic.popularity_score),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} sources", topic.articles.len()),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(strip_html(topic.summary.as_deref())),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(about, about_area);

    if topic.articles.is_empty() {
        let none = Paragraph::new("No additional articles found in this cluster.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(none, articles_area);
        return;
    }

    let rows: Vec<ListItem> = topic
        .articles
        .iter()
        .map(|article: &TopicArticle| {
            let source = article
                .source_id
                .map(|id| format!("Source #{id}"))
                .unwrap_or_else(|| "Source ?".into());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<11}", format_date(article.published_at.as_deref())),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(article.title.clone(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(source, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(rows)
        .block(Block::default().title(" Articles ").borders(Borders::TOP))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, articles_area, &mut app.detail_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.news.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  1-3: tabs  f: star  s: share  y: copy  o: open  r: refresh"),
    ]));
    frame.render_widget(status, area);
}

/// A rectangle `percent_x` wide and `height` tall, centred in `area`.
fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(percent_x),
        Constraint::Fill(1),
    ])
    .areas(row);
    popup
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

// ---------------------------------------------------------------------------
// Tests (rendering smoke tests)
// ---------------------------------------------------------------------------
