use std::f64::consts::{FRAC_PI_2, TAU};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::routing::ViewComponentId;
use crate::state::{
    AppState, CatalogEntry, DetailState, EntryDetail, FocusArea, CARD_WIDTH, SKELETON_CARDS,
};
use crate::theme::{Palette, PaletteSwitch};

const CARD_HEIGHT: u16 = 4;
const MODAL_WIDTH: u16 = 76;
const MODAL_HEIGHT: u16 = 20;
/// Stats are drawn against at least this ceiling so small values stay small.
const RADAR_SCALE: u16 = 255;

pub struct ViewUi {
    status_bar: StatusBar,
    palette: PaletteSwitch,
}

impl ViewUi {
    pub fn new(palette: PaletteSwitch) -> Self {
        Self {
            status_bar: StatusBar::new(),
            palette,
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<ViewComponentId>,
    ) {
        let layout = ViewLayout::new(area, state);
        event_ctx.set_component_area(ViewComponentId::Grid, layout.grid);
        event_ctx.set_component_area(ViewComponentId::Favorites, layout.favorites);
        if state.search.active {
            event_ctx.set_component_area(ViewComponentId::Search, layout.header);
        } else {
            event_ctx.component_areas.remove(&ViewComponentId::Search);
        }
        match layout.modal {
            Some(modal) => event_ctx.set_component_area(ViewComponentId::Detail, modal),
            None => {
                event_ctx.component_areas.remove(&ViewComponentId::Detail);
            }
        }

        draw(
            frame,
            &layout,
            state,
            self.palette.palette(),
            &mut self.status_bar,
        );
    }

    pub fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_grid_event(event, state)
    }

    pub fn handle_favorites_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_favorites_event(event, state)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_detail_event(event, state)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }
}

/// Screen regions for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewLayout {
    pub area: Rect,
    pub header: Rect,
    pub banner: Option<Rect>,
    pub grid: Rect,
    pub favorites: Rect,
    pub footer: Rect,
    pub modal: Option<Rect>,
}

impl ViewLayout {
    pub fn new(area: Rect, state: &AppState) -> Self {
        let banner_height = if state.error.is_some() { 3 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(banner_height),
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);
        Self {
            area,
            header: rows[0],
            banner: state.error.as_ref().map(|_| rows[1]),
            grid: rows[2],
            favorites: rows[3],
            footer: rows[4],
            modal: state
                .is_modal_open()
                .then(|| centered(MODAL_WIDTH, MODAL_HEIGHT, area)),
        }
    }
}

/// Draw a full frame without touching event routing.
pub fn draw(
    frame: &mut Frame,
    layout: &ViewLayout,
    state: &AppState,
    palette: Palette,
    status_bar: &mut StatusBar,
) {
    let base = Block::default().style(Style::default().bg(palette.bg).fg(palette.text));
    frame.render_widget(base, layout.area);

    render_header(frame, layout.header, state, palette);
    if let (Some(area), Some(message)) = (layout.banner, state.error.as_deref()) {
        render_banner(frame, area, message, palette);
    }
    if state.is_list_loading() {
        render_skeleton(frame, layout.grid, state, palette);
    } else {
        render_grid(frame, layout.grid, state, palette);
    }
    render_favorites(frame, layout.favorites, state, palette);
    render_footer(frame, layout.footer, state, palette, status_bar);

    if let (Some(area), Some(detail)) = (layout.modal, state.detail.shown()) {
        render_detail(frame, area, state, detail, palette);
    }
}

pub fn handle_global_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => {
            let action = match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('/') => Action::SearchStart,
                KeyCode::Char('t') => Action::ThemeToggle,
                KeyCode::Char('n') => Action::PageNext,
                KeyCode::Char('p') => Action::PagePrev,
                KeyCode::Tab if !state.is_modal_open() => Action::FocusNext,
                _ => return HandlerResponse::ignored(),
            };
            HandlerResponse::action(action)
        }
        _ => HandlerResponse::ignored(),
    }
}

pub fn handle_grid_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let EventKind::Key(key) = event else {
        return HandlerResponse::ignored();
    };
    let actions = match key.code {
        KeyCode::Left | KeyCode::Char('h') => vec![Action::SelectionMove(-1)],
        KeyCode::Right | KeyCode::Char('l') => vec![Action::SelectionMove(1)],
        KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectionRow(-1)],
        KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectionRow(1)],
        KeyCode::Enter => selected_name(state)
            .map(|name| vec![Action::DetailOpen(name)])
            .unwrap_or_default(),
        KeyCode::Char('f') => selected_name(state)
            .map(|name| vec![Action::FavoriteToggle(name)])
            .unwrap_or_default(),
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_favorites_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let EventKind::Key(key) = event else {
        return HandlerResponse::ignored();
    };
    let index = state.favorite_index;
    let favorite = state.selected_favorite().map(str::to_string);
    let actions = match key.code {
        KeyCode::Left | KeyCode::Char('h') if index > 0 => vec![Action::FavoriteSelect(index - 1)],
        KeyCode::Right | KeyCode::Char('l') => vec![Action::FavoriteSelect(index + 1)],
        KeyCode::Enter => favorite.map(|name| vec![Action::DetailOpen(name)]).unwrap_or_default(),
        KeyCode::Char('f') => favorite
            .map(|name| vec![Action::FavoriteToggle(name)])
            .unwrap_or_default(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Esc => vec![Action::FocusSet(FocusArea::Grid)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_detail_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let EventKind::Key(key) = event else {
        return HandlerResponse::ignored();
    };
    let actions = match key.code {
        KeyCode::Esc | KeyCode::Char('c') => vec![Action::DetailClose],
        KeyCode::Char('f') => state
            .detail
            .shown()
            .map(|detail| vec![Action::FavoriteToggle(detail.name.clone())])
            .unwrap_or_default(),
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => search_key(key),
        _ => vec![],
    };
    handler_response(actions)
}

fn search_key(key: &KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Esc => vec![Action::SearchCancel],
        KeyCode::Enter => vec![Action::SearchSubmit],
        KeyCode::Backspace => vec![Action::SearchBackspace],
        KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
        _ => vec![],
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn selected_name(state: &AppState) -> Option<String> {
    state.selected_entry().map(|entry| entry.name.clone())
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, palette: Palette) {
    let title_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let theme_label = if state.dark { "🌙 Dark" } else { "☀️ Light" };
    let search = if state.search.active {
        Span::styled(
            format!("Search: {}_", state.search.query),
            Style::default().fg(palette.accent),
        )
    } else {
        Span::styled("/ to search by name", Style::default().fg(palette.dim))
    };

    let text = Text::from(vec![
        Line::from(vec![
            Span::styled("Pokédex", title_style),
            Span::raw("   "),
            search,
        ]),
        Line::from(vec![
            Span::styled(
                "Enter for details. f to favorite.",
                Style::default().fg(palette.dim),
            ),
            Span::raw("   "),
            Span::styled(format!("t {theme_label}"), Style::default().fg(palette.gold)),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel).fg(palette.text))
        .border_style(Style::default().fg(palette.dim));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_banner(frame: &mut Frame, area: Rect, message: &str, palette: Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error_fg))
        .style(Style::default().bg(palette.error_bg).fg(palette.error_fg));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn grid_block(state: &AppState, palette: Palette) -> Block<'static> {
    let mut title = String::from(" Pokémon ");
    if state.can_page_prev() {
        title.push_str("◀ p ");
    }
    if state.can_page_next() {
        title.push_str("n ▶ ");
    }
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(palette.panel).fg(palette.text))
        .border_style(focus_border(state, FocusArea::Grid, palette))
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState, palette: Palette) {
    let block = grid_block(state, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.list.is_empty() {
        let message = match state.list_status {
            crate::state::ListStatus::Errored => "Nothing to show.",
            _ => "No Pokémon on this page.",
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(palette.dim)),
            inner,
        );
        return;
    }

    let columns = fitted_columns(inner, state);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = state.selected_index / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (index, entry) in state.list.iter().enumerate().skip(first_row * columns) {
        let Some(cell) = card_cell(inner, index - first_row * columns, columns) else {
            break;
        };
        let selected = index == state.selected_index && state.focus == FocusArea::Grid;
        render_card(frame, cell, entry, state, selected, palette);
    }
}

// The stored terminal size can be stale before the first resize event.
fn fitted_columns(inner: Rect, state: &AppState) -> usize {
    let fit = (inner.width / CARD_WIDTH).max(1) as usize;
    state.grid_columns().min(fit)
}

fn card_cell(inner: Rect, slot: usize, columns: usize) -> Option<Rect> {
    let row = (slot / columns) as u16;
    let column = (slot % columns) as u16;
    let x = inner.x + column * CARD_WIDTH;
    let y = inner.y + row * CARD_HEIGHT;
    if y + CARD_HEIGHT > inner.y + inner.height || x + CARD_WIDTH > inner.x + inner.width {
        return None;
    }
    Some(Rect::new(x, y, CARD_WIDTH, CARD_HEIGHT))
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    entry: &CatalogEntry,
    state: &AppState,
    selected: bool,
    palette: Palette,
) {
    let star = if state.favorites.contains(&entry.name) {
        Span::styled(" ★", Style::default().fg(palette.gold))
    } else {
        Span::raw("")
    };
    let id = entry.id().map(|id| format!("#{id}")).unwrap_or_default();
    let text = Text::from(vec![
        Line::from(vec![
            Span::styled(
                capitalize(&entry.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            star,
        ]),
        Line::from(Span::styled(id, Style::default().fg(palette.dim))),
    ]);
    let (bg, border) = if selected {
        (palette.highlight, palette.accent)
    } else {
        (palette.card, palette.dim)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg).fg(palette.text));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_skeleton(frame: &mut Frame, area: Rect, state: &AppState, palette: Palette) {
    let block = grid_block(state, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pulse = if (state.tick / 4) % 2 == 0 {
        palette.card
    } else {
        palette.highlight
    };
    let columns = fitted_columns(inner, state);
    for slot in 0..SKELETON_CARDS {
        let Some(cell) = card_cell(inner, slot, columns) else {
            break;
        };
        let text = Text::from(vec![
            Line::from("░".repeat(12)),
            Line::from("░".repeat(5)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.dim))
            .style(Style::default().bg(pulse).fg(palette.dim));
        frame.render_widget(Paragraph::new(text).block(block), cell);
    }
}

fn render_favorites(frame: &mut Frame, area: Rect, state: &AppState, palette: Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Favorites ")
        .style(Style::default().bg(palette.panel).fg(palette.text))
        .border_style(focus_border(state, FocusArea::Favorites, palette));

    let line = if state.favorites.is_empty() {
        Line::from(Span::styled(
            "No favorites yet. Press f on a card.",
            Style::default().fg(palette.dim),
        ))
    } else {
        let focused = state.focus == FocusArea::Favorites;
        let mut spans = Vec::new();
        for (index, name) in state.favorites.all().iter().enumerate() {
            let style = if focused && index == state.favorite_index {
                Style::default()
                    .bg(palette.highlight)
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.gold)
            };
            spans.push(Span::styled(format!(" ★ {} ", capitalize(name)), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    detail: &EntryDetail,
    palette: Palette,
) {
    frame.render_widget(Clear, area);

    let mut title = format!(" {} ", capitalize(&detail.name));
    if let DetailState::Opening { name, .. } = &state.detail {
        title.push_str(&format!("(loading {name}...) "));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(" Esc close  f favorite ")
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.panel).fg(palette.text));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let favorited = state.favorites.contains(&detail.name);
    frame.render_widget(
        Paragraph::new(detail_text(detail, favorited, palette)).wrap(Wrap { trim: false }),
        columns[0],
    );
    render_radar(frame, columns[1], detail, palette);
}

fn detail_text(detail: &EntryDetail, favorited: bool, palette: Palette) -> Text<'static> {
    let badge = if favorited {
        Span::styled("★ Favorited", Style::default().fg(palette.gold))
    } else {
        Span::styled("☆ Add Favorite", Style::default().fg(palette.dim))
    };

    let mut chips = Vec::new();
    for category in &detail.categories {
        chips.push(Span::styled(
            format!(" {} ", category.to_ascii_uppercase()),
            Style::default().bg(palette.highlight).fg(palette.text),
        ));
        chips.push(Span::raw(" "));
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{:03} ", detail.id),
                Style::default().fg(palette.dim),
            ),
            Span::styled(
                capitalize(&detail.name),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(badge),
        Line::from(""),
        Line::from(chips),
        Line::from(""),
        Line::from(format!(
            "Height: {} m • Weight: {} kg",
            detail.height_metres(),
            detail.weight_kilograms()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Abilities",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if detail.abilities.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none listed",
            Style::default().fg(palette.dim),
        )));
    }
    for ability in &detail.abilities {
        lines.push(Line::from(format!(
            "  {}",
            capitalize(&crate::state::humanize(ability))
        )));
    }
    lines.push(Line::from(""));
    let artwork = detail.image_url().unwrap_or("unavailable").to_string();
    lines.push(Line::from(vec![
        Span::styled("Artwork: ", Style::default().fg(palette.dim)),
        Span::raw(artwork),
    ]));
    Text::from(lines)
}

fn render_radar(frame: &mut Frame, area: Rect, detail: &EntryDetail, palette: Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Base stats ")
        .border_style(Style::default().fg(palette.dim));
    let points = detail.stat_points();
    if points.is_empty() {
        let paragraph = Paragraph::new("No stats")
            .style(Style::default().fg(palette.dim))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let scale = points
        .iter()
        .map(|point| point.value)
        .max()
        .unwrap_or(0)
        .max(RADAR_SCALE) as f64;
    let spokes = points.len();
    let vertex = move |index: usize, radius: f64| {
        let angle = FRAC_PI_2 - TAU * index as f64 / spokes as f64;
        (radius * angle.cos(), radius * angle.sin())
    };
    // Canvas units per terminal column, for centering labels.
    let cell = 3.2 / area.width.max(1) as f64;

    let canvas = Canvas::default()
        .block(block)
        .background_color(palette.panel)
        .marker(Marker::Braille)
        .x_bounds([-1.6, 1.6])
        .y_bounds([-1.35, 1.35])
        .paint(move |ctx| {
            for index in 0..spokes {
                let (x, y) = vertex(index, 1.0);
                let (nx, ny) = vertex((index + 1) % spokes, 1.0);
                ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, palette.dim));
                ctx.draw(&CanvasLine::new(x, y, nx, ny, palette.dim));
            }
            ctx.layer();
            for index in 0..spokes {
                let next = (index + 1) % spokes;
                let (x, y) = vertex(index, points[index].value as f64 / scale);
                let (nx, ny) = vertex(next, points[next].value as f64 / scale);
                ctx.draw(&CanvasLine::new(x, y, nx, ny, palette.accent));
            }
            for (index, point) in points.iter().enumerate() {
                let label = format!("{} {}", point.name, point.value);
                let (x, y) = vertex(index, 1.15);
                let x = x - label.chars().count() as f64 * cell / 2.0;
                ctx.print(x, y, Span::styled(label, Style::default().fg(palette.text)));
            }
        });
    frame.render_widget(canvas, area);
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    palette: Palette,
    status_bar: &mut StatusBar,
) {
    let status = if state.is_list_loading() {
        "Loading Pokémon...".to_string()
    } else if let DetailState::Opening { name, .. } = &state.detail {
        format!("Loading {name}...")
    } else {
        "Data from PokéAPI".to_string()
    };
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status, Style::default().fg(palette.gold));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(palette.dim),
                focused_style: Some(Style::default().fg(palette.accent)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(palette.panel),
            fg: Some(palette.text),
        },
        text: Style::default().fg(palette.dim),
        hint_key: Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(palette.dim),
        separator: Style::default().fg(palette.dim),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, Vec::new());
    }

    let center = vec![
        StatusBarHint::new("t", "Theme"),
        StatusBarHint::new("q", "Quit"),
    ];
    let left = if state.is_modal_open() {
        vec![
            StatusBarHint::new("Esc", "Close"),
            StatusBarHint::new("f", "Favorite"),
            StatusBarHint::new("/", "Search"),
        ]
    } else {
        match state.focus {
            FocusArea::Grid => vec![
                StatusBarHint::new("←↑↓→", "Move"),
                StatusBarHint::new("Enter", "Details"),
                StatusBarHint::new("f", "Favorite"),
                StatusBarHint::new("n/p", "Page"),
            ],
            FocusArea::Favorites => vec![
                StatusBarHint::new("←/→", "Select"),
                StatusBarHint::new("Enter", "Details"),
                StatusBarHint::new("f", "Remove"),
                StatusBarHint::new("Tab", "Grid"),
            ],
        }
    };
    (left, center)
}

fn focus_border(state: &AppState, area: FocusArea, palette: Palette) -> Style {
    if state.focus == area && !state.is_modal_open() && !state.search.active {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.dim)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fixed-size rect centered in `area`, shrunk to fit.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Favorites, PageCursors};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn state_with_list() -> AppState {
        let mut state = AppState::default();
        state.list = ["bulbasaur", "ivysaur", "venusaur"]
            .iter()
            .enumerate()
            .map(|(index, name)| CatalogEntry {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", index + 1),
            })
            .collect();
        state.cursors = PageCursors {
            next: Some("https://next".into()),
            previous: None,
        };
        state
    }

    #[test]
    fn grid_keys_map_to_selection_and_open() {
        let mut state = state_with_list();
        state.selected_index = 1;

        let response = handle_grid_event(&key(KeyCode::Enter), &state);
        assert_eq!(response.actions, vec![Action::DetailOpen("ivysaur".into())]);
        assert!(response.consumed);

        let response = handle_grid_event(&key(KeyCode::Char('f')), &state);
        assert_eq!(
            response.actions,
            vec![Action::FavoriteToggle("ivysaur".into())]
        );

        let response = handle_grid_event(&key(KeyCode::Char('j')), &state);
        assert_eq!(response.actions, vec![Action::SelectionRow(1)]);

        assert!(!handle_grid_event(&key(KeyCode::Char('x')), &state).consumed);
    }

    #[test]
    fn grid_enter_on_empty_list_is_ignored() {
        let state = AppState::default();
        assert!(handle_grid_event(&key(KeyCode::Enter), &state)
            .actions
            .is_empty());
    }

    #[test]
    fn favorites_strip_opens_and_removes() {
        let mut state = state_with_list();
        state.favorites = Favorites::new(["eevee".to_string(), "abra".to_string()]);
        state.favorite_index = 1;

        let response = handle_favorites_event(&key(KeyCode::Enter), &state);
        assert_eq!(response.actions, vec![Action::DetailOpen("abra".into())]);
        let response = handle_favorites_event(&key(KeyCode::Left), &state);
        assert_eq!(response.actions, vec![Action::FavoriteSelect(0)]);
        let response = handle_favorites_event(&key(KeyCode::Char('f')), &state);
        assert_eq!(response.actions, vec![Action::FavoriteToggle("abra".into())]);
    }

    #[test]
    fn search_keys_edit_query() {
        let state = AppState::default();
        let response = handle_search_event(&key(KeyCode::Char('q')), &state);
        assert_eq!(response.actions, vec![Action::SearchInput('q')]);
        let response = handle_search_event(&key(KeyCode::Esc), &state);
        assert_eq!(response.actions, vec![Action::SearchCancel]);
    }

    #[test]
    fn global_keys_are_suppressed_while_searching() {
        let mut state = AppState::default();
        let response = handle_global_event(&key(KeyCode::Char('t')), &state);
        assert_eq!(response.actions, vec![Action::ThemeToggle]);

        state.search.active = true;
        assert!(handle_global_event(&key(KeyCode::Char('q')), &state)
            .actions
            .is_empty());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("mr-mime"), "Mr-mime");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered(MODAL_WIDTH, MODAL_HEIGHT, area);
        assert_eq!(rect, area);
        let rect = centered(20, 4, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(40, 18, 20, 4));
    }
}
