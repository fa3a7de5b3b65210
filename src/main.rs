//! pokeview - PokéAPI catalog browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{EffectStoreLike, EffectStoreWithMiddleware, EventBus, Keybindings};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokeview::action::Action;
use pokeview::api::{Catalog, HttpCatalog};
use pokeview::config::{Config, ConfigArgs};
use pokeview::effect::Effect;
use pokeview::logging;
use pokeview::persist::{FavoritesStore, FileStore, ThemePreference};
use pokeview::reducer::reducer;
use pokeview::routing::{ViewComponentId, ViewContext};
use pokeview::runner::EffectRunner;
use pokeview::state::AppState;
use pokeview::theme::PaletteSwitch;
use pokeview::ui::{self, ViewUi};

const TICK_MS: u64 = 90;

#[derive(Parser, Debug)]
#[command(name = "pokeview")]
#[command(about = "Browse the PokéAPI catalog in the terminal")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        config: config_args,
        debug: debug_args,
    } = Args::parse();

    let config = Config::resolve(&config_args).map_err(io::Error::other)?;
    if !logging::init_tracing(&config) {
        eprintln!(
            "warning: logging disabled, could not open {}",
            config.log_path().display()
        );
    }

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let palette = PaletteSwitch::new();
    let favorites = FavoritesStore::load(Box::new(FileStore::new(&config.data_dir)));
    let theme = ThemePreference::load(
        Box::new(FileStore::new(&config.data_dir)),
        palette.applier(),
    );
    theme.apply();

    let catalog: Arc<dyn Catalog> = match config.request_timeout() {
        Some(timeout) => {
            Arc::new(HttpCatalog::with_timeout(&config.api_base, timeout).map_err(io::Error::other)?)
        }
        None => Arc::new(HttpCatalog::new(&config.api_base)),
    };
    tracing::info!(
        api_base = %config.api_base,
        page_size = config.page_size,
        ordering = ?config.ordering(),
        data_dir = %config.data_dir.display(),
        "starting"
    );

    let settings = config.view_settings();
    let initial_favorites = favorites.favorites().clone();
    let dark = theme.get();
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(settings, initial_favorites, dark))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let runner = Arc::new(EffectRunner::new(catalog, favorites, theme));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, runner, palette).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("exiting");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    runner: Arc<EffectRunner>,
    palette: PaletteSwitch,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ViewUi::new(palette)));
    let mut bus: EventBus<AppState, Action, ViewComponentId, ViewContext> = EventBus::new();
    let keybindings: Keybindings<ViewContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(ViewComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_favorites = Rc::clone(&ui);
    bus.register(ViewComponentId::Favorites, move |event, state| {
        ui_favorites
            .borrow_mut()
            .handle_favorites_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(ViewComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(ViewComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| ui::handle_global_event(&event.kind, state));

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| runner.handle(effect, ctx),
        )
        .await
}
