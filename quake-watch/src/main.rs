//! Quake Watch - earthquakes, volcanoes and tsunamis for one day on a world map

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use quake_watch::action::Action;
use quake_watch::catalog::{self, CatalogClient, CatalogConfig, USGS_EVENT_ENDPOINT};
use quake_watch::components::{
    Component, DatePicker, DatePickerProps, QuakeDisplay, QuakeDisplayProps, date_picker,
};
use quake_watch::effect::Effect;
use quake_watch::filters::{EventType, FilterState, local_today, parse_date};
use quake_watch::logging;
use quake_watch::reducer::reducer;
use quake_watch::state::{AppState, LOADING_ANIM_TICK_MS};

/// Quake Watch - USGS event catalog on a terminal world map
#[derive(Parser, Debug)]
#[command(name = "quake-watch")]
#[command(about = "Earthquakes, volcanoes and tsunamis for one day on a world map")]
struct Args {
    /// Event type to show first
    #[arg(long, value_enum, default_value_t = EventType::Earthquake)]
    event_type: EventType,

    /// Calendar day to show (YYYY-MM-DD, local time). Defaults to today
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// FDSN event query endpoint
    #[arg(long, default_value = USGS_EVENT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (minimum 1)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum QuakeComponentId {
    Display,
    DatePicker,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum QuakeContext {
    Main,
    DatePicker,
}

impl EventRoutingState<QuakeComponentId, QuakeContext> for AppState {
    fn focused(&self) -> Option<QuakeComponentId> {
        if self.date_picker_open {
            Some(QuakeComponentId::DatePicker)
        } else {
            Some(QuakeComponentId::Display)
        }
    }

    fn modal(&self) -> Option<QuakeComponentId> {
        if self.date_picker_open {
            Some(QuakeComponentId::DatePicker)
        } else {
            None
        }
    }

    fn binding_context(&self, id: QuakeComponentId) -> QuakeContext {
        match id {
            QuakeComponentId::Display => QuakeContext::Main,
            QuakeComponentId::DatePicker => QuakeContext::DatePicker,
        }
    }

    fn default_context(&self) -> QuakeContext {
        QuakeContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        event_type,
        date,
        endpoint,
        timeout_secs,
        log_level,
        log_dir,
        debug: debug_args,
    } = Args::parse();

    let log_level = log_level.unwrap_or_else(|| logging::default_log_level().to_string());
    let log_dir = log_dir.unwrap_or_else(logging::default_log_dir);
    if let Err(err) = logging::init_logging(&log_level, &log_dir) {
        eprintln!("Warning: file logging disabled: {err}");
    }

    let client = CatalogClient::new(CatalogConfig {
        endpoint,
        timeout: Duration::from_secs(timeout_secs),
    })
    .map_err(|err| io::Error::other(format!("catalog client: {err}")))?;
    log::info!(
        "event=catalog_ready endpoint={} timeout_secs={}",
        client.endpoint(),
        timeout_secs
    );
    let client = Arc::new(client);

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let filters = FilterState::new(event_type, date.unwrap_or_else(local_today));
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(filters))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, client, replay_actions).await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    log::info!("event=app_exit");
    Ok(())
}

struct QuakeUi {
    display: QuakeDisplay,
    date_picker: DatePicker,
}

impl QuakeUi {
    fn new() -> Self {
        Self {
            display: QuakeDisplay::new(),
            date_picker: DatePicker::new(),
        }
    }

    fn date_picker_props(state: &AppState, is_focused: bool) -> DatePickerProps<'_> {
        DatePickerProps {
            input: &state.date_input,
            error: state.date_error.as_deref(),
            is_focused,
            on_change: Action::DatePickerChange,
            on_submit: Action::DatePickerSubmit,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<QuakeComponentId>,
    ) {
        event_ctx.set_component_area(QuakeComponentId::Display, area);

        let props = QuakeDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && !state.date_picker_open,
        };
        self.display.render(frame, area, props);

        self.date_picker.set_open(state.date_picker_open);
        if state.date_picker_open {
            let modal_area = date_picker::modal_area(area);
            event_ctx.set_component_area(QuakeComponentId::DatePicker, modal_area);
            let props = Self::date_picker_props(state, render_ctx.is_focused());
            self.date_picker.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&QuakeComponentId::DatePicker);
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = QuakeDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
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

    fn handle_date_picker_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.date_picker.set_open(state.date_picker_open);
        let props = Self::date_picker_props(state, true);
        let actions: Vec<_> = self
            .date_picker
            .handle_event(event, props)
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: Arc<CatalogClient>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(QuakeUi::new()));
    let mut bus: EventBus<AppState, Action, QuakeComponentId, QuakeContext> = EventBus::new();
    let keybindings: Keybindings<QuakeContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(QuakeComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_picker = Rc::clone(&ui);
    bus.register(QuakeComponentId::DatePicker, move |event, state| {
        ui_picker
            .borrow_mut()
            .handle_date_picker_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::MarkersFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: &Arc<CatalogClient>) {
    match effect {
        Effect::FetchMarkers { seq, query } => {
            log::info!(
                "event=fetch_start seq={} eventtype={} starttime={} endtime={}",
                seq,
                query.event_type.as_param(),
                query.window.start_param(),
                query.window.end_param()
            );
            let client = Arc::clone(client);
            // One key for every fetch: spawning replaces the task still in flight.
            ctx.tasks().spawn("catalog", async move {
                catalog::fetch_action(&client, seq, query).await
            });
        }
    }
}
