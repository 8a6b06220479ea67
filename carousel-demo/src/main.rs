//!
//! Demo screen. Tip cards in a carousel over a password
//! input with a strength meter.
//!

use anyhow::{anyhow, Error};
use configparser::ini::Ini;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{debug, error, LevelFilter};
use rat_carousel::event::{CarouselOutcome, ConsumedEvent, HandleEvent, Outcome, Regular};
use rat_carousel::timer::Timers;
use rat_carousel::{Carousel, CarouselConfig, CarouselState, Item};
use rat_event::ct_event;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use rat_strength::event::PasswordOutcome;
use rat_strength::input::PasswordInput;
use rat_strength::rules::Pattern;
use rat_strength::{PasswordStrength, PasswordStrengthState};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, StatefulWidget, Widget};
use ratatui::{Frame, Terminal};
use std::cmp::max;
use std::env;
use std::fs;
use std::io::{stdout, Stdout};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

const DEFAULT_CONFIG: &str = "carousel-demo.ini";
const LOG_FILE: &str = "carousel-demo.log";

fn main() -> Result<(), Error> {
    let path = env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(path.as_deref())?;
    setup_logging(cfg.log_level)?;

    let mut state = DemoState::new(&cfg)?;
    run_ui(&cfg, &mut state)
}

/// Tip card.
#[derive(Debug)]
struct Tip {
    title: &'static str,
    description: &'static str,
}

impl Widget for &Tip {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from(vec![
            Line::from(self.title).bold(),
            Line::default(),
            Line::from(self.description),
        ])
        .centered();

        let height = area.height.min(3);
        let y = area.y + (area.height - height) / 2;
        text.render(Rect::new(area.x, y, area.width, height), buf);
    }
}

fn tips() -> Vec<Item<Tip>> {
    vec![
        Item::new(
            1,
            Tip {
                title: "Strong Password Example",
                description: "e.g., Abc#123!XY",
            },
        ),
        Item::new(
            2,
            Tip {
                title: "Use Special Characters",
                description: "Include @, #, %, &, etc.",
            },
        ),
        Item::new(
            3,
            Tip {
                title: "Avoid Personal Info",
                description: "Avoid birthdates or names.",
            },
        ),
    ]
}

#[derive(Debug)]
struct DemoConfig {
    carousel: CarouselConfig,
    log_level: LevelFilter,
    required: Option<String>,
    forbidden: Option<String>,
    color_bar: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            carousel: CarouselConfig::new().auto_scroll(true),
            log_level: LevelFilter::Debug,
            required: None,
            forbidden: None,
            color_bar: true,
        }
    }
}

/// Load the ini file. An explicit path must exist, the
/// default file is optional.
fn load_config(path: Option<&Path>) -> Result<DemoConfig, Error> {
    let mut cfg = DemoConfig::default();

    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG);
            if !path.exists() {
                return Ok(cfg);
            }
            path
        }
    };

    let mut ini = Ini::new();
    if let Err(e) = ini.load(&path) {
        return Err(anyhow!("{}: {}", path.display(), e));
    }

    if let Some(v) = ini.getbool("carousel", "auto_scroll").map_err(|e| anyhow!(e))? {
        cfg.carousel = cfg.carousel.auto_scroll(v);
    }
    if let Some(v) = ini.getuint("carousel", "interval_ms").map_err(|e| anyhow!(e))? {
        cfg.carousel = cfg.carousel.interval_ms(v);
    }
    if let Some(v) = ini
        .getbool("carousel", "show_indicators")
        .map_err(|e| anyhow!(e))?
    {
        cfg.carousel = cfg.carousel.show_indicators(v);
    }
    cfg.carousel.validate()?;

    if let Some(v) = ini.get("log", "level") {
        cfg.log_level = v.parse().map_err(|e| anyhow!("log level {}: {}", v, e))?;
    }

    cfg.required = ini.get("password", "required").filter(|v| !v.is_empty());
    cfg.forbidden = ini.get("password", "forbidden").filter(|v| !v.is_empty());
    if let Some(v) = ini.getbool("password", "color_bar").map_err(|e| anyhow!(e))? {
        cfg.color_bar = v;
    }

    Ok(cfg)
}

fn setup_logging(level: LevelFilter) -> Result<(), Error> {
    let log = PathBuf::from(LOG_FILE);
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}

#[derive(Debug)]
struct DemoState {
    timers: Rc<Timers>,
    carousel: CarouselState<Tip>,
    password: PasswordStrengthState,

    container: FocusFlag,
    area: Rect,

    frame: usize,
    status: String,
    quit: bool,
}

impl DemoState {
    fn new(cfg: &DemoConfig) -> Result<Self, Error> {
        let timers = Rc::new(Timers::new());

        let mut carousel = CarouselState::named("tips");
        carousel.set_timers(timers.clone());
        carousel.set_items(tips());
        carousel.set_config(cfg.carousel.clone())?;

        let mut password = PasswordStrengthState::named("password");
        if let Some(required) = &cfg.required {
            password.set_required(Some(Pattern::new(required)?));
        }
        if let Some(forbidden) = &cfg.forbidden {
            password.set_forbidden(Some(Pattern::new(forbidden)?));
        }

        Ok(Self {
            timers,
            carousel,
            password,
            container: FocusFlag::new().with_name("demo"),
            area: Default::default(),
            frame: 0,
            status: "Ctrl-Q to quit.".into(),
            quit: false,
        })
    }

    /// Time until something needs to happen without user input.
    fn wait_time(&self) -> Duration {
        let now = Instant::now();
        [
            self.timers.sleep_time(),
            self.carousel.animation_wait(),
            self.password.animation_wait(now),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(Duration::from_millis(500))
    }
}

impl HasFocus for DemoState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.widget(&self.carousel).widget(&self.password);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

fn run_ui(cfg: &DemoConfig, state: &mut DemoState) -> Result<(), Error> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    stdout().execute(EnableBracketedPaste)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    FocusBuilder::build_for(&*state).first();

    let mut changed = true;
    let r = 'l: loop {
        if changed {
            if let Err(e) = repaint_ui(&mut terminal, cfg, state) {
                break 'l Err(e);
            }
        }

        let o = if let Some(timeout) = state.timers.read() {
            let r = state.carousel.handle(&timeout, Regular);
            Outcome::from(page_changed(state, r))
        } else {
            match crossterm::event::poll(state.wait_time()) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => handle_event(&event, state),
                    Err(e) => break 'l Err(anyhow!(e)),
                },
                Ok(false) => Outcome::Continue,
                Err(e) => break 'l Err(anyhow!(e)),
            }
        };
        let o = max(o, animate(state));

        if state.quit {
            break 'l Ok(());
        }
        changed = o == Outcome::Changed;
    };

    state.carousel.unmount();
    debug!("quit after {} frames", state.frame);

    stdout().execute(DisableBracketedPaste)?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;

    if let Err(e) = &r {
        error!("{:?}", e);
    }
    r
}

/// Step all animations.
fn animate(state: &mut DemoState) -> Outcome {
    let now = Instant::now();
    let r = state.carousel.animate(now);
    let r = Outcome::from(page_changed(state, r));
    if state.password.tick(now) {
        max(r, Outcome::Changed)
    } else {
        r
    }
}

fn page_changed(state: &mut DemoState, r: CarouselOutcome) -> CarouselOutcome {
    if let CarouselOutcome::Page(n) = r {
        state.status = format!("Tip {}/{}", n + 1, state.carousel.len());
    }
    r
}

fn handle_event(event: &Event, state: &mut DemoState) -> Outcome {
    if let ct_event!(key press CONTROL-'q') = event {
        state.quit = true;
        return Outcome::Changed;
    }
    if let Event::Resize(_, _) = event {
        return Outcome::Changed;
    }

    let f = FocusBuilder::build_for(&*state).handle(event, Regular);

    let r = state.carousel.handle(event, Regular);
    let mut r = Outcome::from(page_changed(state, r));
    if !r.is_consumed() {
        r = match state.password.handle(event, Regular) {
            PasswordOutcome::Value => {
                state.status = format!("Strength: {}", state.password.strength().level);
                Outcome::Changed
            }
            v => v.into(),
        };
    }

    max(f, r)
}

fn repaint_ui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cfg: &DemoConfig,
    state: &mut DemoState,
) -> Result<(), Error> {
    terminal.draw(|frame| repaint(frame, cfg, state))?;
    state.frame += 1;
    Ok(())
}

fn repaint(frame: &mut Frame<'_>, cfg: &DemoConfig, state: &mut DemoState) {
    let area = frame.area();
    state.area = area;

    let password = PasswordStrength::new()
        .input(
            PasswordInput::new()
                .placeholder_style(Style::new().fg(Color::DarkGray))
                .focus_style(Style::new().bg(Color::DarkGray)),
        )
        .enable_color_bar(cfg.color_bar);

    let [_, l_carousel, _, l_password, _, l_status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Length(password.height()),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);
    let [_, l_carousel, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(40),
        Constraint::Fill(1),
    ])
    .areas(l_carousel);
    let [_, l_password, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(40),
        Constraint::Fill(1),
    ])
    .areas(l_password);

    let buf = frame.buffer_mut();

    Carousel::new()
        .block(Block::bordered().title("Tips"))
        .page_style(Style::new().bg(Color::Rgb(0xf0, 0xf0, 0xf0)).fg(Color::Black))
        .focus_style(Style::new().fg(Color::LightCyan))
        .render(l_carousel, buf, &mut state.carousel);

    password.render(l_password, buf, &mut state.password);

    Line::from(format!("{} | frame {}", state.status, state.frame))
        .style(Style::new().fg(Color::Gray))
        .render(l_status, buf);

    if let Some(cursor) = state.password.screen_cursor() {
        frame.set_cursor_position(cursor);
    }
}
