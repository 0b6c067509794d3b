use anyhow::Context;
use crossterm::event::{
    read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEventKind,
};
use crossterm::execute;
use flexi_logger::{FileSpec, Logger};
use lexopt::{Arg, Parser, ValueExt};
use monthpick::{Config, Locale, Page, PageEvent, Registry, TextInput, Theme};
use ratatui::layout::{Position, Rect, Size};
use ratatui::DefaultTerminal;
use std::io;
use std::path::PathBuf;
use time::OffsetDateTime;

const FORM: &str = "trip";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    locale: Locale,
    theme: Theme,
    min: Option<String>,
    max: Option<String>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("locale") => {
                    opts.locale = match parser.value()?.string()?.as_str() {
                        "es" => Locale::Es,
                        "en" => Locale::En,
                        other => {
                            return Err(lexopt::Error::Custom(
                                format!("unknown locale {other:?}").into(),
                            ))
                        }
                    };
                }
                Arg::Long("theme") => {
                    opts.theme = match parser.value()?.string()?.as_str() {
                        "default" => Theme::Default,
                        "dark" => Theme::Dark,
                        "compact" => Theme::Compact,
                        other => {
                            return Err(lexopt::Error::Custom(
                                format!("unknown theme {other:?}").into(),
                            ))
                        }
                    };
                }
                Arg::Long("min") => opts.min = Some(parser.value()?.string()?),
                Arg::Long("max") => opts.max = Some(parser.value()?.string()?),
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    Logger::try_with_env_or_str("debug")
                        .context("failed to build logger")?
                        .log_to_file(FileSpec::try_from(path).context("bad log file path")?)
                        .start()
                        .context("failed to start logger")?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let size = terminal.size().context("failed to read terminal size")?;
                    let registry = build_registry(&opts, size, today);
                    run_loop(terminal, registry)
                })
            }
            Command::Help => {
                println!("Usage: monthpick [OPTIONS]");
                println!();
                println!("Interactive demo of the popover month picker widget");
                println!();
                println!("Click a header to open a picker; click a month to select it.");
                println!("Press 'r' to reset the form, ESC to dismiss, 'q' to quit.");
                println!();
                println!("Options:");
                println!("  --locale <es|en>            Month names and button labels");
                println!("  --theme <default|dark|compact>");
                println!("  --min <YYYY-MM>             Earliest selectable month");
                println!("  --max <YYYY-MM>             Latest selectable month");
                println!("  --log-file <PATH>           Write debug logs to PATH");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn build_registry(opts: &Options, viewport: Size, today: time::Date) -> Registry {
    let mut page = Page::new(viewport);
    page.insert_container("depart", Rect::new(2, 2, 32, 3));
    page.insert_input("depart-input", TextInput::new().required(true).form(FORM));
    page.insert_container("return", Rect::new(38, 2, 32, 3));
    page.insert_input("return-input", TextInput::new().form(FORM));
    let mut registry = Registry::new(page, today);
    let config = |placeholder: &str| Config {
        placeholder: placeholder.to_owned(),
        locale: opts.locale,
        theme: opts.theme,
        min_date: opts.min.as_deref().map(Into::into),
        max_date: opts.max.as_deref().map(Into::into),
        // The stock threshold is sized for pixel viewports; a terminal
        // narrower than 48 columns is what counts as mobile here.
        mobile_width_threshold: 48,
        ..Config::default()
    };
    registry.create(
        "depart",
        "depart-input",
        config(match opts.locale {
            Locale::Es => "Mes de salida",
            Locale::En => "Departure month",
        }),
    );
    registry.create(
        "return",
        "return-input",
        config(match opts.locale {
            Locale::Es => "Mes de regreso",
            Locale::En => "Return month",
        }),
    );
    registry
}

fn run_loop(mut terminal: DefaultTerminal, mut registry: Registry) -> anyhow::Result<()> {
    loop {
        terminal
            .draw(|frame| frame.render_widget(&registry, frame.area()))
            .context("failed to draw")?;
        match read().context("failed to read terminal event")? {
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc => registry.handle_event(PageEvent::Escape),
                KeyCode::Char('r') => registry.handle_event(PageEvent::FormReset(FORM.into())),
                _ => (),
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                registry.handle_event(PageEvent::Click(Position::new(mouse.column, mouse.row)));
            }
            Event::Resize(width, height) => {
                registry.handle_event(PageEvent::Resize(Size::new(width, height)));
            }
            _ => (),
        }
        registry.tick();
    }
    registry.shutdown();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let mouse = execute!(io::stdout(), EnableMouseCapture).is_ok();
    let r = func(terminal);
    if mouse {
        let _ = execute!(io::stdout(), DisableMouseCapture);
    }
    ratatui::restore();
    r
}
