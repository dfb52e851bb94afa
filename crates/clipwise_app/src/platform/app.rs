use std::collections::{BTreeSet, VecDeque};
use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use clipwise_core::{update, AppState, AppViewModel, Msg, PlatformCapabilities, SubmissionStatus};
use clipwise_engine::{ArboardClipboard, EngineHandle, UnavailableShareSheet};
use clipwise_logging::{cw_debug, cw_info};
use log::LevelFilter;

use super::commands::{parse_command, to_msgs, Command, HELP};
use super::config::{Cli, ShellConfig};
use super::effects::EffectRunner;
use super::{logging, render};

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Everything the shell loop reacts to, in arrival order.
pub enum ShellInput {
    Line(String),
    InputClosed,
    Msg(Msg),
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = ShellConfig::resolve(&cli, |key| std::env::var(key).ok())?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log, level);
    cw_info!(
        "clipwise starting endpoint={} download_dir={:?}",
        config.endpoint,
        config.download_dir
    );

    let engine = Arc::new(EngineHandle::new(
        config.engine_config(),
        Arc::new(ArboardClipboard),
        Arc::new(UnavailableShareSheet),
    ));
    let capabilities = PlatformCapabilities {
        native_share: engine.native_share(),
    };

    let (input_tx, input_rx) = mpsc::channel::<ShellInput>();
    let runner = EffectRunner::new(engine, input_tx.clone());
    spawn_stdin_reader(input_tx.clone());

    // Background tick to coalesce rendering.
    let tick_tx = input_tx.clone();
    thread::spawn(move || {
        while tick_tx.send(ShellInput::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let mut shell = Shell::new(AppState::with_capabilities(capabilities), runner);
    println!("{HELP}");
    if let Some(url) = cli.url {
        shell.dispatch_all(vec![Msg::InputChanged(url), Msg::SubmitClicked]);
    }
    shell.render();

    let mut input_closed = false;
    while let Ok(input) = input_rx.recv() {
        match input {
            ShellInput::Line(line) => {
                if !shell.handle_line(&line) {
                    break;
                }
            }
            ShellInput::InputClosed => input_closed = true,
            ShellInput::Msg(Msg::Tick) => {
                if shell.needs_render {
                    shell.render();
                }
            }
            ShellInput::Msg(msg) => shell.dispatch(msg),
        }
        if input_closed && shell.is_idle() {
            if shell.needs_render {
                shell.render();
            }
            break;
        }
    }
    cw_info!("clipwise exiting");
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<ShellInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(ShellInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(ShellInput::InputClosed);
    });
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    /// Clip ids the shell has reported as mounted.
    mounted: BTreeSet<String>,
    needs_render: bool,
}

impl Shell {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            mounted: BTreeSet::new(),
            needs_render: false,
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                return true;
            }
        };
        match command {
            Command::Quit => return false,
            Command::Help => println!("{HELP}"),
            Command::Show => self.render(),
            command => match to_msgs(command, &self.state.view()) {
                Ok(msgs) => self.dispatch_all(msgs),
                Err(err) => println!("{err}"),
            },
        }
        true
    }

    fn dispatch_all(&mut self, msgs: Vec<Msg>) {
        for msg in msgs {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            self.runner.run(effects);
            if self.state.consume_dirty() {
                self.needs_render = true;
                let view = self.state.view();
                queue.extend(self.sync_mounts(&view));
            }
        }
    }

    /// Mount messages for cards that appeared and unmount messages for cards
    /// that went away since the last view.
    fn sync_mounts(&mut self, view: &AppViewModel) -> Vec<Msg> {
        let visible: BTreeSet<String> = view.clips.iter().map(|c| c.clip_id.clone()).collect();
        let mut msgs = Vec::new();
        for clip_id in self.mounted.difference(&visible) {
            msgs.push(Msg::ClipUnmounted {
                clip_id: clip_id.clone(),
            });
        }
        for card in &view.clips {
            if card.interaction.is_none() {
                msgs.push(Msg::ClipMounted {
                    clip_id: card.clip_id.clone(),
                });
            }
        }
        if !msgs.is_empty() {
            cw_debug!("syncing {} card mounts", msgs.len());
        }
        self.mounted = visible;
        msgs
    }

    fn is_idle(&self) -> bool {
        let view = self.state.view();
        view.status != SubmissionStatus::Pending
            && view
                .clips
                .iter()
                .filter_map(|card| card.interaction)
                .all(|interaction| !interaction.downloading())
    }

    fn render(&mut self) {
        let view = self.state.view();
        let mut out = io::stdout().lock();
        let _ = writeln!(out);
        for line in render::render(&view, Utc::now()) {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
        self.needs_render = false;
    }
}
