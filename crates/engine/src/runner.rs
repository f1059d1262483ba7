//! Text runner: wires the engine against local adapters and plays one
//! scenario over stdin/stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use branchline_domain::{EndingKind, ScenarioId};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use branchline_engine::app::{App, AppPorts};
use branchline_engine::entities::ScenarioCatalog;
use branchline_engine::infrastructure::clock::SystemClock;
use branchline_engine::infrastructure::config::EngineConfig;
use branchline_engine::infrastructure::ledger::InMemoryLedger;
use branchline_engine::infrastructure::persistence::SqliteSaveRepo;
use branchline_engine::infrastructure::ports::{CurrencyLedgerPort, TextLookupPort};
use branchline_engine::infrastructure::services::{LogCompletionRecorder, OfflineRewardMedia};
use branchline_engine::infrastructure::text::TextTable;
use branchline_engine::use_cases::choice::ChoiceOutcome;
use branchline_engine::use_cases::ending::{EndingAction, EndingOutcome};
use branchline_engine::use_cases::session::SceneView;

const HELP: &str = "commands: <n> choose | enter follow guide | back | guide <good|bad|secret> \
                    | stop | unlock <n> | ad <n> | reset | quit";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Take the choice the guide points at.
    Follow,
    /// 0-based choice index.
    Choose(usize),
    Back,
    Guide(EndingKind),
    StopGuide,
    Unlock(usize),
    UnlockWithReward(usize),
    Reset,
    Quit,
}

/// Parse a line; choice numbers are 1-based on screen.
pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Follow);
    };
    let arg = words.next();

    let index = |raw: Option<&str>| -> Result<usize, String> {
        let raw = raw.ok_or_else(|| "missing choice number".to_string())?;
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("not a choice number: {raw}")),
        }
    };

    match head.to_lowercase().as_str() {
        "back" | "b" => Ok(Command::Back),
        "stop" => Ok(Command::StopGuide),
        "reset" => Ok(Command::Reset),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "unlock" | "u" => index(arg).map(Command::Unlock),
        "ad" => index(arg).map(Command::UnlockWithReward),
        "guide" | "g" => {
            let raw = arg.ok_or_else(|| "missing ending kind".to_string())?;
            raw.parse::<EndingKind>()
                .map(Command::Guide)
                .map_err(|e| e.to_string())
        }
        _ => index(Some(head)).map(Command::Choose),
    }
}

pub async fn run() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "branchline_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = PathBuf::from(
        args.next()
            .context("usage: branchline <scenario.json> [texts.json]")?,
    );
    let texts_path = args.next().map(PathBuf::from);

    let config = EngineConfig::from_env();
    tracing::info!(save_db = %config.save_db_path, "Starting Branchline runner");

    let scenario_id = scenario_id_from_path(&scenario_path)?;
    let json = tokio::fs::read_to_string(&scenario_path)
        .await
        .with_context(|| format!("reading {}", scenario_path.display()))?;
    let mut catalog = ScenarioCatalog::new();
    catalog
        .load_json(scenario_id.clone(), &json)
        .with_context(|| format!("loading scenario {scenario_id}"))?;

    let text = match texts_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            TextTable::from_json(config.default_lang.clone(), &raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => TextTable::new(config.default_lang.clone()),
    };
    let text = Arc::new(text);

    let save_repo =
        SqliteSaveRepo::new(&config.save_db_path, Arc::new(SystemClock::new())).await?;
    let ledger = InMemoryLedger::with_balance(config.currency.clone(), config.starting_balance);

    let app = App::new(
        config,
        catalog,
        AppPorts {
            save_repo: Arc::new(save_repo),
            ledger: Arc::new(ledger),
            recorder: Arc::new(LogCompletionRecorder),
            reward: Arc::new(OfflineRewardMedia),
            text: text.clone(),
        },
    )
    .await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    Runner {
        app,
        text,
        scenario_id,
    }
    .play(&mut input)
    .await
}

struct Runner {
    app: App,
    text: Arc<TextTable>,
    scenario_id: ScenarioId,
}

impl Runner {
    async fn play(&self, input: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<()> {
        let entered = self
            .app
            .use_cases
            .session
            .enter
            .execute(&self.scenario_id)
            .await?;
        if let Some(ending) = entered.progress.ended() {
            println!("This run already reached the {ending} ending. Play again? [Y/n]");
            let answer = input.next_line().await?.unwrap_or_default();
            if answer.trim().eq_ignore_ascii_case("n") {
                return Ok(());
            }
            self.app
                .use_cases
                .session
                .restart
                .execute(&self.scenario_id)
                .await?;
        } else if entered.resumable {
            println!("Resume where you left off? [Y/n]");
            let answer = input.next_line().await?.unwrap_or_default();
            if answer.trim().eq_ignore_ascii_case("n") {
                self.app
                    .use_cases
                    .session
                    .restart
                    .execute(&self.scenario_id)
                    .await?;
            }
        }

        println!("{HELP}");
        loop {
            let view = self
                .app
                .use_cases
                .session
                .view
                .execute(&self.scenario_id)
                .await?;
            self.render(&view).await;

            let Some(line) = input.next_line().await? else {
                return Ok(());
            };
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{message}\n{HELP}");
                    continue;
                }
            };
            if command == Command::Quit {
                return Ok(());
            }
            if let Some(ending) = self.handle(command, &view).await? {
                if !self.on_ending(&ending, input).await? {
                    return Ok(());
                }
            }
        }
    }

    /// Returns the ending if the command finished the run.
    async fn handle(
        &self,
        command: Command,
        view: &SceneView,
    ) -> anyhow::Result<Option<EndingOutcome>> {
        let id = &self.scenario_id;
        let use_cases = &self.app.use_cases;

        let (index, outcome) = match command {
            Command::Follow => match view.choices.iter().find(|choice| choice.guided) {
                Some(choice) => (choice.index, self.select(choice.index).await),
                None => {
                    println!("{HELP}");
                    return Ok(None);
                }
            },
            Command::Choose(index) => (index, self.select(index).await),
            Command::Unlock(index) => {
                let outcome = match use_cases.unlock.with_currency(id, index).await {
                    Ok(result) => Some(result.choice.outcome),
                    Err(e) => {
                        println!("{e}");
                        None
                    }
                };
                (index, outcome)
            }
            Command::UnlockWithReward(index) => {
                let outcome = match use_cases.unlock.with_reward(id, index).await {
                    Ok(result) => Some(result.choice.outcome),
                    Err(e) => {
                        println!("{e}");
                        None
                    }
                };
                (index, outcome)
            }
            Command::Back => {
                match use_cases.choice.back.execute(id).await {
                    Ok(Some(_)) => {}
                    Ok(None) => println!("Nothing to go back to."),
                    Err(e) => println!("{e}"),
                }
                return Ok(None);
            }
            Command::Guide(kind) => {
                match use_cases.guide.activate(id, kind).await {
                    Ok(activation) if activation.charged => {
                        println!("Guide to the {kind} ending purchased.");
                    }
                    Ok(_) => println!("Guide now heads for the {kind} ending."),
                    Err(e) => println!("{e}"),
                }
                return Ok(None);
            }
            Command::StopGuide => {
                if use_cases.guide.stop().await.is_none() {
                    println!("No guide is active.");
                }
                return Ok(None);
            }
            Command::Reset => {
                use_cases.session.restart.execute(id).await?;
                return Ok(None);
            }
            Command::Quit => return Ok(None),
        };

        match outcome {
            Some(ChoiceOutcome::Ended(ending)) => Ok(Some(ending)),
            Some(ChoiceOutcome::Locked { .. }) => {
                let prompt = use_cases.unlock.prompt(id, index).await?;
                println!(
                    "Locked. `unlock {n}` for {cost} {currency}{forced}, or `ad {n}`.",
                    n = prompt.choice_index + 1,
                    cost = prompt.cost,
                    currency = prompt.currency,
                    forced = if prompt.forced { " (required)" } else { "" },
                );
                Ok(None)
            }
            Some(ChoiceOutcome::Moved { .. }) | None => Ok(None),
        }
    }

    /// Dead ends and bad numbers are reported, not fatal.
    async fn select(&self, index: usize) -> Option<ChoiceOutcome> {
        match self
            .app
            .use_cases
            .choice
            .select
            .execute(&self.scenario_id, index)
            .await
        {
            Ok(result) => Some(result.outcome),
            Err(e) => {
                println!("{e}");
                None
            }
        }
    }

    /// Show the ending screen. Returns false when the player leaves the
    /// scenario, true after a replay.
    async fn on_ending(
        &self,
        ending: &EndingOutcome,
        input: &mut Lines<BufReader<Stdin>>,
    ) -> anyhow::Result<bool> {
        let lang = self.app.stores.save.lang().await;
        println!("\n=== {} ===", self.lookup(&lang, ending.title_key.as_str()));
        println!("{}", self.lookup(&lang, ending.body_key.as_str()));
        if ending.reward_granted {
            println!("First completion reward credited.");
        }

        let options: Vec<&str> = ending
            .actions
            .iter()
            .map(|action| match action {
                EndingAction::Replay => "replay",
                EndingAction::Back => "back",
                EndingAction::Home => "home",
            })
            .collect();
        println!("[{}]", options.join(" | "));

        loop {
            let Some(line) = input.next_line().await? else {
                return Ok(false);
            };
            let choice = line.trim().to_lowercase();
            let action = ending.actions.iter().find(|action| {
                matches!(
                    (action, choice.as_str()),
                    (EndingAction::Replay, "replay")
                        | (EndingAction::Back, "back")
                        | (EndingAction::Home, "home")
                )
            });
            match action {
                Some(EndingAction::Replay) => {
                    self.app
                        .use_cases
                        .session
                        .restart
                        .execute(&self.scenario_id)
                        .await?;
                    return Ok(true);
                }
                // The run is over; closing it leaves the scenario.
                Some(EndingAction::Back | EndingAction::Home) => return Ok(false),
                None => println!("[{}]", options.join(" | ")),
            }
        }
    }

    async fn render(&self, view: &SceneView) {
        let lang = self.app.stores.save.lang().await;
        let balance = self
            .app
            .ledger
            .balance(&self.app.config.currency)
            .await
            .unwrap_or_default();

        println!();
        if let Some(title) = &view.title {
            println!("## {title}");
        }
        if let Some(image) = &view.image {
            println!("[{}]", image.alt);
        }
        println!("{}", view.body);
        for choice in &view.choices {
            let mut line = format!("  {}. {}", choice.index + 1, choice.text);
            if let Some(missing) = &choice.locked_detail {
                let needs: Vec<&str> = missing
                    .missing_all
                    .iter()
                    .chain(&missing.missing_any)
                    .map(|flag| flag.as_str())
                    .collect();
                line.push_str(&format!(" [locked: {}]", needs.join(", ")));
            }
            if choice.guided {
                line.push_str(" <- guide");
            }
            println!("{line}");
        }
        let guide = if view.guide_active { " | guide on" } else { "" };
        println!(
            "({} {}{guide}) [{lang}]",
            balance, self.app.config.currency
        );
    }

    fn lookup(&self, lang: &str, key: &str) -> String {
        self.text
            .lookup(lang, key)
            .unwrap_or_else(|| key.to_string())
    }
}

fn scenario_id_from_path(path: &Path) -> anyhow::Result<ScenarioId> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("no scenario id in {}", path.display()))?;
    Ok(ScenarioId::new(stem))
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
