use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use creature_arena::battle::events::{BattleEvent, Notifier};
use creature_arena::{
    run_battle, teams, BattleConfig, BattleInfo, BattleSession, Combatant, ElementType,
    JsonRosterStore,
    PlayerAction, PlayerActionProvider, PolicyProvider, RandomSource, RosterStore, SeededRandom,
    Side, ThreadRandom,
};
use tracing_subscriber::EnvFilter;

/// Fight an arena champion with your starter.
#[derive(Parser, Debug)]
#[command(name = "creature-arena", version, about)]
struct Cli {
    /// RON battle configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,
    /// Let the heuristic policy play your side too
    #[arg(long)]
    auto: bool,
    /// Element of your starter (fire, water, plant)
    #[arg(long, default_value = "fire")]
    starter: ElementType,
    /// Element of the champion to challenge
    #[arg(long, default_value = "plant")]
    champion: ElementType,
    /// Directory where your roster is loaded from and saved to
    #[arg(long)]
    roster_dir: Option<PathBuf>,
    /// Your trainer name
    #[arg(long, default_value = "Sacha")]
    name: String,
}

/// Reads `a`, `s <n>` or `f` from stdin.
struct ConsoleProvider<R> {
    input: R,
}

impl<R: BufRead> ConsoleProvider<R> {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }

    fn print_status(session: &BattleSession) {
        let info = BattleInfo::from_session(session);
        println!("-- Turn {} --", info.turn_number);
        for side in &info.sides {
            let active = match (&side.active_creature, side.active_hp) {
                (Some(name), Some((hp, max))) => format!("{name} {hp}/{max} HP"),
                _ => "nobody out".to_string(),
            };
            println!(
                "  {}: {active} ({}/{} able to fight)",
                side.name, side.available, side.roster_size
            );
        }
    }

    fn print_roster(combatant: &Combatant) {
        for (index, creature) in combatant.roster().iter().enumerate() {
            let marker = if combatant.active_index() == Some(index) { "*" } else { " " };
            println!("  {marker}{}. {creature}", index + 1);
        }
    }
}

impl<R: BufRead> PlayerActionProvider for ConsoleProvider<R> {
    fn choose_action(&mut self, side: Side, session: &BattleSession) -> PlayerAction {
        Self::print_status(session);
        Self::print_roster(session.combatant(side));
        loop {
            print!("[a]ttack, [s]witch <n>, [f]lee > ");
            let _ = io::stdout().flush();
            // End of input: keep fighting.
            let Some(line) = self.read_line() else {
                return PlayerAction::Attack;
            };
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next().map(str::parse::<usize>)) {
                (Some("a"), _) => return PlayerAction::Attack,
                (Some("f"), _) => return PlayerAction::Flee,
                (Some("s"), Some(Ok(n))) if n > 0 => {
                    return PlayerAction::Switch { index: n - 1 };
                }
                _ => println!("Unrecognised command."),
            }
        }
    }

    fn choose_replacement(&mut self, side: Side, session: &BattleSession) -> Option<usize> {
        Self::print_roster(session.combatant(side));
        print!("Send out which creature? > ");
        let _ = io::stdout().flush();
        self.read_line()?
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
    }

    fn action_rejected(
        &mut self,
        _side: Side,
        _action: PlayerAction,
        error: &creature_arena::ActionError,
    ) {
        println!("{error}. Attacking instead.");
    }
}

/// Prints every formatted event to stdout.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, event: &BattleEvent, session: &BattleSession) {
        if let Some(text) = event.format(session) {
            println!("{text}");
        }
    }
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn load_player(cli: &Cli, config: &BattleConfig) -> Result<Combatant, Box<dyn std::error::Error>> {
    let mut player = Combatant::with_capacity(cli.name.clone(), config.roster_capacity);

    let saved = match &cli.roster_dir {
        Some(dir) => JsonRosterStore::new(dir).load(&cli.name)?,
        None => None,
    };
    match saved {
        Some(roster) => {
            tracing::info!(creatures = roster.len(), "loaded saved roster");
            for creature in roster {
                player.add_creature(creature)?;
            }
        }
        None => player.add_creature(teams::starter(cli.starter)?)?,
    }
    Ok(player)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    init_tracing(&config.log_filter);

    let player = load_player(&cli, &config)?;
    let champion = teams::build_combatant_with_capacity(
        teams::champion(cli.champion)?,
        config.roster_capacity,
    )?;
    println!("{player}\nvs\n{champion}\n");

    let mut rng: Box<dyn RandomSource> = match config.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    };
    let mut console = ConsoleProvider {
        input: io::stdin().lock(),
    };
    let mut auto = PolicyProvider;
    let provider: &mut dyn PlayerActionProvider = if cli.auto { &mut auto } else { &mut console };

    let (summary, [mut player, _]) = run_battle(
        player,
        champion,
        provider,
        rng.as_mut(),
        &mut ConsoleNotifier,
        &config,
    );

    println!(
        "\n{:?} after {} turns. Damage dealt {} / {}, experience gained {}.",
        summary.outcome,
        summary.turns,
        summary.damage_dealt[0],
        summary.damage_dealt[1],
        summary.experience_gained[0],
    );

    player.heal_team();
    if let Some(dir) = &cli.roster_dir {
        JsonRosterStore::new(dir).save(&player.name, player.roster())?;
        println!("Roster saved to {}.", dir.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
