// src/main.rs

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use boredom_buster::config::BusterConfig;
use boredom_buster::games::creativity::{Resolution, Urgency, format_time};
use boredom_buster::games::doodle_duel::Winner;
use boredom_buster::games::roast_toast::{Intent, Tone};
use boredom_buster::games::{
    CompletedGeneration, CreativityChallenge, DoodleDuel, GameError, GameSession,
    HaikuGenerator, PendingCompletion, Phase, RoastToast, RoleplayAdventure,
};
use boredom_buster::llm::{CompletionGateway, DeepSeekGateway};
use boredom_buster::store::{JsonFileStore, ScoreStore};
use boredom_buster::tasks::spawn_countdown;

#[derive(Parser)]
#[command(name = "boredom-buster")]
#[command(about = "Five tiny AI party games for when you have nothing better to do", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the same subject as the AI, then vote on who did it better
    Doodle,

    /// A short roast (or toast) in the tone of your choice
    Roast {
        /// nice, sarcastic or absurd
        #[arg(short, long)]
        tone: String,

        /// Be kind instead
        #[arg(long, default_value_t = false)]
        toast: bool,

        /// Who it's for
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Three-turn improvised adventure with an AI narrator
    Roleplay,

    /// Answer a silly challenge before the clock runs out
    Creativity,

    /// A haiku about the current title or a theme of your choice
    Haiku {
        /// Custom theme (required to be non-empty when given)
        #[arg(long, conflicts_with = "title")]
        theme: Option<String>,

        /// Ambient title to draw inspiration from
        #[arg(long)]
        title: Option<String>,
    },

    /// Show the Doodle Duel tally
    Scores,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = BusterConfig::from_env();

    // Logs go to stderr so game text on stdout stays readable
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        config.tracing_level()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Boredom Buster starting");
    debug!("Config: {}", config.summary());

    let gateway: Arc<dyn CompletionGateway> = Arc::new(DeepSeekGateway::new(&config));
    let scores = ScoreStore::new(Arc::new(JsonFileStore::new(&config.data_dir)));
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Command::Doodle => doodle(&config, &gateway, scores, &mut input).await,
        Command::Roast { tone, toast, name } => {
            roast(&config, &gateway, &tone, toast, name).await
        }
        Command::Roleplay => roleplay(&config, &gateway, &mut input).await,
        Command::Creativity => creativity(&config, &gateway, &mut input).await,
        Command::Haiku { theme, title } => haiku(&config, &gateway, theme, title).await,
        Command::Scores => {
            let record = scores.load();
            println!(
                "You {}  |  AI {}  |  Draws {}  ({} rounds)",
                record.user_wins,
                record.ai_wins,
                record.draws,
                record.total()
            );
            Ok(())
        }
    }
}

/// Run the call in the background so the game keeps accepting input.
fn spawn_call(
    gateway: &Arc<dyn CompletionGateway>,
    pending: PendingCompletion,
    config: &BusterConfig,
) -> JoinHandle<CompletedGeneration> {
    let gateway = Arc::clone(gateway);
    let pending = pending.tuned(config);
    tokio::spawn(async move { pending.run(gateway.as_ref()).await })
}

async fn ask(input: &mut Input, question: &str) -> anyhow::Result<String> {
    print!("{} ", question);
    std::io::stdout().flush()?;
    input
        .next_line()
        .await?
        .ok_or_else(|| anyhow!("input closed"))
}

async fn doodle(
    config: &BusterConfig,
    gateway: &Arc<dyn CompletionGateway>,
    scores: ScoreStore,
    input: &mut Input,
) -> anyhow::Result<()> {
    let mut game = DoodleDuel::new(scores);
    let pending = game.start()?;
    let call = spawn_call(gateway, pending, config);

    let subject = game.snapshot().subject.unwrap_or_default();
    println!("Draw: {}", subject);
    ask(input, "Grab some paper. Press Enter when you're done...").await?;
    game.finish()?;

    if game.is_awaiting() {
        println!("The AI is still sketching...");
    }
    game.apply(call.await?);
    if let Some(description) = game.snapshot().ai_description {
        println!("\nThe AI's take:\n{}\n", description);
    }

    loop {
        let answer = ask(input, "Who won? (user / ai / draw)").await?;
        let Ok(winner) = answer.parse::<Winner>() else {
            println!("Type user, ai or draw.");
            continue;
        };
        let record = game.vote(winner)?;
        println!(
            "Scores: you {} / ai {} / draws {}",
            record.user_wins, record.ai_wins, record.draws
        );
        return Ok(());
    }
}

async fn roast(
    config: &BusterConfig,
    gateway: &Arc<dyn CompletionGateway>,
    tone: &str,
    toast: bool,
    name: Option<String>,
) -> anyhow::Result<()> {
    let tone: Tone = tone
        .parse()
        .map_err(|_| anyhow!("unknown tone '{}' (expected nice, sarcastic or absurd)", tone))?;

    let mut game = RoastToast::new();
    game.select_tone(tone);
    game.set_intent(if toast { Intent::Toast } else { Intent::Roast });
    if let Some(name) = name {
        game.set_target_name(name);
    }

    let pending = game.generate()?;
    game.apply(spawn_call(gateway, pending, config).await?);

    let snapshot = game.snapshot();
    if let Some(text) = snapshot.result {
        println!("[{}] {}", snapshot.effect.unwrap_or_default(), text);
    }
    Ok(())
}

async fn roleplay(
    config: &BusterConfig,
    gateway: &Arc<dyn CompletionGateway>,
    input: &mut Input,
) -> anyhow::Result<()> {
    let mut game = RoleplayAdventure::new();
    let pending = game.start()?;
    println!("Scenario: {}\n", game.snapshot().scenario.unwrap_or_default());
    game.apply(spawn_call(gateway, pending, config).await?);
    print_latest_narration(&game);

    while game.phase() != Phase::Resolved {
        let action = ask(input, &format!("[turn {}] What do you do?", game.turn() + 1)).await?;
        let pending = match game.submit(&action) {
            Ok(pending) => pending,
            Err(GameError::EmptyInput) => continue,
            Err(e) => bail!(e),
        };
        game.apply(spawn_call(gateway, pending, config).await?);
        print_latest_narration(&game);
    }
    println!("\nThe end.");
    Ok(())
}

fn print_latest_narration(game: &RoleplayAdventure) {
    if let Some(last) = game.transcript().last() {
        println!("\n{}\n", last.text);
    }
}

async fn creativity(
    config: &BusterConfig,
    gateway: &Arc<dyn CompletionGateway>,
    input: &mut Input,
) -> anyhow::Result<()> {
    let mut game = CreativityChallenge::with_countdown(config.countdown_ticks);
    let pending = game.start()?;
    let call = spawn_call(gateway, pending, config);
    let (challenge, deadline) = game
        .challenge()
        .map(|c| (c.challenge_text.clone(), c.deadline_ticks))
        .context("challenge missing after start")?;

    println!("Challenge: {}", challenge);
    println!(
        "You have {}. Type your answer and press Enter, or type 'skip'.",
        format_time(deadline)
    );

    let mut countdown = spawn_countdown(config.tick_interval(), deadline);
    let mut last_urgency = Urgency::for_remaining(deadline);
    let mut input_open = true;

    let resolution = loop {
        tokio::select! {
            // Typed input wins a tie with the clock
            biased;

            line = input.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                if line.trim().eq_ignore_ascii_case("skip") {
                    break game.skip()?;
                }
                game.set_response(line)?;
                match game.submit_early() {
                    Ok(resolution) => break resolution,
                    Err(GameError::EmptyInput) => println!("Write something first (or 'skip')."),
                    Err(e) => bail!(e),
                }
            }
            tick = countdown.next_tick() => {
                if tick.is_none() {
                    // Clock task ended without our last tick landing
                    break game.resolution().unwrap_or(Resolution::Timeout);
                }
                if let Some(resolution) = game.tick() {
                    break resolution;
                }
                let remaining = game.challenge().map(|c| c.remaining()).unwrap_or_default();
                let urgency = Urgency::for_remaining(remaining);
                if urgency != last_urgency {
                    println!("{} left!", format_time(remaining));
                    last_urgency = urgency;
                }
            }
        }
    };
    countdown.stop();

    match resolution {
        Resolution::Timeout => println!("\nTime's up!"),
        Resolution::Skip => println!("\nSkipped."),
        Resolution::EarlySubmit => println!("\nSubmitted."),
    }

    game.apply(call.await?);
    let snapshot = game.snapshot();
    if !snapshot.response.trim().is_empty() {
        println!("\nYou: {}", snapshot.response);
    }
    if let Some(ai) = snapshot.ai_response {
        println!("\nAI: {}", ai);
    }
    Ok(())
}

async fn haiku(
    config: &BusterConfig,
    gateway: &Arc<dyn CompletionGateway>,
    theme: Option<String>,
    title: Option<String>,
) -> anyhow::Result<()> {
    let mut game = HaikuGenerator::new();
    if let Some(title) = title {
        game.set_title(title);
    }
    if let Some(theme) = theme {
        game.set_theme(theme);
        game.use_theme();
    }

    let pending = game.generate()?;
    game.apply(spawn_call(gateway, pending, config).await?);

    println!();
    for line in game.lines() {
        println!("  {}", line);
    }
    println!();
    Ok(())
}
