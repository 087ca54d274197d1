use anyhow::{anyhow, bail, Context, Result};
use motley_core::{
    DeckKind, Event, Run, RunPhase, SellSection, ShopSection, StakeKind,
};
use serde::Serialize;
use std::fs;

/// Seeded run driver. Without a script it plays a simple greedy policy;
/// with one it replays the listed actions, which is how engine traces get
/// reproduced from a bug report.
#[derive(Debug)]
struct Options {
    seed: u64,
    deck: DeckKind,
    stake: StakeKind,
    script: Option<String>,
    steps: u32,
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    ante: u32,
    round: u32,
    money: i64,
    jokers: Vec<String>,
    game_over: bool,
}

fn main() -> Result<()> {
    let options = parse_args()?;
    let mut run = Run::new(options.deck, options.stake, options.seed);
    drain_events(&mut run, options.json);

    match &options.script {
        Some(path) => {
            let script = fs::read_to_string(path)
                .with_context(|| format!("reading script {path}"))?;
            for (line_no, line) in script.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                execute(&mut run, line)
                    .with_context(|| format!("script line {}: {line}", line_no + 1))?;
                drain_events(&mut run, options.json);
                if run.game_over() {
                    break;
                }
            }
        }
        None => autoplay(&mut run, options.steps, options.json)?,
    }

    let summary = Summary {
        seed: options.seed,
        ante: run.ante,
        round: run.round,
        money: run.money,
        jokers: run
            .inventory
            .jokers
            .iter()
            .map(|j| j.kind.name().to_string())
            .collect(),
        game_over: run.game_over(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        seed: 1,
        deck: DeckKind::Red,
        stake: StakeKind::White,
        script: None,
        steps: 24,
        json: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                options.seed = args
                    .next()
                    .ok_or_else(|| anyhow!("--seed needs a value"))?
                    .parse()
                    .context("--seed must be an integer")?;
            }
            "--deck" => {
                let name = args.next().ok_or_else(|| anyhow!("--deck needs a value"))?;
                options.deck = parse_deck(&name)?;
            }
            "--stake" => {
                let name = args.next().ok_or_else(|| anyhow!("--stake needs a value"))?;
                options.stake = parse_stake(&name)?;
            }
            "--script" => {
                options.script = Some(
                    args.next()
                        .ok_or_else(|| anyhow!("--script needs a path"))?,
                );
            }
            "--steps" => {
                options.steps = args
                    .next()
                    .ok_or_else(|| anyhow!("--steps needs a value"))?
                    .parse()
                    .context("--steps must be an integer")?;
            }
            "--json" => options.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument {other}; try --help"),
        }
    }
    Ok(options)
}

fn print_usage() {
    println!(
        "usage: motley [--seed N] [--deck NAME] [--stake NAME] \
         [--script FILE] [--steps N] [--json]"
    );
    println!();
    println!("script commands, one per line:");
    println!("  select | skip | play I.. | discard I.. | use I [T..]");
    println!("  buy card|pack|voucher I | sell joker|consumable I");
    println!("  reroll | pick I | pack-skip | move FROM TO | next");
}

fn parse_deck(name: &str) -> Result<DeckKind> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "red" => DeckKind::Red,
        "blue" => DeckKind::Blue,
        "yellow" => DeckKind::Yellow,
        "green" => DeckKind::Green,
        "black" => DeckKind::Black,
        "magic" => DeckKind::Magic,
        "nebula" => DeckKind::Nebula,
        "ghost" => DeckKind::Ghost,
        "abandoned" => DeckKind::Abandoned,
        "checkered" => DeckKind::Checkered,
        "zodiac" => DeckKind::Zodiac,
        "painted" => DeckKind::Painted,
        "anaglyph" => DeckKind::Anaglyph,
        "plasma" => DeckKind::Plasma,
        "erratic" => DeckKind::Erratic,
        other => bail!("unknown deck {other}"),
    })
}

fn parse_stake(name: &str) -> Result<StakeKind> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "white" => StakeKind::White,
        "red" => StakeKind::Red,
        "green" => StakeKind::Green,
        "black" => StakeKind::Black,
        "blue" => StakeKind::Blue,
        "purple" => StakeKind::Purple,
        "orange" => StakeKind::Orange,
        "gold" => StakeKind::Gold,
        other => bail!("unknown stake {other}"),
    })
}

fn execute(run: &mut Run, line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    match command {
        "select" => run.select_blind()?,
        "skip" => run.skip_blind()?,
        "play" => {
            let indices = parse_indices(&rest)?;
            run.play_hand(&indices)?;
        }
        "discard" => {
            let indices = parse_indices(&rest)?;
            run.discard(&indices)?;
        }
        "use" => {
            let indices = parse_indices(&rest)?;
            let (index, targets) = indices
                .split_first()
                .ok_or_else(|| anyhow!("use needs a consumable index"))?;
            run.use_consumable(*index, targets)?;
        }
        "buy" => {
            let section = match rest.first().copied() {
                Some("card") => ShopSection::Card,
                Some("pack") => ShopSection::Pack,
                Some("voucher") => ShopSection::Voucher,
                _ => bail!("buy needs card|pack|voucher"),
            };
            let index = parse_index(rest.get(1).copied().unwrap_or("0"))?;
            run.buy_shop_item(section, index)?;
        }
        "sell" => {
            let section = match rest.first().copied() {
                Some("joker") => SellSection::Joker,
                Some("consumable") => SellSection::Consumable,
                _ => bail!("sell needs joker|consumable"),
            };
            let index = parse_index(rest.get(1).ok_or_else(|| anyhow!("sell needs an index"))?)?;
            run.sell_item(section, index)?;
        }
        "reroll" => run.reroll_shop()?,
        "pick" => {
            let index = parse_index(rest.first().ok_or_else(|| anyhow!("pick needs an index"))?)?;
            run.pick_pack_item(index)?;
        }
        "pack-skip" => run.skip_pack()?,
        "move" => {
            let from = parse_index(rest.first().ok_or_else(|| anyhow!("move needs two indices"))?)?;
            let to = parse_index(rest.get(1).ok_or_else(|| anyhow!("move needs two indices"))?)?;
            run.move_joker(from, to)?;
        }
        "next" => run.next_round()?,
        other => bail!("unknown command {other}"),
    }
    Ok(())
}

fn parse_indices(parts: &[&str]) -> Result<Vec<usize>> {
    parts.iter().map(|p| parse_index(p)).collect()
}

fn parse_index(part: &str) -> Result<usize> {
    part.parse()
        .with_context(|| format!("expected an index, got {part}"))
}

/// Plays blind after blind with the first five cards of every hand until
/// the step budget runs out or the run ends.
fn autoplay(run: &mut Run, steps: u32, json: bool) -> Result<()> {
    for _ in 0..steps {
        if run.game_over() {
            break;
        }
        match run.phase {
            RunPhase::SelectingBlind => run.select_blind()?,
            RunPhase::PlayingBlind => {
                let count = run.hand.len().min(5);
                let indices: Vec<usize> = (0..count).collect();
                run.play_hand(&indices)?;
            }
            RunPhase::Shop => run.next_round()?,
            RunPhase::OpeningPackShop | RunPhase::OpeningPackTag => run.skip_pack()?,
            RunPhase::GameOver => break,
        }
        drain_events(run, json);
    }
    Ok(())
}

fn drain_events(run: &mut Run, json: bool) {
    for event in run.events.drain() {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(_) => println!("{event:?}"),
            }
        } else {
            print_event(&event);
        }
    }
}

fn print_event(event: &Event) {
    match event {
        Event::RunStarted { seed } => println!("run started (seed {seed})"),
        Event::BlindSelected { stage, goal } => {
            println!("{} selected, goal {goal}", stage.name())
        }
        Event::BlindSkipped { stage, tag } => {
            println!("{} skipped for {:?}", stage.name(), tag)
        }
        Event::HandPlayed { kind, score } => println!("played {kind:?} for {score}"),
        Event::HandDiscarded { count } => println!("discarded {count} cards"),
        Event::BlindCleared { reward } => println!("blind cleared, +${reward}"),
        Event::AnteAdvanced { ante } => println!("ante {ante}"),
        Event::ShopEntered => println!("entered the shop"),
        Event::ShopRerolled { cost } => println!("rerolled for ${cost}"),
        Event::Purchased { label, cost } => println!("bought {label} for ${cost}"),
        Event::Sold { label, value } => println!("sold {label} for ${value}"),
        Event::VoucherBought { voucher } => println!("voucher: {}", voucher.name()),
        Event::PackOpened { options } => println!("pack opened, {options} options"),
        Event::PackPicked { label } => println!("picked {label}"),
        Event::PackSkipped => println!("pack skipped"),
        Event::TagGained { tag } => println!("tag gained: {tag:?}"),
        Event::TagResolved { tag } => println!("tag resolved: {tag:?}"),
        Event::ConsumableUsed { label } => println!("used {label}"),
        Event::HandLeveled { kind, level } => println!("{kind:?} is now level {level}"),
        Event::JokerTriggered { kind, note } => println!("{}: {note}", kind.name()),
        Event::CardDestroyed { card_id } => println!("card {card_id} destroyed"),
        Event::CardAdded { card_id } => println!("card {card_id} added"),
        Event::MoneyChanged { delta, total } => println!("money {delta:+} (now ${total})"),
        Event::GameOver { won } => {
            println!("{}", if *won { "run won" } else { "run lost" })
        }
    }
}
