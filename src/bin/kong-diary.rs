use chrono::Datelike;
use clap::{Arg, ArgMatches, Command};
use kong_diary::calendar::{CalendarGrid, YearMonth};
use kong_diary::diary::DiaryEntry;
use kong_diary::error::{Error, Result};
use kong_diary::mood::{score_breakdown, score_text};
use kong_diary::KongDiary;

const ENV_EMAIL: &str = "KONG_DIARY_EMAIL";
const ENV_PASSWORD: &str = "KONG_DIARY_PASSWORD";

fn cli() -> Command<'static> {
    let month = Arg::new("month")
        .short('m')
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to show, defaults to the current one")
        .takes_value(true);

    Command::new("kong-diary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Kong diary from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("mood")
                .about("Score a text with the keyword mood tagger")
                .arg(Arg::new("text").help("Text to score").required(true))
                .arg(
                    Arg::new("breakdown")
                        .short('b')
                        .long("breakdown")
                        .help("Print the score of every mood"),
                ),
        )
        .subcommand(
            Command::new("calendar")
                .about("Print a month of diary entries as a calendar")
                .arg(month.clone()),
        )
        .subcommand(
            Command::new("summary")
                .about("Count the moods of a month")
                .arg(month),
        )
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(err) = run(cli().get_matches()).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("mood", args)) => {
            let text = args.value_of("text").unwrap_or_default();
            print_mood(text, args.is_present("breakdown"));
            Ok(())
        }
        Some(("calendar", args)) => {
            let month = month_arg(args)?;
            let diary = signed_in().await?;
            let grid = diary.diaries().month_grid(month).await?;
            print_grid(&grid);
            Ok(())
        }
        Some(("summary", args)) => {
            let month = month_arg(args)?;
            let diary = signed_in().await?;
            let summary = diary.diaries().mood_summary(month).await?;
            println!("{}: {} entries", summary.month, summary.total);
            for (label, count) in &summary.counts {
                println!("  {} {:<10} {}", label.emoji(), label.as_str(), count);
            }
            if let Some(label) = summary.dominant() {
                println!("mostly {} {}", label.emoji(), label.description());
            }
            Ok(())
        }
        _ => Err(Error::general("unknown command")),
    }
}

fn month_arg(args: &ArgMatches) -> Result<YearMonth> {
    match args.value_of("month") {
        Some(raw) => Ok(raw.parse::<YearMonth>()?),
        None => Ok(YearMonth::of(chrono::Local::now().date_naive())),
    }
}

/// Reuses the stored session, signing in from the environment otherwise.
async fn signed_in() -> Result<KongDiary> {
    let diary = KongDiary::from_env()?;
    if diary.auth().restore_session().await?.is_some() {
        return Ok(diary);
    }

    let email = std::env::var(ENV_EMAIL)
        .map_err(|_| Error::config(format!("not signed in and {} is not set", ENV_EMAIL)))?;
    let password = std::env::var(ENV_PASSWORD)
        .map_err(|_| Error::config(format!("{} is not set", ENV_PASSWORD)))?;
    diary.auth().sign_in(&email, &password).await?;
    Ok(diary)
}

fn print_mood(text: &str, breakdown: bool) {
    let score = score_text(text);
    println!(
        "{} {} ({}) {}",
        score.label.emoji(),
        score.label,
        score.score,
        score.label.description()
    );

    if breakdown {
        for (label, count) in score_breakdown(text) {
            if count > 0 {
                println!("  {:<10} {}", label.as_str(), count);
            }
        }
    }
}

fn print_grid(grid: &CalendarGrid<DiaryEntry>) {
    println!("{:^28}", grid.month().to_string());
    println!(" Sun Mon Tue Wed Thu Fri Sat");
    for week in grid.weeks() {
        let row: String = week
            .iter()
            .map(|cell| {
                if !cell.belongs_to_focused_month {
                    "    ".to_string()
                } else {
                    match cell.entries.first() {
                        Some(entry) => format!("{:>2}{} ", cell.date.day(), entry.display_emoji()),
                        None => format!("{:>3} ", cell.date.day()),
                    }
                }
            })
            .collect();
        println!("{}", row.trim_end());
    }
}
