// src/main.rs

use std::io::{self, BufRead, Write};
use std::time::Instant;

use log::info;

use mathforge::constants::DEFAULT_OPTION_COUNT;
use mathforge::progress::quiz_xp;
use mathforge::{
    AnswerEvent, Engine, MathCategory, QuizConfig, SqliteStore, TierId, RANKS, TIERS,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting MathForge...");
    let db_path =
        std::env::var("MATHFORGE_DB").unwrap_or_else(|_| "mathforge.db".to_string());
    info!("Database path: {db_path}");
    let store = SqliteStore::open(&db_path).expect("Failed to open DB");
    let mut engine = Engine::new(Box::new(store));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("MathForge - pick a tier:");
    for (i, t) in TIERS.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, t.name, t.description);
    }
    if let Some(tier_id) = prompt_tier(&mut lines) {
        engine.select_tier(tier_id);
    }

    println!(
        "Categories: tables, squares, cubes, reciprocals, powers, mental, mixed. 'q' quits."
    );
    let mut session_streak: u64 = 0;
    loop {
        let Some(category) = prompt_category(&mut lines) else {
            break;
        };
        let config = QuizConfig::default();
        let question = match engine.next_question(category, DEFAULT_OPTION_COUNT, &config, None)
        {
            Ok(q) => q,
            Err(e) => {
                eprintln!("could not generate a question: {e}");
                continue;
            }
        };

        println!("\n{}", question.prompt);
        for (i, opt) in question.options.iter().enumerate() {
            println!("  {}. {}", i + 1, opt.label);
        }
        let started = Instant::now();
        let picked = prompt_index(&mut lines, question.options.len());
        let time_taken_ms = started.elapsed().as_millis() as u64;

        let is_correct = picked
            .and_then(|i| question.options.get(i))
            .map(|opt| opt.id == question.correct_option_id)
            .unwrap_or(false);

        if is_correct {
            session_streak += 1;
            engine.award_xp(quiz_xp(session_streak - 1));
            println!("Correct!");
        } else {
            session_streak = 0;
            let answer = question
                .correct_option()
                .map(|o| o.label.clone())
                .unwrap_or_default();
            println!("Incorrect. The answer was {answer}");
        }

        engine.submit_answer(&AnswerEvent {
            category,
            is_correct,
            time_taken_ms,
            question_id: Some(question.id.clone()),
        });

        if engine.take_rank_up() {
            println!("*** Rank up! You are now {} ***", engine.progress().rank_title());
        }

        let stats = engine.stats();
        println!(
            "XP {} (level {}) | day streak {} | difficulty {} | petals {} embers {} | rank {}/{}",
            stats.xp,
            stats.level,
            stats.streak,
            engine.difficulty_level(category),
            engine.progress().petals,
            engine.progress().embers,
            engine.progress().rank + 1,
            RANKS.len(),
        );
    }

    println!("Goodbye!");
}

fn prompt_tier(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<TierId> {
    print!("tier [1-4, enter to skip]> ");
    io::stdout().flush().ok()?;
    let line = lines.next()?.ok()?;
    match line.trim() {
        "1" => Some(TierId::Gentle),
        "2" => Some(TierId::Focused),
        "3" => Some(TierId::Trial),
        "4" => Some(TierId::Dragon),
        _ => None,
    }
}

fn prompt_category(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Option<MathCategory> {
    loop {
        print!("\ncategory> ");
        io::stdout().flush().ok()?;
        let line = lines.next()?.ok()?;
        let trimmed = line.trim();
        if trimmed == "q" || trimmed == "quit" {
            return None;
        }
        match trimmed.parse::<MathCategory>() {
            Ok(category) => return Some(category),
            Err(e) => eprintln!("{e}"),
        }
    }
}

fn prompt_index(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    count: usize,
) -> Option<usize> {
    print!("answer [1-{count}]> ");
    io::stdout().flush().ok()?;
    let line = lines.next()?.ok()?;
    let picked: usize = line.trim().parse().ok()?;
    if (1..=count).contains(&picked) {
        Some(picked - 1)
    } else {
        None
    }
}
