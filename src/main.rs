use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use phishshield::config::EngineConfig;
use phishshield::state::AppState;
use phishshield::{
    AnalysisError, AnalysisResult, AnalysisStatus, ContentKind, HistoryItem, ThreatAnalyzer,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let matches = Command::new("phishshield")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scores messages and links for phishing and social-engineering threats")
        .long_about("PhishShield - content threat analysis:\n\
                    • Pressure, impersonation, money-lure and link heuristics\n\
                    • 0-100 risk score with Safe / Suspicious / Scam verdicts\n\
                    • Scam category, explanation and safety lessons\n\
                    • Local history and learned-category progress")
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Message text to analyze")
                .conflicts_with("url")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Link to analyze")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .value_name("KIND")
                .help("Content kind for stdin and --queue input")
                .value_parser(["text", "url"])
                .default_value("text"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML configuration file (built-in defaults when omitted)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration to FILE and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("state")
                .short('s')
                .long("state")
                .value_name("FILE")
                .help("State file holding history and learned categories")
                .default_value("phishshield-state.json"),
        )
        .arg(
            Arg::new("queue")
                .long("queue")
                .value_name("TEXT")
                .help("Store TEXT as a pending scan for a later --scan-pending")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("scan-pending")
                .long("scan-pending")
                .help("Analyze the pending scan stored with --queue")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .help("Show past analyses, most recent first")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show the scam categories already learned")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the analysis result as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-extractor detail")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(matches.get_one::<String>("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let state_path = PathBuf::from(
        matches
            .get_one::<String>("state")
            .map(String::as_str)
            .unwrap_or("phishshield-state.json"),
    );
    let mut state = match AppState::load(&state_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error loading state: {e:#}");
            process::exit(1);
        }
    };

    let default_kind = parse_kind(&matches);

    if let Some(queued) = matches.get_one::<String>("queue") {
        state.queue_scan(queued.clone(), default_kind);
        save_state(&state, &state_path);
        println!("📥 Pending scan stored ({})", default_kind);
        return;
    }

    if matches.get_flag("history") {
        print_history(&state);
        return;
    }

    if matches.get_flag("progress") {
        print_progress(&state);
        return;
    }

    let (input, kind) = if matches.get_flag("scan-pending") {
        match state.take_pending_scan() {
            Some(pending) => (pending.input, pending.kind),
            None => {
                println!("📭 No pending scan");
                return;
            }
        }
    } else {
        match read_input(&matches, default_kind) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Error reading input: {e:#}");
                process::exit(1);
            }
        }
    };

    let analyzer = match ThreatAnalyzer::new(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error building analyzer: {e:#}");
            process::exit(1);
        }
    };

    let result = match analyzer.analyze(&input, kind) {
        Ok(result) => result,
        Err(AnalysisError::EmptyInput) => {
            eprintln!("Nothing to analyze: input is empty");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            process::exit(1);
        }
    };

    let newly_learned = if result.education.is_some() {
        state.learn(result.category)
    } else {
        false
    };
    state.record(
        HistoryItem::new(input, kind, result.clone()),
        config.history_limit,
    );
    save_state(&state, &state_path);

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                process::exit(1);
            }
        }
    } else {
        print_report(&result);
        if newly_learned {
            println!();
            println!("🎓 New lesson learned: {}", result.category);
        }
    }
}

fn parse_kind(matches: &ArgMatches) -> ContentKind {
    match matches.get_one::<String>("kind").map(String::as_str) {
        Some("url") => ContentKind::Url,
        _ => ContentKind::Text,
    }
}

fn read_input(
    matches: &ArgMatches,
    default_kind: ContentKind,
) -> anyhow::Result<(String, ContentKind)> {
    if let Some(text) = matches.get_one::<String>("text") {
        return Ok((text.clone(), ContentKind::Text));
    }
    if let Some(url) = matches.get_one::<String>("url") {
        return Ok((url.clone(), ContentKind::Url));
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok((buffer, default_kind))
}

fn load_config(path: Option<&String>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path),
        None => {
            log::debug!("No configuration file given, using built-in defaults");
            Ok(EngineConfig::default())
        }
    }
}

fn generate_default_config(path: &str) {
    let config = EngineConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Edit the brand and domain tables to suit your region.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}

fn save_state(state: &AppState, path: &Path) {
    if let Err(e) = state.save(path) {
        eprintln!("Error saving state: {e:#}");
        process::exit(1);
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn print_report(result: &AnalysisResult) {
    let icon = match result.status {
        AnalysisStatus::Safe => "✅",
        AnalysisStatus::Suspicious => "⚠️",
        AnalysisStatus::Scam => "🚨",
    };

    println!("{} {} (score {}/100)", icon, result.status, result.score);
    println!("Category: {}", result.category);
    println!("{}", result.explanation);

    if !result.flags.is_empty() {
        println!();
        println!("Signals:");
        for flag in &result.flags {
            println!("  • [{} / {:?}] {}", flag.category, flag.severity, flag.reason);
        }
    }

    if let Some(education) = &result.education {
        println!();
        println!("📘 {}", education.scam_description);
        println!("Why it is dangerous: {}", education.danger_reason);
        if !education.red_flags.is_empty() {
            println!("Red flags:");
            for flag in &education.red_flags {
                println!("  • \"{}\"", flag);
            }
        }
        println!("What to do:");
        for (i, tip) in education.safety_tips.iter().enumerate() {
            println!("  {}. {}", i + 1, tip);
        }
    }
}

fn print_history(state: &AppState) {
    if state.history.is_empty() {
        println!("📭 No analyses recorded yet");
        return;
    }

    println!("📜 History ({} item(s), most recent first)", state.history.len());
    for item in &state.history {
        println!(
            "  {}  {:<10} {:>3}  {:<28} {}",
            item.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            item.result.status,
            item.result.score,
            item.result.category,
            truncate_string(&item.input.replace('\n', " "), 50)
        );
    }
}

fn print_progress(state: &AppState) {
    if state.learned_categories.is_empty() {
        println!("📭 No scam categories learned yet");
        return;
    }

    println!("🎓 Learned categories ({}):", state.learned_categories.len());
    for category in state.learned_categories.iter() {
        println!("  • {}", category);
    }
}
