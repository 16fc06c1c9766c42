use chrono::Timelike;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use wellness_core::*;

#[derive(Parser)]
#[command(name = "keel")]
#[command(about = "Personal wellness and course planning tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wellness dashboard (default)
    Dashboard,

    /// Log today's wellness entry
    Log {
        /// Hours slept
        #[arg(long)]
        sleep: f64,

        /// Stress level, 1-10
        #[arg(long)]
        stress: u8,

        /// Hours studied
        #[arg(long)]
        study: f64,

        /// Mood (great, good, okay, bad, terrible)
        #[arg(long)]
        mood: String,
    },

    /// Manage and rank planned courses
    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },

    /// Roll up journaled entries into the CSV archive
    Export {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Subcommand)]
enum CourseCommands {
    /// Add a course to the portfolio
    Add {
        /// Course name
        name: String,

        /// Target grade percentage
        #[arg(long)]
        target: f64,
    },

    /// Record an assessment on a course, graded or pending
    Assess {
        /// Course name
        course: String,

        /// Assessment name
        name: String,

        /// Weight as a percentage of the course grade
        #[arg(long)]
        weight: f64,

        /// Grade, if already received
        #[arg(long)]
        grade: Option<f64>,
    },

    /// Remove a course from the portfolio
    Remove {
        /// Course name
        name: String,
    },

    /// Rank courses by how urgently they need attention
    Rank {
        /// Rank a JSON request from a file instead of the portfolio ('-' for stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    wellness_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Log {
            sleep,
            stress,
            study,
            mood,
        }) => cmd_log(data_dir, sleep, stress, study, &mood),
        Some(Commands::Course { command }) => match command {
            CourseCommands::Add { name, target } => cmd_course_add(data_dir, name, target),
            CourseCommands::Assess {
                course,
                name,
                weight,
                grade,
            } => cmd_course_assess(data_dir, &course, name, weight, grade),
            CourseCommands::Remove { name } => cmd_course_remove(data_dir, &name),
            CourseCommands::Rank { input, json } => cmd_course_rank(data_dir, input, json, &config),
        },
        Some(Commands::Export { cleanup }) => cmd_export(data_dir, cleanup),
        Some(Commands::Dashboard) | None => cmd_dashboard(data_dir, &config),
    }
}

/// File layout under the data directory
struct DataPaths {
    journal_dir: PathBuf,
    journal: PathBuf,
    csv: PathBuf,
    portfolio: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let journal_dir = data_dir.join("journal");
        Self {
            journal: journal_dir.join("wellness_log.jsonl"),
            journal_dir,
            csv: data_dir.join("entries.csv"),
            portfolio: data_dir.join("courses.json"),
        }
    }
}

fn cmd_dashboard(data_dir: PathBuf, config: &Config) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    let clock = LocalClock::system();
    let entries = load_entries(&paths.journal, &paths.csv)?;

    let local_hour = clock.now.with_timezone(&clock.offset).hour();
    let greeting = match local_hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  KEEL WELLNESS DASHBOARD");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}! {}", greeting, pick_message(&entries).text());
    println!();

    if entries.is_empty() {
        println!("  No entries yet. Log your first day with `keel log`.");
        println!();
        return Ok(());
    }

    let streak = streak_length(&entries, &clock);
    println!("  Streak: {} day{}", streak, if streak == 1 { "" } else { "s" });
    if logged_today(&entries, &clock) {
        println!("  Today: logged ✓");
    } else {
        println!("  Today: not logged yet");
    }

    if let Some(overall) = overall_summary(&entries) {
        println!();
        println!("  All time ({} entries)", overall.entries);
        println!(
            "    Sleep: {:.1}h   Stress: {:.1}/10   Study: {:.1}h",
            overall.avg_sleep_hours, overall.avg_stress_level, overall.avg_study_hours
        );
    }

    if let Some(weekly) = weekly_summary(&entries, config.goals.weekly_study_hours) {
        println!();
        println!("  Last {} entries", weekly.entries);
        println!(
            "    Sleep: {:.1}h   Stress: {:.1}/10 ({})",
            weekly.avg_sleep_hours,
            weekly.avg_stress_level,
            stress_band(weekly.avg_stress_level)
        );
        println!(
            "    Study: {:.1}h of {:.0}h goal",
            weekly.study_hours_total, weekly.goal_hours
        );
        let goal_note = if weekly.goal_progress >= 1.0 {
            "  goal achieved!"
        } else {
            ""
        };
        println!(
            "    [{}] {:.0}%{}",
            progress_bar(weekly.goal_progress, 20),
            weekly.goal_progress * 100.0,
            goal_note
        );
    }

    let insights = generate_insights(&entries);
    if !insights.is_empty() {
        println!();
        println!("  Insights");
        for insight in insights {
            println!("    • {}", insight.text());
        }
    }
    println!();

    Ok(())
}

fn cmd_log(data_dir: PathBuf, sleep: f64, stress: u8, study: f64, mood: &str) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    std::fs::create_dir_all(&paths.journal_dir)?;

    let Some(mood) = Mood::parse(mood) else {
        return Err(Error::Other(format!(
            "unknown mood '{}' (expected great, good, okay, bad, or terrible)",
            mood
        )));
    };

    let sleep_hours = clamp_hours("sleep", sleep);
    let study_hours = clamp_hours("study", study);
    let stress_level = clamp_stress(stress);

    let clock = LocalClock::system();
    let mut entries = load_entries(&paths.journal, &paths.csv)?;

    if logged_today(&entries, &clock) {
        println!("You already logged today. Come back tomorrow!");
        return Ok(());
    }

    let entry = WellnessEntry {
        id: uuid::Uuid::new_v4(),
        created_at: clock.now,
        sleep_hours,
        stress_level,
        study_hours,
        mood,
    };

    let mut journal = JsonlJournal::new(&paths.journal);
    journal.append(&entry)?;

    println!("✓ Entry logged!");
    println!(
        "  Sleep: {:.1}h   Stress: {}/10 ({})   Study: {:.1}h   Mood: {}",
        entry.sleep_hours,
        entry.stress_level,
        stress_band(entry.stress_level as f64),
        entry.study_hours,
        entry.mood.label()
    );

    entries.push(entry);
    let streak = streak_length(&entries, &clock);
    println!("  Streak: {} day{}", streak, if streak == 1 { "" } else { "s" });

    Ok(())
}

fn cmd_course_add(data_dir: PathBuf, name: String, target: f64) -> Result<()> {
    let paths = DataPaths::new(&data_dir);

    let course = Course {
        name,
        target_grade: target,
        assessments: vec![],
    };
    planner::validate(&EvaluationRequest {
        courses: vec![course.clone()],
    })?;

    let display = course.name.clone();
    CoursePortfolio::update(&paths.portfolio, |portfolio| portfolio.add_course(course))?;

    println!("✓ Added course '{}' with target {:.0}%", display, target);
    Ok(())
}

fn cmd_course_assess(
    data_dir: PathBuf,
    course_name: &str,
    name: String,
    weight: f64,
    grade: Option<f64>,
) -> Result<()> {
    let paths = DataPaths::new(&data_dir);

    CoursePortfolio::update(&paths.portfolio, |portfolio| {
        let course = portfolio.course_mut(course_name).ok_or_else(|| {
            Error::Portfolio(format!("no course named '{}'", course_name))
        })?;

        course.assessments.push(Assessment {
            name: name.clone(),
            weight,
            grade,
        });

        // Reject the whole edit if the course no longer validates
        planner::validate(&EvaluationRequest {
            courses: vec![course.clone()],
        })
    })?;

    match grade {
        Some(grade) => println!(
            "✓ Recorded '{}' at {:.1}% weight with grade {:.1}%",
            name, weight, grade
        ),
        None => println!("✓ Added pending '{}' at {:.1}% weight", name, weight),
    }
    Ok(())
}

fn cmd_course_remove(data_dir: PathBuf, name: &str) -> Result<()> {
    let paths = DataPaths::new(&data_dir);

    let mut removed_name = String::new();
    CoursePortfolio::update(&paths.portfolio, |portfolio| {
        let removed = portfolio.remove_course(name)?;
        removed_name = removed.name;
        Ok(())
    })?;

    println!("✓ Removed course '{}'", removed_name);
    Ok(())
}

fn cmd_course_rank(
    data_dir: PathBuf,
    input: Option<PathBuf>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let paths = DataPaths::new(&data_dir);

    let request = match input {
        Some(path) => read_request(&path)?,
        None => CoursePortfolio::load(&paths.portfolio)?.to_request(),
    };

    if request.courses.is_empty() {
        println!("No courses to rank. Add one with `keel course add`.");
        return Ok(());
    }

    let policy = config.planner.risk_policy();

    if json {
        let results = rank_courses(&request, &policy)?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let ranked = rank_detailed(&request, &policy)?;
    display_ranking(&ranked);
    Ok(())
}

fn cmd_export(data_dir: PathBuf, cleanup: bool) -> Result<()> {
    let paths = DataPaths::new(&data_dir);

    if !paths.journal.exists() {
        println!("No journal file found - nothing to export.");
        return Ok(());
    }

    let count = wellness_core::archive::journal_to_csv_and_archive(&paths.journal, &paths.csv)?;

    println!("✓ Exported {} entries to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = wellness_core::archive::cleanup_processed_journals(&paths.journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<EvaluationRequest> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&contents)?)
}

fn display_ranking(ranked: &[RankedCourse]) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  COURSE PRIORITIES");
    println!("╰─────────────────────────────────────────╯");
    println!();

    for item in ranked {
        let evaluation = &item.evaluation;
        println!("  {}. {} [{:?}]", item.priority, evaluation.course, evaluation.risk);

        match evaluation.current_grade {
            Some(current) => println!(
                "     Current: {:.1}% over {:.0}% of the grade",
                current, evaluation.completed_weight
            ),
            None => println!("     Current: no graded work yet"),
        }

        match evaluation.required_average {
            Some(required) => println!(
                "     Needs {:.1}% on the remaining {:.0}% to reach {:.0}%",
                required, evaluation.remaining_weight, evaluation.target_grade
            ),
            None => println!(
                "     Nothing remaining; target was {:.0}%",
                evaluation.target_grade
            ),
        }
        println!();
    }
}

fn stress_band(avg: f64) -> &'static str {
    if avg <= 3.0 {
        "Low"
    } else if avg < 7.0 {
        "Moderate"
    } else {
        "High"
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn clamp_hours(label: &str, value: f64) -> f64 {
    if !value.is_finite() {
        eprintln!("{} hours must be a number, using 0", label);
        return 0.0;
    }
    if !(0.0..=24.0).contains(&value) {
        eprintln!("{} hours {} outside [0, 24], clamping", label, value);
        return value.clamp(0.0, 24.0);
    }
    value
}

fn clamp_stress(value: u8) -> u8 {
    if value < 1 {
        eprintln!("stress level {} below 1, clamping", value);
        1
    } else if value > 10 {
        eprintln!("stress level {} above 10, clamping", value);
        10
    } else {
        value
    }
}
