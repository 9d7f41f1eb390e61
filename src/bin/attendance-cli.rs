#![forbid(unsafe_code)]
use anyhow::Result;
use attendance_rules::{
    engine::{RuleEngine, RuleListing, RuleQuery, SaveOutcome},
    io,
    model::{NewRule, RuleId},
    storage::JsonStore,
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de gestion des règles de présence (un seul fichier JSON)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des règles
    #[arg(long, global = true, default_value = "saved-rules/attendance-rules.json")]
    rules: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter une règle (refusée si un créneau chevauche)
    Add {
        /// `daily`, un jour (`monday`…) ou une date YYYY-MM-DD
        #[arg(long)]
        day: String,
        /// Créneau `HH:MM-HH:MM` (répétable)
        #[arg(long = "interval", required = true)]
        intervals: Vec<String>,
    },

    /// Lister les règles, ou les projeter sur une plage de dates
    List {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        /// Export CSV de la projection (requiert les deux dates)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher une règle
    Show {
        #[arg(long)]
        id: String,
    },

    /// Supprimer une règle
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Importer des règles depuis un CSV (`day,intervals`)
    Import {
        #[arg(long)]
        csv: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let engine = RuleEngine::new(JsonStore::open(&cli.rules));

    let code = match cli.cmd {
        Commands::Add { day, intervals } => {
            let input = NewRule::parse(&day, &intervals)?;
            report_outcome(&engine.save_new_rule(input)?)
        }
        Commands::List {
            start_date,
            end_date,
            out_json,
            out_csv,
        } => {
            let query = RuleQuery::from_params(start_date.as_deref(), end_date.as_deref())?;
            let listing = engine.rules(&query)?;
            if let Some(path) = out_json {
                io::export_listing_json(path, &listing)?;
            }
            match &listing {
                RuleListing::Rules(rules) => {
                    if out_csv.is_some() {
                        eprintln!("--out-csv ignored: requires --start-date and --end-date");
                    }
                    for rule in rules {
                        let intervals: Vec<String> =
                            rule.intervals.iter().map(ToString::to_string).collect();
                        println!("{} | {} | {}", rule.id, rule.day, intervals.join(", "));
                    }
                }
                RuleListing::Days(days) => {
                    if let Some(path) = out_csv {
                        io::export_projection_csv(path, days)?;
                    }
                    for day in days {
                        let intervals: Vec<String> =
                            day.intervals.iter().map(ToString::to_string).collect();
                        println!("{} | {}", day.label, intervals.join(", "));
                    }
                }
            }
            0
        }
        Commands::Show { id } => match engine.rule(&RuleId::new(&id))? {
            Some(rule) => {
                println!("{}", serde_json::to_string_pretty(&rule)?);
                0
            }
            None => {
                eprintln!("not found: {id}");
                2
            }
        },
        Commands::Delete { id } => match engine.delete_rule(&RuleId::new(&id))? {
            Some(rule) => {
                println!("deleted {} ({})", rule.id, rule.day);
                0
            }
            None => {
                eprintln!("not found: {id}");
                2
            }
        },
        Commands::Import { csv } => {
            let inputs = io::import_rules_csv(&csv)?;
            let mut rejected = 0usize;
            for input in inputs {
                if report_outcome(&engine.save_new_rule(input)?) != 0 {
                    rejected += 1;
                }
            }
            // Code 2 = au moins une règle refusée
            if rejected > 0 {
                eprintln!("{rejected} rule(s) rejected");
                2
            } else {
                0
            }
        }
    };

    std::process::exit(code);
}

fn report_outcome(outcome: &SaveOutcome) -> i32 {
    match outcome {
        SaveOutcome::Created(rule) => {
            println!("created {} ({})", rule.id, rule.day);
            0
        }
        SaveOutcome::Rejected(conflict) => {
            match &conflict.rule {
                Some(id) => eprintln!(
                    "rejected: {} overlaps {} of rule {}",
                    conflict.candidate, conflict.existing, id
                ),
                None => eprintln!(
                    "rejected: {} overlaps {} in the same rule",
                    conflict.candidate, conflict.existing
                ),
            }
            2
        }
    }
}
