//! `nutri` - log meals and weight, and turn receipts into recipe ideas.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nutri_ledger::client::{RecipeService, SpoonacularClient};
use nutri_ledger::config::Config;
use nutri_ledger::foods::FoodDatabase;
use nutri_ledger::health::{self, BodyProfile, Sex};
use nutri_ledger::lookup::lookup_nutrition;
use nutri_ledger::models::{parse_date_key, DietaryProfile, MealTypePreference, SourceKind};
use nutri_ledger::nutrients::NutrientVector;
use nutri_ledger::session::Session;
use nutri_ledger::store::JsonFileStore;
use nutri_ledger::{ingredients, pipeline, NutrientKey};

#[derive(Debug, Parser)]
#[command(name = "nutri", version, about)]
struct Cli {
    /// Identity whose ledger to use
    #[arg(short, long, global = true, env = "NUTRI_USER", default_value = "default")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the ingredients found in a text file (or stdin)
    Extract { file: Option<PathBuf> },
    /// Suggest recipes for the ingredients in a text file (or stdin)
    Recipes(RecipesArgs),
    /// Look up nutrition for a food
    Lookup { food: String },
    /// Log a meal into today's ledger
    LogMeal(LogMealArgs),
    /// Record today's (or a given day's) weight in kg
    LogWeight {
        weight: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Show today's totals and history
    Summary {
        /// Daily calorie target for progress
        #[arg(long)]
        target: Option<f64>,
    },
    /// BMI and calorie targets
    Metrics(MetricsArgs),
}

#[derive(Debug, Args)]
struct RecipesArgs {
    file: Option<PathBuf>,
    /// Non-Vegetarian, Vegetarian, Eggetarian or Vegan
    #[arg(long, default_value = "Non-Vegetarian")]
    diet: String,
    /// Comma-separated ingredients to exclude
    #[arg(long, default_value = "")]
    exclude: String,
}

#[derive(Debug, Args)]
struct LogMealArgs {
    /// Food name; nutrition is looked up unless --calories is given
    name: String,
    #[arg(long)]
    calories: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    protein: f64,
    #[arg(long, default_value_t = 0.0)]
    carbs: f64,
    #[arg(long, default_value_t = 0.0)]
    fat: f64,
    /// Log a recipe by its id instead of a food name
    #[arg(long)]
    recipe: Option<i64>,
}

#[derive(Debug, Args)]
struct MetricsArgs {
    #[arg(long)]
    age: u32,
    #[arg(long)]
    height: f64,
    /// Defaults to the latest logged weight
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long, default_value = "female")]
    sex: String,
    /// 1 (sedentary) to 5 (extra active)
    #[arg(long, default_value_t = 1)]
    activity: u8,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let today = Local::now().date_naive();

    match cli.command {
        Command::Extract { file } => {
            let text = read_input(file.as_ref())?;
            for item in ingredients::extract(&text) {
                println!("{}", item);
            }
        }
        Command::Recipes(args) => {
            let config = Config::from_env()?;
            let client = SpoonacularClient::from_config(&config);
            let profile = DietaryProfile {
                meal_type: args.diet.parse::<MealTypePreference>()?,
                exclusion_tags: args.exclude.split(',').map(String::from).collect(),
            };
            let text = read_input(args.file.as_ref())?;
            let query = pipeline::prepare_query(&text, &profile, config.recipe_count)?;
            let recipes = client.search_recipes(&query).await?;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
        Command::Lookup { food } => {
            let config = Config::from_env()?;
            let client = SpoonacularClient::from_config(&config);
            let local = load_foods(&config)?;
            let record = lookup_nutrition(&food, local.as_ref(), &client).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::LogMeal(args) => {
            let config = Config::offline_from_env()?;
            let store = JsonFileStore::new(&config.data_dir);
            let mut session = Session::start(&store, &cli.user, today)?;

            let (name, nutrients, source) = meal_nutrients(&config, &args).await?;
            let entry = session.log_meal(nutrients, &name, source)?;
            println!(
                "Logged {} ({:.0} kcal). Today: {:.0} kcal",
                entry.name,
                entry.calories,
                session.ledger().current_summary().calories
            );
        }
        Command::LogWeight { weight, date } => {
            let config = Config::offline_from_env()?;
            let store = JsonFileStore::new(&config.data_dir);
            let mut session = Session::start(&store, &cli.user, today)?;
            let date = match date {
                Some(d) => parse_date_key(&d)?,
                None => today,
            };
            let entry = session.log_weight(date, weight)?;
            println!("Weight for {}: {:.1} kg", entry.date, entry.weight);
        }
        Command::Summary { target } => {
            let config = Config::offline_from_env()?;
            let store = JsonFileStore::new(&config.data_dir);
            let session = Session::start(&store, &cli.user, today)?;
            print_summary(&session, target);
        }
        Command::Metrics(args) => {
            let config = Config::offline_from_env()?;
            let store = JsonFileStore::new(&config.data_dir);
            let session = Session::start(&store, &cli.user, today)?;

            let sex = match args.sex.to_lowercase().as_str() {
                "male" | "m" => Sex::Male,
                _ => Sex::Female,
            };
            let mut profile = BodyProfile {
                age: args.age,
                height_cm: args.height,
                weight_kg: args.weight.unwrap_or(0.0),
                sex,
                activity_level: args.activity,
            };
            if args.weight.is_none() {
                profile = profile.with_current_weight(session.weights());
            }
            let metrics = health::calculate(&profile)?;
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
    }

    Ok(())
}

async fn meal_nutrients(
    config: &Config,
    args: &LogMealArgs,
) -> Result<(String, NutrientVector, SourceKind)> {
    if let Some(calories) = args.calories {
        let nutrients = NutrientVector::zero()
            .with(NutrientKey::Calories, calories)
            .with(NutrientKey::ProteinContent, args.protein)
            .with(NutrientKey::CarbohydrateContent, args.carbs)
            .with(NutrientKey::FatContent, args.fat);
        return Ok((args.name.clone(), nutrients, SourceKind::Manual));
    }

    if config.api_key.is_empty() && config.foods_json.is_none() {
        return Err(anyhow!(
            "no --calories given and neither SPOONACULAR_API_KEY nor NUTRI_FOODS_JSON is set"
        ));
    }
    let client = SpoonacularClient::from_config(config);

    if let Some(id) = args.recipe {
        if config.api_key.is_empty() {
            return Err(anyhow!("--recipe needs SPOONACULAR_API_KEY"));
        }
        let details = client.recipe_details(id).await?;
        return Ok((details.title, details.nutrients, SourceKind::Recipe));
    }

    let local = load_foods(config)?;
    let record = lookup_nutrition(&args.name, local.as_ref(), &client).await?;
    Ok((record.name, record.nutrients, SourceKind::Manual))
}

fn load_foods(config: &Config) -> Result<Option<FoodDatabase>> {
    config
        .foods_json
        .as_deref()
        .map(|path| {
            FoodDatabase::load(path).with_context(|| format!("loading {}", path.display()))
        })
        .transpose()
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("reading stdin"),
    }
}

fn print_summary(session: &Session<'_, JsonFileStore>, target: Option<f64>) {
    let ledger = session.ledger();
    println!("{} ({})", ledger.current_date(), session.identity());
    for (key, value) in ledger.current_summary().iter() {
        println!("  {:<22} {:>8.1}", key, value);
    }

    if !ledger.meal_log().is_empty() {
        println!("Meals:");
        for meal in ledger.meal_log() {
            println!(
                "  {} {:<30} {:>6.0} kcal",
                meal.logged_at.with_timezone(&Local).format("%H:%M"),
                meal.name,
                meal.calories
            );
        }
    }

    if let Some(target) = target {
        let p = health::progress(ledger.current_summary(), target);
        println!(
            "Target {:.0} kcal: {:.1}% used, {:.0} kcal remaining",
            p.target, p.percent, p.remaining
        );
    }

    if !ledger.archive().is_empty() {
        println!("History:");
        for (date, summary) in ledger.archive().iter().rev().take(7) {
            println!("  {}  {:>6.0} kcal", date, summary.calories);
        }
    }

    if let Some(latest) = session.weights().latest() {
        println!("Current weight: {:.1} kg ({})", latest.weight, latest.date);
    }
}
