use anyhow::{Context, Result};
use meal_planner::api_connection::Provider;
use meal_planner::cli::{parse_args, Command};
use meal_planner::config::AppConfig;
use meal_planner::grocery::export::{render_sectioned_list, write_csv_file};
use meal_planner::grocery::{GroceryListController, RefinementGateway};
use meal_planner::nutrition::{estimate_macros, needs_macro_estimate, per_serving_macros, nutrient_per_serving};
use meal_planner::nutrition::{CALORIES, CARBOHYDRATES, FAT, PROTEIN};
use meal_planner::plan::{DayOfWeek, MealType, PlanStore, WeeklyPlan};
use meal_planner::recipe_provider::{Recipe, RecipeClient, SearchOptions, SearchRecipesResponse};
use tracing::{info, warn};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes found.");
        return;
    }
    for recipe in recipes {
        println!("{:>8}  {} ({} mins, serves {})", recipe.id, recipe.title, recipe.ready_in_minutes, recipe.servings);
    }
}

fn print_search(response: &SearchRecipesResponse) {
    print_recipes(&response.results);
    if response.total_results > 0 {
        println!("\nShowing {} of {} results", response.results.len(), response.total_results);
    }
}

fn print_recipe_details(recipe: &Recipe) {
    println!("{}", recipe.title);
    println!("Serves {} | Ready in {} mins", recipe.servings, recipe.ready_in_minutes);
    println!("\nIngredients:");
    for ingredient in &recipe.extended_ingredients {
        if let Some(line) = ingredient.original.as_deref().or(ingredient.name.as_deref()) {
            println!("  • {}", line);
        }
    }
    let steps = recipe.steps();
    println!("\nInstructions:");
    if steps.is_empty() {
        println!("  No instructions available.");
    }
    for (idx, step) in steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
}

fn print_plan(plan: &WeeklyPlan) {
    for day in DayOfWeek::ALL {
        println!("{}", day);
        for meal in MealType::ALL {
            match plan.meal(day, meal) {
                Some(recipe) => println!("  {:<10} {} ({} mins)", meal, recipe.title, recipe.ready_in_minutes),
                None => println!("  {:<10} -", meal),
            }
        }
    }
}

async fn run_macros(config: &AppConfig, client: &RecipeClient, recipe_id: i64, servings: u32) -> Result<()> {
    let Some(mut recipe) = client.get_recipe_details(recipe_id).await else {
        println!("Recipe not found.");
        return Ok(());
    };

    // The provider sometimes returns all-zero nutrition on the first fetch.
    if needs_macro_estimate(&recipe) {
        if let Some(refetched) = client.get_recipe_details(recipe_id).await {
            recipe = refetched;
        }
    }

    println!("{} (per {} serving{})", recipe.title, servings, if servings == 1 { "" } else { "s" });
    if needs_macro_estimate(&recipe) {
        info!("No nutrition data from the recipe provider, asking for an estimate");
        let provider = Provider::from_config(config);
        match estimate_macros(&provider, &recipe).await {
            Some(estimate) => {
                let m = estimate.scaled(servings);
                println!("  Calories: {} kcal (estimated)", m.calories);
                println!("  Protein:  {}g", m.protein);
                println!("  Carbs:    {}g", m.carbs);
                println!("  Fat:      {}g", m.fat);
            }
            None => println!("  No nutrition data yet."),
        }
        return Ok(());
    }

    if servings == 1 {
        let m = per_serving_macros(&recipe);
        println!("  Calories: {} kcal", m.calories);
        println!("  Protein:  {}g", m.protein);
        println!("  Carbs:    {}g", m.carbs);
        println!("  Fat:      {}g", m.fat);
    } else {
        println!("  Calories: {} kcal", nutrient_per_serving(&recipe, CALORIES, servings));
        println!("  Protein:  {}g", nutrient_per_serving(&recipe, PROTEIN, servings));
        println!("  Carbs:    {}g", nutrient_per_serving(&recipe, CARBOHYDRATES, servings));
        println!("  Fat:      {}g", nutrient_per_serving(&recipe, FAT, servings));
    }
    Ok(())
}

async fn run_grocery(
    config: &AppConfig,
    plan: &WeeklyPlan,
    offline: bool,
    edits: Vec<(usize, String)>,
    output: Option<std::path::PathBuf>,
    csv: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut controller = GroceryListController::new();

    if offline {
        if let Some(ticket) = controller.plan_changed(plan) {
            let text = render_sectioned_list(ticket.ingredients());
            controller.apply_refinement(ticket.token(), Ok(text));
        }
    } else {
        let gateway = RefinementGateway::new(Provider::from_config(config));
        controller.refresh(plan, &gateway).await;
    }

    for (index, text) in edits {
        if !controller.set_override(index, text) {
            warn!(index, "No such line in the grocery list, edit ignored");
        }
    }

    let display = controller.display_text();
    println!("{}", display);

    if let Some(path) = output {
        tokio::fs::write(&path, &display)
            .await
            .with_context(|| format!("Failed to write grocery list to '{}'", path.display()))?;
        info!(path = %path.display(), "grocery list written");
    }
    if let Some(path) = csv {
        write_csv_file(&path, controller.aggregated())?;
        info!(path = %path.display(), "aggregated ingredients written as CSV");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli_args = parse_args();
    let mut config = AppConfig::from_env();
    if let Some(path) = cli_args.plan_file {
        config.plan_path = path;
    }

    let client = RecipeClient::from_config(&config);
    let store = PlanStore::new(config.plan_path.clone());

    match cli_args.command {
        Command::Search { query, meal_type, diet, exclude, limit, offset } => {
            let options = SearchOptions {
                offset,
                limit,
                meal_type,
                diet,
                exclude_ingredients: exclude,
                ..SearchOptions::default()
            };
            print_search(&client.search_recipes(&query, &options).await);
        }
        Command::Healthy { meal_type, limit } => {
            print_search(&client.get_healthy_recipes(0, limit, meal_type).await);
        }
        Command::Random => match client.get_random_recipe().await {
            Some(recipe) => print_recipe_details(&recipe),
            None => println!("No recipe available."),
        },
        Command::ByIngredients { ingredients, number } => {
            print_recipes(&client.find_recipes_by_ingredients(&ingredients, number).await);
        }
        Command::ShowRecipe { id } => match client.get_recipe_details(id).await {
            Some(recipe) => print_recipe_details(&recipe),
            None => println!("Recipe not found."),
        },
        Command::Add { day, meal, recipe_id } => {
            let Some(recipe) = client.get_recipe_details(recipe_id).await else {
                println!("Recipe not found; plan unchanged.");
                return Ok(());
            };
            let mut plan = store.load().await;
            println!("Added '{}' to {} {}", recipe.title, day, meal);
            plan.set_meal(day, meal, recipe);
            store.save(&plan).await?;
        }
        Command::Remove { day, meal } => {
            let mut plan = store.load().await;
            match plan.remove_meal(day, meal) {
                Some(recipe) => {
                    store.save(&plan).await?;
                    println!("Removed '{}' from {} {}", recipe.title, day, meal);
                }
                None => println!("{} {} is already empty", day, meal),
            }
        }
        Command::Clear => {
            store.save(&WeeklyPlan::default()).await?;
            println!("Meal plan cleared.");
        }
        Command::Show => print_plan(&store.load().await),
        Command::Macros { recipe_id, servings } => {
            run_macros(&config, &client, recipe_id, servings).await?;
        }
        Command::Grocery { offline, edits, output, csv } => {
            let plan = store.load().await;
            run_grocery(&config, &plan, offline, edits, output, csv).await?;
        }
    }

    Ok(())
}
