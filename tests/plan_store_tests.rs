use meal_planner::grocery::aggregate;
use meal_planner::plan::{DayOfWeek, MealType, PlanStore, WeeklyPlan};
use meal_planner::recipe_provider::{ExtendedIngredient, Recipe};
use tempfile::tempdir;

fn pasta() -> Recipe {
    Recipe {
        id: 12,
        title: "Pasta".to_string(),
        servings: 2,
        extended_ingredients: vec![ExtendedIngredient {
            name: Some("spaghetti".to_string()),
            amount: Some(200.0),
            unit: Some("g".to_string()),
            original: Some("200 g spaghetti".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn missing_file_loads_empty_plan() {
    let dir = tempdir().unwrap();
    let store = PlanStore::new(dir.path().join("nothing-here.json"));
    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn corrupt_file_loads_empty_plan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    std::fs::write(&path, "{ not valid json").unwrap();
    let store = PlanStore::new(&path);
    assert_eq!(store.load().await, WeeklyPlan::default());
}

#[tokio::test]
async fn saved_plan_rebuilds_grocery_list_offline() {
    let dir = tempdir().unwrap();
    let store = PlanStore::new(dir.path().join("nested").join("plan.json"));

    let mut plan = WeeklyPlan::new();
    plan.set_meal(DayOfWeek::Wednesday, MealType::Dinner, pasta());
    plan.set_meal(DayOfWeek::Thursday, MealType::Lunch, pasta());
    store.save(&plan).await.unwrap();

    let loaded = store.load().await;
    assert_eq!(loaded, plan);
    let items = aggregate(&loaded);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].amount, 400.0);
}

#[tokio::test]
async fn cleared_plan_round_trips() {
    let dir = tempdir().unwrap();
    let store = PlanStore::new(dir.path().join("plan.json"));
    let mut plan = WeeklyPlan::new();
    plan.set_meal(DayOfWeek::Monday, MealType::Snack, pasta());
    store.save(&plan).await.unwrap();

    plan.clear();
    store.save(&plan).await.unwrap();
    assert!(store.load().await.is_empty());
}
