use std::path::PathBuf;

use brewhub_core::{Database, Recipe};
use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum RecipeAction {
    /// List recipes
    List,
    /// Print one recipe as JSON
    Show { id: String },
    /// Import a recipe from a JSON file
    Add { file: PathBuf },
    /// Select the recipe for the next brewing session
    Select { id: String },
}

pub fn run(action: RecipeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        RecipeAction::List => {
            for recipe in db.list_recipes()? {
                println!(
                    "{}  {}  {}g / {}ml @ {}C  {} steps",
                    recipe.id,
                    recipe.title,
                    recipe.coffee_grams,
                    recipe.total_water_ml,
                    recipe.water_temperature,
                    recipe.steps.len(),
                );
            }
        }
        RecipeAction::Show { id } => {
            common::print_json(&db.get_recipe(&id)?)?;
        }
        RecipeAction::Add { file } => {
            let content = std::fs::read_to_string(&file)?;
            let mut recipe: Recipe = serde_json::from_str(&content)?;
            recipe.ensure_id();
            db.save_recipe(&recipe)?;
            println!("Recipe added: {} ({})", recipe.title, recipe.id);
        }
        RecipeAction::Select { id } => {
            let recipe = db.get_recipe(&id)?;
            let (mut session, _) = common::load_session(&db);
            println!("Recipe selected: {}", recipe.title);
            session.select_recipe(recipe);
            common::save_session(&db, &session)?;
        }
    }
    Ok(())
}
