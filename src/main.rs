use log::error;
use recipe_import::{fetch_recipe, fuzzy_match, scale_ingredient_line};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage:
  recipe-import <url>                     print the recipe found at <url> as JSON
  recipe-import scale <factor> <line...>  rescale an ingredient line
  recipe-import match <ingredient> <item> check whether two names match";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<String, String> {
    match args {
        [command, factor, line @ ..] if command == "scale" && !line.is_empty() => {
            let factor: f64 = factor
                .parse()
                .map_err(|e| format!("Invalid factor '{factor}': {e}"))?;
            Ok(scale_ingredient_line(&line.join(" "), factor))
        }
        [command, ingredient, item] if command == "match" => {
            Ok(fuzzy_match(ingredient, item).to_string())
        }
        [url] if url != "scale" && url != "match" => {
            let draft = fetch_recipe(url).await.map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&draft).map_err(|e| e.to_string())
        }
        _ => Err(USAGE.to_string()),
    }
}
