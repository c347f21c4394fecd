use recipe_import::extract_recipe;

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

#[test]
fn test_ingredients_and_steps_are_numbered_in_order() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Pancakes",
        "recipeIngredient": ["1 cup flour", "1 egg", "1 cup milk"],
        "recipeInstructions": [
            "Whisk the flour and milk.",
            {"@type": "HowToStep", "text": "  "},
            {"@type": "HowToStep", "text": "Beat in the egg."},
            "",
            {"@type": "HowToStep", "text": "Fry in a hot pan."}
        ]
    }
    "#;

    let draft = extract_recipe(&create_recipe_html(json_ld), "https://example.com/pancakes")
        .expect("recipe should be found");

    let indexes: Vec<usize> = draft.ingredients.iter().map(|i| i.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);

    let numbers: Vec<usize> = draft.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(draft.steps[1].instruction, "Beat in the egg.");
    assert_eq!(draft.source_url, "https://example.com/pancakes");
}

#[test]
fn test_unrelated_json_ld_returns_none() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": "Cooking Site",
        "url": "https://example.com"
    }
    "#;

    assert!(extract_recipe(&create_recipe_html(json_ld), "https://example.com").is_none());
}

#[test]
fn test_page_without_structured_data_returns_none() {
    let html = "<html><body><h1>Grandma's soup</h1><p>Boil water.</p></body></html>";
    assert!(extract_recipe(html, "https://example.com").is_none());
}

#[test]
fn test_malformed_block_does_not_abort_scan() {
    let html = r#"
        <html>
        <head>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Broken",</script>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Working Recipe", "recipeIngredient": ["2 eggs"]}
            </script>
        </head>
        </html>
    "#;

    let draft = extract_recipe(html, "https://example.com").expect("second block should parse");
    assert_eq!(draft.title, "Working Recipe");
    assert_eq!(draft.ingredients[0].name, "2 eggs");
}

#[test]
fn test_first_recipe_in_document_order_wins() {
    let html = r#"
        <html>
        <head>
            <script type="application/ld+json">{"@type": "WebSite", "name": "Site"}</script>
            <script type="application/ld+json">
                [
                    {"@type": "BreadcrumbList"},
                    {"@type": "Recipe", "name": "First"},
                    {"@type": "Recipe", "name": "Second"}
                ]
            </script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Third"}</script>
        </head>
        </html>
    "#;

    let draft = extract_recipe(html, "https://example.com").unwrap();
    assert_eq!(draft.title, "First");
}

#[test]
fn test_graph_with_full_metadata() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "@id": "https://example.com/#webpage"},
            {
                "@type": "Recipe",
                "name": "Easy Black Bean Soup",
                "description": "<p>This black bean soup is <em>easy</em> &amp; full of flavor.</p>",
                "image": [{"@type": "ImageObject", "url": "https://example.com/soup.jpg"}],
                "prepTime": "PT10M",
                "cookTime": "PT1H30M",
                "recipeYield": ["6", "6 bowls"],
                "recipeCategory": "Soup",
                "recipeCuisine": ["Mexican", "Vegetarian"],
                "recipeIngredient": [
                    "2 cans black beans",
                    "1 onion, diced",
                    "Salt and pepper to taste"
                ],
                "recipeInstructions": [
                    {
                        "@type": "HowToSection",
                        "name": "Prep",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Dice the onion."}
                        ]
                    },
                    {
                        "@type": "HowToSection",
                        "name": "Cook",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Sauté the onion."},
                            {"@type": "HowToStep", "name": "Simmer with the beans."}
                        ]
                    }
                ]
            }
        ]
    }
    "#;

    let draft = extract_recipe(&create_recipe_html(json_ld), "https://example.com/soup").unwrap();

    assert_eq!(draft.title, "Easy Black Bean Soup");
    assert_eq!(
        draft.description.as_deref(),
        Some("This black bean soup is easy & full of flavor.")
    );
    assert_eq!(draft.image_url.as_deref(), Some("https://example.com/soup.jpg"));
    assert_eq!(draft.prep_time_minutes, Some(10));
    assert_eq!(draft.cook_time_minutes, Some(90));
    assert_eq!(draft.servings, Some(6));
    assert_eq!(draft.tags, vec!["Soup", "Mexican", "Vegetarian"]);
    assert_eq!(draft.ingredients.len(), 3);

    let steps: Vec<(usize, &str)> = draft
        .steps
        .iter()
        .map(|s| (s.step_number, s.instruction.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![
            (1, "Dice the onion."),
            (2, "Sauté the onion."),
            (3, "Simmer with the beans.")
        ]
    );
}

#[test]
fn test_missing_fields_default() {
    let draft = extract_recipe(
        &create_recipe_html(r#"{"@type": "Recipe"}"#),
        "https://example.com/empty",
    )
    .unwrap();

    assert_eq!(draft.title, "");
    assert!(draft.description.is_none());
    assert!(draft.servings.is_none());
    assert!(draft.prep_time_minutes.is_none());
    assert!(draft.cook_time_minutes.is_none());
    assert!(draft.image_url.is_none());
    assert!(draft.tags.is_empty());
    assert!(draft.ingredients.is_empty());
    assert!(draft.steps.is_empty());
}

#[test]
fn test_draft_serializes_with_snake_case_fields() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Rice",
        "recipeYield": 2,
        "recipeIngredient": ["1 cup rice"],
        "recipeInstructions": ["Boil."]
    }
    "#;
    let draft = extract_recipe(&create_recipe_html(json_ld), "https://example.com/rice").unwrap();
    let json = serde_json::to_value(&draft).unwrap();

    assert_eq!(json["title"], "Rice");
    assert_eq!(json["servings"], 2);
    assert!(json["prep_time_minutes"].is_null());
    assert_eq!(json["source_url"], "https://example.com/rice");
    assert_eq!(json["ingredients"][0]["order_index"], 0);
    assert_eq!(json["steps"][0]["step_number"], 1);
    assert_eq!(json["steps"][0]["instruction"], "Boil.");
}
