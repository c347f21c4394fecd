use super::{Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::{DraftIngredient, DraftStep, RecipeDraft};
use crate::quantity::parse_duration_minutes;
use html_escape::decode_html_entities;
use log::debug;
use regex::Regex;
use scraper::Selector;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Number, Value};
use std::sync::LazyLock;

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type]").expect("SCRIPT_SELECTOR should parse")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG_RE should compile"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("DIGITS_RE should compile"));

const LD_JSON_TYPE: &str = "application/ld+json";

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_draft(&self, recipe: JsonLdRecipe, url: &str) -> RecipeDraft {
        let title = recipe
            .name
            .as_ref()
            .and_then(TextValue::to_single_string)
            .map(|name| decode_html_symbols(name.trim()))
            .unwrap_or_default();

        let description = recipe
            .description
            .as_ref()
            .and_then(DescriptionType::text)
            .map(|desc| clean_markup(&desc))
            .filter(|desc| !desc.is_empty());

        let servings = recipe
            .recipe_yield
            .as_ref()
            .and_then(|yield_val| yield_val.as_slice().first())
            .and_then(TextValue::to_single_string)
            .and_then(|yield_str| parse_servings(&yield_str));

        let mut tags = to_string_list(recipe.recipe_category.as_ref());
        tags.extend(to_string_list(recipe.recipe_cuisine.as_ref()));

        let ingredients = recipe
            .recipe_ingredient
            .as_ref()
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(IngredientEntry::text)
            .map(|ing| decode_html_symbols(ing.trim()))
            .filter(|ing| !ing.is_empty())
            .enumerate()
            .map(|(order_index, name)| DraftIngredient { name, order_index })
            .collect();

        let steps = collect_steps(
            recipe
                .recipe_instructions
                .as_ref()
                .map(OneOrMany::as_slice)
                .unwrap_or_default(),
        );

        RecipeDraft {
            title,
            description,
            servings,
            prep_time_minutes: recipe
                .prep_time
                .as_ref()
                .and_then(TextValue::to_single_string)
                .and_then(|time| parse_duration_minutes(&time)),
            cook_time_minutes: recipe
                .cook_time
                .as_ref()
                .and_then(TextValue::to_single_string)
                .and_then(|time| parse_duration_minutes(&time)),
            image_url: recipe.image.as_ref().and_then(ImageType::to_first_url),
            source_url: url.to_string(),
            tags,
            ingredients,
            steps,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<TextValue>,
    description: Option<DescriptionType>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<OneOrMany<IngredientEntry>>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<OneOrMany<InstructionEntry>>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<OneOrMany<TextValue>>,
    #[serde(rename = "prepTime")]
    prep_time: Option<TextValue>,
    #[serde(rename = "cookTime")]
    cook_time: Option<TextValue>,
    #[serde(rename = "recipeCategory")]
    recipe_category: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeCuisine")]
    recipe_cuisine: Option<OneOrMany<TextValue>>,
}

/// A field that is either a single value or a list of them.
///
/// `Many` is tried first: the element types all have a catch-all variant
/// that would otherwise swallow arrays.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Number(Number),
    Other(Value),
}

impl TextValue {
    fn to_single_string(&self) -> Option<String> {
        match self {
            TextValue::Text(s) => Some(s.clone()),
            TextValue::Number(n) => Some(n.to_string()),
            TextValue::Other(Value::Bool(b)) => Some(b.to_string()),
            TextValue::Other(_) => None,
        }
    }
}

fn to_string_list(value: Option<&OneOrMany<TextValue>>) -> Vec<String> {
    value
        .map(OneOrMany::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(TextValue::to_single_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
    Other(IgnoredAny),
}

impl DescriptionType {
    fn text(&self) -> Option<String> {
        match self {
            DescriptionType::String(d) => Some(d.clone()),
            DescriptionType::Object(d) => d.text.clone(),
            DescriptionType::Other(IgnoredAny) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageType>),
    Object(ImageObject),
    Other(IgnoredAny),
}

impl ImageType {
    fn to_first_url(&self) -> Option<String> {
        let url = match self {
            ImageType::String(url) => Some(url.clone()),
            ImageType::Multiple(images) => images.first().and_then(ImageType::to_first_url),
            ImageType::Object(image) => image.url.clone(),
            ImageType::Other(IgnoredAny) => None,
        }?;
        let url = decode_html_symbols(url.trim());
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: Option<String>,
    amount: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    String(String),
    Object(IngredientObject),
    Other(IgnoredAny),
}

impl IngredientEntry {
    fn text(&self) -> Option<String> {
        match self {
            IngredientEntry::String(s) => Some(s.clone()),
            IngredientEntry::Object(ing) => {
                let name = ing.name.as_deref()?.trim();
                let amount = ing
                    .amount
                    .as_ref()
                    .and_then(TextValue::to_single_string)
                    .unwrap_or_default();
                let amount = amount.trim();
                if amount.is_empty() {
                    Some(name.to_string())
                } else {
                    Some(format!("{amount} {name}"))
                }
            }
            IngredientEntry::Other(IgnoredAny) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    String(String),
    Node(InstructionNode),
    Other(IgnoredAny),
}

/// A `HowToStep` or `HowToSection` object.
#[derive(Debug, Deserialize)]
struct InstructionNode {
    #[serde(rename = "@type")]
    kind: Option<Value>,
    text: Option<TextValue>,
    name: Option<TextValue>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<Vec<InstructionEntry>>,
}

impl InstructionNode {
    fn is_step(&self) -> bool {
        type_matches(self.kind.as_ref(), "HowToStep")
    }

    fn is_section(&self) -> bool {
        type_matches(self.kind.as_ref(), "HowToSection")
    }

    /// `text`, or `name` when there is no `text`, with markup removed.
    fn step_text(&self) -> String {
        self.text
            .as_ref()
            .or(self.name.as_ref())
            .and_then(TextValue::to_single_string)
            .map(|text| clean_markup(&text))
            .unwrap_or_default()
    }
}

fn collect_steps(instructions: &[InstructionEntry]) -> Vec<DraftStep> {
    let mut steps = Vec::new();

    for entry in instructions {
        match entry {
            InstructionEntry::String(text) => {
                push_step(&mut steps, decode_html_symbols(text.trim()));
            }
            InstructionEntry::Node(node) if node.is_step() => {
                push_step(&mut steps, node.step_text());
            }
            InstructionEntry::Node(node) if node.is_section() => {
                for nested in node.item_list_element.iter().flatten() {
                    if let InstructionEntry::Node(nested) = nested {
                        push_step(&mut steps, nested.step_text());
                    }
                }
            }
            InstructionEntry::Other(IgnoredAny) => {
                debug!("JsonLdExtractor: Skipping non-text instruction entry");
            }
            InstructionEntry::Node(node) => {
                debug!("JsonLdExtractor: Skipping instruction node {:?}", node.kind);
            }
        }
    }

    steps
}

/// Numbers follow the emitted steps, so blank entries leave no gaps.
fn push_step(steps: &mut Vec<DraftStep>, instruction: String) {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return;
    }
    steps.push(DraftStep {
        step_number: steps.len() + 1,
        instruction: instruction.to_string(),
    });
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn decode_html_symbols(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// Removes `<...>` tags, decodes entities and trims.
fn clean_markup(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, "");
    decode_html_symbols(stripped.trim()).trim().to_string()
}

fn parse_servings(yield_str: &str) -> Option<u32> {
    DIGITS_RE
        .find(yield_str)
        .and_then(|digits| digits.as_str().parse().ok())
        .filter(|servings| *servings > 0)
}

fn type_name_matches(name: &str, expected: &str) -> bool {
    let name = name.trim();
    let name = name
        .strip_prefix("https://schema.org/")
        .or_else(|| name.strip_prefix("http://schema.org/"))
        .unwrap_or(name);
    name.eq_ignore_ascii_case(expected)
}

/// Checks an `@type` value, which may be a single name or a list of names.
fn type_matches(type_value: Option<&Value>, expected: &str) -> bool {
    match type_value {
        Some(Value::String(name)) => type_name_matches(name, expected),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| type_name_matches(name, expected)),
        _ => false,
    }
}

fn is_recipe_type(value: &Value) -> bool {
    type_matches(value.get("@type"), "Recipe")
}

fn is_ld_json_script(type_attr: &str) -> bool {
    type_attr
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(LD_JSON_TYPE))
}

/// Items a JSON-LD block describes: array elements, `@graph` members, or the
/// block itself.
fn candidate_items(json_ld: &Value) -> Vec<&Value> {
    if let Value::Array(items) = json_ld {
        debug!("JsonLdExtractor: JSON-LD is an array");
        return items.iter().collect();
    }
    match json_ld.get("@graph") {
        Some(Value::Array(graph)) => {
            debug!("JsonLdExtractor: Found @graph");
            graph.iter().collect()
        }
        Some(graph @ Value::Object(_)) => vec![graph],
        _ => vec![json_ld],
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);

        let scripts: Vec<_> = context
            .document
            .select(&SCRIPT_SELECTOR)
            .filter(|script| {
                script
                    .value()
                    .attr("type")
                    .is_some_and(is_ld_json_script)
            })
            .collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json: String = script.text().collect();

            let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            for item in candidate_items(&json_ld) {
                if !is_recipe_type(item) {
                    continue;
                }
                debug!("JsonLdExtractor: Found Recipe type in script {}", index);
                match JsonLdRecipe::try_from(item) {
                    Ok(recipe) => return Ok(self.convert_to_draft(recipe, &context.url)),
                    Err(e) => {
                        debug!("JsonLdExtractor: Failed to convert to JsonLdRecipe: {}", e);
                    }
                }
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        Err(ImportError::NoRecipeFound)
    }
}
