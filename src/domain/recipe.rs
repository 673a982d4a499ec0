use serde::{Deserialize, Serialize};

/// A stored recipe row. Serializes with the wire names the frontend
/// submits and renders (`recipeName`, `preptime`, ...).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i32,
    #[serde(rename = "recipeName")]
    pub recipe_name: String,
    #[serde(rename = "recipeAuthor")]
    pub recipe_author: String,
    #[serde(rename = "preptime")]
    pub prep_time: String,
    #[serde(rename = "cooktime")]
    pub cook_time: String,
    #[serde(rename = "totaltime")]
    pub total_time: String,
    pub servings: String,
    pub description: String,
    pub category: String,
    pub ingredients: String,
    pub instructions: String,
    pub image: String,
}

/// Incoming recipe submission, from either a JSON body or a multipart
/// form. Absent fields default to empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeDraft {
    #[serde(rename = "recipeName")]
    pub recipe_name: String,
    #[serde(rename = "recipeAuthor")]
    pub recipe_author: String,
    #[serde(rename = "preptime")]
    pub prep_time: String,
    #[serde(rename = "cooktime")]
    pub cook_time: String,
    #[serde(rename = "totaltime")]
    pub total_time: String,
    pub servings: String,
    pub description: String,
    pub category: String,
    pub ingredients: String,
    pub instructions: String,
    pub image: String,
}

impl RecipeDraft {
    /// Assigns a form field by its wire name. Unknown names are ignored,
    /// matching how the original form handler picks known keys.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "recipeName" => self.recipe_name = value,
            "recipeAuthor" => self.recipe_author = value,
            "preptime" => self.prep_time = value,
            "cooktime" => self.cook_time = value,
            "totaltime" => self.total_time = value,
            "servings" => self.servings = value,
            "description" => self.description = value,
            "category" => self.category = value,
            "ingredients" => self.ingredients = value,
            "instructions" => self.instructions = value,
            "image" => self.image = value,
            _ => {}
        }
    }

    /// The submission endpoints require these five; author, times,
    /// servings, and image may be blank.
    pub fn has_required(&self) -> bool {
        !self.recipe_name.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.category.trim().is_empty()
            && !self.ingredients.trim().is_empty()
            && !self.instructions.trim().is_empty()
    }

    /// The strict create/replace endpoint requires every field.
    pub fn is_complete(&self) -> bool {
        self.has_required()
            && !self.recipe_author.trim().is_empty()
            && !self.prep_time.trim().is_empty()
            && !self.cook_time.trim().is_empty()
            && !self.total_time.trim().is_empty()
            && !self.servings.trim().is_empty()
            && !self.image.trim().is_empty()
    }
}

/// Partial update set for a recipe. Only non-empty submitted fields are
/// recorded; everything else stays untouched in the row.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub recipe_name: Option<String>,
    pub recipe_author: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub image: Option<String>,
}

impl RecipeChanges {
    /// Records a form field by its wire name, skipping blank values and
    /// unknown names.
    pub fn set_field(&mut self, name: &str, value: String) {
        if value.trim().is_empty() {
            return;
        }
        let slot = match name {
            "recipeName" => &mut self.recipe_name,
            "recipeAuthor" => &mut self.recipe_author,
            "preptime" => &mut self.prep_time,
            "cooktime" => &mut self.cook_time,
            "totaltime" => &mut self.total_time,
            "servings" => &mut self.servings,
            "description" => &mut self.description,
            "category" => &mut self.category,
            "ingredients" => &mut self.ingredients,
            "instructions" => &mut self.instructions,
            "image" => &mut self.image,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_name.is_none()
            && self.recipe_author.is_none()
            && self.prep_time.is_none()
            && self.cook_time.is_none()
            && self.total_time.is_none()
            && self.servings.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.image.is_none()
    }
}
