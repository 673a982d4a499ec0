use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder, Row};

use crate::{
    domain::recipe::{Recipe, RecipeChanges, RecipeDraft},
    error::ApiError,
    infra::db::Db,
    state::AppState,
};

const SUBMIT_REQUIRED_MSG: &str =
    "Recipe name, description, category, ingredients, and instructions are required";
const SUBMIT_JSON_REQUIRED_MSG: &str =
    "All fields are required: recipeName, description, category, ingredients, and instructions";
const ALL_FIELDS_REQUIRED_MSG: &str = "All fields are required: recipeName, recipeAuthor, \
     preptime, cooktime, totaltime, servings, description, category, ingredients, \
     instructions, and image";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recipe", get(list).post(create_strict).put(replace))
        .route("/api/recipe/create", post(create))
        .route("/api/recipe/update", put(update))
        .route("/api/recipe/delete", delete(destroy))
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// Submission endpoint: a JSON body or a multipart form with an
/// optional image file, switched on the request Content-Type.
async fn create(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let (mut draft, upload) = read_submission(multipart).await?;
        if !draft.has_required() {
            return Err(ApiError::BadRequest(SUBMIT_REQUIRED_MSG.into()));
        }
        if let Some((file_name, bytes)) = upload {
            draft.image = state.images.store(&file_name, &bytes).await?;
        }
        insert_recipe(&state.db, &draft).await?;
    } else {
        let Json(draft) = Json::<RecipeDraft>::from_request(req, &())
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if !draft.has_required() {
            return Err(ApiError::BadRequest(SUBMIT_JSON_REQUIRED_MSG.into()));
        }
        insert_recipe(&state.db, &draft).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe created successfully!" })),
    ))
}

/// JSON-only create on the collection path; every field is required.
async fn create_strict(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<RecipeDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !draft.is_complete() {
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED_MSG.into()));
    }
    insert_recipe(&state.db, &draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe created successfully!" })),
    ))
}

async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let category = query
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Category is required".into()))?;

    let recipes: Vec<Recipe> = sqlx::query_as(
        "SELECT id, recipe_name, recipe_author, prep_time, cook_time, total_time,
                servings, description, category, ingredients, instructions, image
         FROM recipes WHERE category = $1 ORDER BY id",
    )
    .bind(&category)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::internal)?;

    if recipes.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No recipes found for category: {category}"
        )));
    }
    Ok(Json(recipes))
}

/// Full-record replace; every field is required, like the strict create.
async fn replace(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
    Json(draft): Json<RecipeDraft>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(query.id, "Recipe ID is required for update")?;
    if !draft.is_complete() {
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED_MSG.into()));
    }

    let res = sqlx::query(
        "UPDATE recipes SET recipe_name = $1, recipe_author = $2, prep_time = $3,
                cook_time = $4, total_time = $5, servings = $6, description = $7,
                category = $8, ingredients = $9, instructions = $10, image = $11
         WHERE id = $12",
    )
    .bind(&draft.recipe_name)
    .bind(&draft.recipe_author)
    .bind(&draft.prep_time)
    .bind(&draft.cook_time)
    .bind(&draft.total_time)
    .bind(&draft.servings)
    .bind(&draft.description)
    .bind(&draft.category)
    .bind(&draft.ingredients)
    .bind(&draft.instructions)
    .bind(&draft.image)
    .bind(id)
    .execute(&state.db)
    .await
    .map_err(ApiError::internal)?;

    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Recipe not found or no updates applied".into(),
        ));
    }
    Ok(Json(json!({ "message": "Recipe updated successfully!" })))
}

/// Partial update from a multipart form: whatever text fields arrive
/// non-empty are applied; an image file replaces the stored one.
async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(query.id, "Recipe ID is required for update")?;
    let (mut changes, upload) = read_changes(multipart).await?;

    if let Some((file_name, bytes)) = upload {
        let row = sqlx::query("SELECT image FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::internal)?;
        let Some(row) = row else {
            return Err(ApiError::NotFound("Recipe not found".into()));
        };
        let old_image: String = row.get("image");
        state.images.remove(&old_image).await?;
        changes.image = Some(state.images.store(&file_name, &bytes).await?);
    }

    if changes.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be provided for update".into(),
        ));
    }

    let mut statement = update_statement(&changes, id);
    let res = statement
        .build()
        .execute(&state.db)
        .await
        .map_err(ApiError::internal)?;

    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }
    Ok(Json(json!({ "message": "Recipe updated successfully!" })))
}

async fn destroy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(query.id, "Invalid ID parameter")?;

    let row = sqlx::query("SELECT image FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::internal)?;
    let Some(row) = row else {
        return Err(ApiError::NotFound("Recipe not found".into()));
    };

    let image: String = row.get("image");
    state.images.remove(&image).await?;

    let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(ApiError::internal)?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Recipe not found in the database".into()));
    }
    Ok(Json(json!({ "message": "Recipe deleted successfully!" })))
}

fn parse_id(raw: Option<String>, missing_msg: &str) -> Result<i32, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest(missing_msg.into()))?;
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID parameter".into()))
}

async fn insert_recipe(db: &Db, draft: &RecipeDraft) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO recipes (recipe_name, recipe_author, prep_time, cook_time, total_time,
                servings, description, category, ingredients, instructions, image)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(&draft.recipe_name)
    .bind(&draft.recipe_author)
    .bind(&draft.prep_time)
    .bind(&draft.cook_time)
    .bind(&draft.total_time)
    .bind(&draft.servings)
    .bind(&draft.description)
    .bind(&draft.category)
    .bind(&draft.ingredients)
    .bind(&draft.instructions)
    .bind(&draft.image)
    .execute(db)
    .await
    .map_err(ApiError::internal)?;
    Ok(())
}

type Upload = (String, Vec<u8>);

async fn read_submission(mut multipart: Multipart) -> Result<(RecipeDraft, Option<Upload>), ApiError> {
    let mut draft = RecipeDraft::default();
    let mut upload = None;
    while let Some(field) = next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) if name == "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                // A file input left empty still submits a nameless,
                // zero-byte part.
                if !file_name.is_empty() || !bytes.is_empty() {
                    upload = Some((file_name, bytes.to_vec()));
                }
            }
            Some(_) => {} // file parts under any other name are ignored
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                draft.set_field(&name, value);
            }
        }
    }
    Ok((draft, upload))
}

async fn read_changes(mut multipart: Multipart) -> Result<(RecipeChanges, Option<Upload>), ApiError> {
    let mut changes = RecipeChanges::default();
    let mut upload = None;
    while let Some(field) = next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) if name == "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                if !file_name.is_empty() || !bytes.is_empty() {
                    upload = Some((file_name, bytes.to_vec()));
                }
            }
            Some(_) => {}
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                changes.set_field(&name, value);
            }
        }
    }
    Ok((changes, upload))
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>, ApiError> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn update_statement<'a>(changes: &'a RecipeChanges, id: i32) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE recipes SET ");
    {
        let mut cols = qb.separated(", ");
        let pairs: [(&str, &Option<String>); 11] = [
            ("recipe_name = ", &changes.recipe_name),
            ("recipe_author = ", &changes.recipe_author),
            ("prep_time = ", &changes.prep_time),
            ("cook_time = ", &changes.cook_time),
            ("total_time = ", &changes.total_time),
            ("servings = ", &changes.servings),
            ("description = ", &changes.description),
            ("category = ", &changes.category),
            ("ingredients = ", &changes.ingredients),
            ("instructions = ", &changes.instructions),
            ("image = ", &changes.image),
        ];
        for (column, value) in pairs {
            if let Some(value) = value {
                cols.push(column);
                cols.push_bind_unseparated(value.as_str());
            }
        }
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_numeric_strings_only() {
        assert_eq!(parse_id(Some("42".into()), "missing").expect("valid id"), 42);
        assert_eq!(parse_id(Some(" 7 ".into()), "missing").expect("valid id"), 7);
        assert!(matches!(
            parse_id(Some("abc".into()), "missing"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_id(None, "missing"),
            Err(ApiError::BadRequest(msg)) if msg == "missing"
        ));
    }

    #[test]
    fn update_statement_only_touches_changed_columns() {
        let mut changes = RecipeChanges::default();
        changes.set_field("recipeName", "Tarte".into());
        changes.set_field("category", "Dessert".into());
        changes.set_field("image", "images/recipes/tarte.jpg".into());

        let qb = update_statement(&changes, 7);
        assert_eq!(
            qb.sql(),
            "UPDATE recipes SET recipe_name = $1, category = $2, image = $3 WHERE id = $4"
        );
    }

    #[test]
    fn update_statement_covers_a_single_field() {
        let mut changes = RecipeChanges::default();
        changes.set_field("servings", "8".into());

        let qb = update_statement(&changes, 3);
        assert_eq!(qb.sql(), "UPDATE recipes SET servings = $1 WHERE id = $2");
    }
}
