//! Handlers for the owner-scoped inventory pages.
//!
//! Every handler takes [`AuthUser`] and passes its id to the repository, so
//! an item that belongs to someone else is indistinguishable from a missing
//! one (404).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{parse_item_fields, InventoryTotals, ItemFields};
use stockroom_core::types::DbId;
use stockroom_core::uploads::{image_extension, oversize_message};
use stockroom_db::models::inventory_item::{CreateInventoryItem, ImageChange, UpdateInventoryItem};
use stockroom_db::repositories::InventoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::views::inventory::{
    dashboard, item_detail, item_form, search_results, ItemFormMode, ItemFormValues,
};
use crate::views::Notice;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// An image part from the item form that passed the extension and size checks.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Everything submitted by the add/edit item form.
#[derive(Debug, Default)]
pub struct ItemSubmission {
    pub values: ItemFormValues,
    pub remove_image: bool,
    pub image: Option<ImageUpload>,
    /// Why the image part was dropped, if it was.
    pub image_error: Option<String>,
}

impl ItemSubmission {
    /// Validate the text fields, then surface any image problem.
    fn checked_fields(&self) -> Result<ItemFields, CoreError> {
        let fields = parse_item_fields(
            &self.values.name,
            &self.values.quantity,
            &self.values.price,
            &self.values.category,
        )?;
        if let Some(message) = &self.image_error {
            return Err(CoreError::InvalidFile(message.clone()));
        }
        Ok(fields)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Whether the request body ran past `DefaultBodyLimit`.
fn hit_body_limit(err: &axum::extract::multipart::MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Read the multipart item form.
///
/// The image is streamed chunk by chunk and dropped as soon as it passes
/// `max_bytes`, so oversized uploads are never held in memory whole. Once an
/// image has been dropped, running into the body limit ends the form with
/// whatever fields arrived before it.
async fn read_item_form(multipart: &mut Multipart, max_bytes: usize) -> AppResult<ItemSubmission> {
    let mut form = ItemSubmission::default();
    let mut dropped_image = false;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) if dropped_image && hit_body_limit(&err) => break,
            Err(err) => return Err(multipart_error(err)),
        };
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                // An empty file input still sends a nameless part.
                if file_name.is_empty() {
                    continue;
                }
                if let Err(err) = image_extension(&file_name) {
                    form.image_error = err.form_message().map(str::to_string);
                    continue;
                }

                let mut data = Vec::new();
                let mut too_large = false;
                loop {
                    match field.chunk().await {
                        Ok(Some(chunk)) if data.len() + chunk.len() > max_bytes => {
                            too_large = true;
                            break;
                        }
                        Ok(Some(chunk)) => data.extend_from_slice(&chunk),
                        Ok(None) => break,
                        Err(err) if hit_body_limit(&err) => {
                            too_large = true;
                            break;
                        }
                        Err(err) => return Err(multipart_error(err)),
                    }
                }

                if too_large {
                    tracing::debug!(file_name = %file_name, max_bytes, "Dropped oversized upload");
                    form.image_error = Some(oversize_message(max_bytes));
                    dropped_image = true;
                } else {
                    form.image = Some(ImageUpload { file_name, data });
                }
            }
            "remove_image" => form.remove_image = true,
            "name" | "quantity" | "price" | "category" => {
                let text = field.text().await.map_err(multipart_error)?;
                match name.as_str() {
                    "name" => form.values.name = text,
                    "quantity" => form.values.quantity = text,
                    "price" => form.values.price = text,
                    _ => form.values.category = text,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Turn a user-correctable error into a re-rendered form (422); pass any
/// other error through.
fn form_rejection(err: CoreError, render: impl FnOnce(&[String]) -> Html<String>) -> AppResult<Response> {
    if let Some(message) = err.form_message().map(str::to_string) {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&[message])).into_response());
    }
    Err(err.into())
}

/// Store the uploaded image, if there is one.
async fn store_upload(state: &AppState, image: Option<&ImageUpload>) -> Result<Option<String>, CoreError> {
    match image {
        Some(upload) => state
            .images
            .accept(&upload.file_name, &upload.data)
            .await
            .map(Some),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
///
/// The user's items, most recently updated first, with aggregate totals.
pub async fn index(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let items = InventoryRepo::list_for_user(&state.pool, user.user_id).await?;
    let totals = InventoryTotals::tally(items.iter().map(|item| (item.quantity, item.price)));
    let notice = query.notice.as_deref().and_then(Notice::from_code);
    Ok(dashboard(&user.username, &items, &totals, notice))
}

/// GET /add
pub async fn add_page(user: AuthUser) -> Html<String> {
    item_form(&user.username, ItemFormMode::Add, &ItemFormValues::default(), &[])
}

/// POST /add
///
/// The image file is written before the row. If the insert fails the file is
/// removed again.
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let form = read_item_form(&mut multipart, state.images.max_bytes()).await?;
    let render = |errors: &[String]| item_form(&user.username, ItemFormMode::Add, &form.values, errors);

    let fields = match form.checked_fields() {
        Ok(fields) => fields,
        Err(err) => return form_rejection(err, render),
    };
    let image_filename = match store_upload(&state, form.image.as_ref()).await {
        Ok(filename) => filename,
        Err(err) => return form_rejection(err, render),
    };

    let input = CreateInventoryItem::new(fields, image_filename.clone());
    let item = match InventoryRepo::create(&state.pool, user.user_id, &input).await {
        Ok(item) => item,
        Err(err) => {
            if let Some(filename) = &image_filename {
                state.images.remove(filename).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        user_id = user.user_id,
        item_id = item.id,
        image = item.image_filename.as_deref().unwrap_or(""),
        "Item created"
    );
    Ok(Redirect::to(&Notice::ItemAdded.redirect_to("/")).into_response())
}

/// GET /edit/{id}
pub async fn edit_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let item = InventoryRepo::find_for_user(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| AppError::item_not_found(id))?;
    let values = ItemFormValues::from_item(&item);
    Ok(item_form(&user.username, ItemFormMode::Edit(&item), &values, &[]))
}

/// POST /edit/{id}
///
/// Replaces every field. A new upload wins over `remove_image`. The previous
/// image file is removed only after the row no longer points at it.
/// Without either, the row keeps whatever image it holds at update time.
pub async fn edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let existing = InventoryRepo::find_for_user(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| AppError::item_not_found(id))?;

    let form = read_item_form(&mut multipart, state.images.max_bytes()).await?;
    let render = |errors: &[String]| {
        item_form(&user.username, ItemFormMode::Edit(&existing), &form.values, errors)
    };

    let fields = match form.checked_fields() {
        Ok(fields) => fields,
        Err(err) => return form_rejection(err, render),
    };
    let uploaded = match store_upload(&state, form.image.as_ref()).await {
        Ok(filename) => filename,
        Err(err) => return form_rejection(err, render),
    };

    let image = match (&uploaded, form.remove_image) {
        (Some(new), _) => ImageChange::Replace(new.clone()),
        (None, true) => ImageChange::Clear,
        (None, false) => ImageChange::Keep,
    };

    let input = UpdateInventoryItem::new(fields, image);
    let updated = match InventoryRepo::update(&state.pool, user.user_id, id, &input).await {
        Ok(Some(updated)) => updated,
        result => {
            if let Some(filename) = &uploaded {
                state.images.remove(filename).await;
            }
            return match result {
                Err(err) => Err(err.into()),
                // Deleted between the lookup and the update.
                _ => Err(AppError::item_not_found(id)),
            };
        }
    };

    // The row's image as it was just before this update, not as first read:
    // another edit may have replaced it in between.
    if let Some(old) = &updated.previous_image_filename {
        if updated.item.image_filename.as_ref() != Some(old) {
            state.images.remove(old).await;
        }
    }

    tracing::info!(user_id = user.user_id, item_id = id, "Item updated");
    Ok(Redirect::to(&Notice::ItemUpdated.redirect_to("/")).into_response())
}

/// POST /delete/{id}
///
/// Deletes the row, then its image file.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Redirect> {
    let item = InventoryRepo::delete(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| AppError::item_not_found(id))?;

    if let Some(filename) = &item.image_filename {
        state.images.remove(filename).await;
    }

    tracing::info!(user_id = user.user_id, item_id = id, "Item deleted");
    Ok(Redirect::to(&Notice::ItemDeleted.redirect_to("/")))
}

/// GET /view/{id}
pub async fn view(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let item = InventoryRepo::find_for_user(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| AppError::item_not_found(id))?;
    Ok(item_detail(&user.username, &item))
}

/// GET /search?q=
///
/// Case-insensitive substring match on name or category. A blank query lists
/// everything.
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    let items = InventoryRepo::search(&state.pool, user.user_id, &query.q).await?;
    tracing::debug!(user_id = user.user_id, hits = items.len(), "Search");
    Ok(search_results(&user.username, &query.q, &items))
}
