//! Dashboard, item form, detail and search pages.

use axum::response::Html;
use stockroom_core::inventory::InventoryTotals;
use stockroom_db::models::inventory_item::InventoryItem;

use super::{error_list, escape, layout, money, timestamp, Notice};

/// Raw text of the item form, echoed back when a submit fails.
#[derive(Debug, Clone, Default)]
pub struct ItemFormValues {
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub category: String,
}

impl ItemFormValues {
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            price: money(item.price),
            category: item.category.clone(),
        }
    }
}

/// Which item form to render.
#[derive(Debug, Clone, Copy)]
pub enum ItemFormMode<'a> {
    Add,
    Edit(&'a InventoryItem),
}

fn image_url(filename: &str) -> String {
    format!("/uploads/{}", escape(filename))
}

fn item_rows(items: &[InventoryItem]) -> String {
    items
        .iter()
        .map(|item| {
            let thumb = item
                .image_filename
                .as_deref()
                .map(|f| format!(r#"<img class="thumb" src="{}" alt="">"#, image_url(f)))
                .unwrap_or_default();
            format!(
                r#"<tr>
<td>{thumb}</td>
<td><a href="/view/{id}">{name}</a></td>
<td>{category}</td>
<td>{quantity}</td>
<td>{price}</td>
<td>{value}</td>
<td>{updated}</td>
<td><a href="/edit/{id}">Edit</a>
<form action="/delete/{id}" method="post" style="display:inline"><button type="submit">Delete</button></form></td>
</tr>"#,
                id = item.id,
                name = escape(&item.name),
                category = escape(&item.category),
                quantity = item.quantity,
                price = money(item.price),
                value = money(item.line_value()),
                updated = timestamp(&item.updated_at),
            )
        })
        .collect()
}

fn item_table(items: &[InventoryItem], empty_message: &str) -> String {
    if items.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, escape(empty_message));
    }
    format!(
        r#"<table>
<thead><tr><th></th><th>Name</th><th>Category</th><th>Quantity</th><th>Price</th><th>Value</th><th>Updated</th><th></th></tr></thead>
<tbody>
{}
</tbody>
</table>"#,
        item_rows(items)
    )
}

pub fn dashboard(
    username: &str,
    items: &[InventoryItem],
    totals: &InventoryTotals,
    notice: Option<Notice>,
) -> Html<String> {
    let body = format!(
        r#"<h1>Inventory</h1>
<section class="totals">
<div>Items: <strong id="total-items">{count}</strong></div>
<div>Total quantity: <strong id="total-quantity">{quantity}</strong></div>
<div>Total value: <strong id="total-value">{value}</strong></div>
</section>
{table}"#,
        count = totals.item_count,
        quantity = totals.total_quantity,
        value = money(totals.total_value),
        table = item_table(items, "No items yet. Add your first item."),
    );
    layout("Dashboard", Some(username), notice, &body)
}

pub fn item_form(
    username: &str,
    mode: ItemFormMode<'_>,
    values: &ItemFormValues,
    errors: &[String],
) -> Html<String> {
    let (title, action, extra) = match mode {
        ItemFormMode::Add => ("Add item", "/add".to_string(), String::new()),
        ItemFormMode::Edit(item) => {
            let current = item
                .image_filename
                .as_deref()
                .map(|f| {
                    format!(
                        r#"<p><img class="thumb" src="{}" alt="Current image"><br>
<label><input type="checkbox" name="remove_image" value="on"> Remove current image</label></p>"#,
                        image_url(f)
                    )
                })
                .unwrap_or_default();
            ("Edit item", format!("/edit/{}", item.id), current)
        }
    };

    let body = format!(
        r#"<h1>{title}</h1>
{errors}
<form action="{action}" method="post" enctype="multipart/form-data">
<p><label>Name<br><input type="text" name="name" value="{name}" required></label></p>
<p><label>Quantity<br><input type="number" name="quantity" min="0" step="1" value="{quantity}" required></label></p>
<p><label>Price<br><input type="number" name="price" min="0" step="0.01" value="{price}" required></label></p>
<p><label>Category<br><input type="text" name="category" value="{category}" required></label></p>
{extra}
<p><label>Image (PNG, JPG, JPEG, GIF, WEBP)<br><input type="file" name="image" accept=".png,.jpg,.jpeg,.gif,.webp"></label></p>
<p><button type="submit">Save</button> <a href="/">Cancel</a></p>
</form>"#,
        errors = error_list(errors),
        name = escape(&values.name),
        quantity = escape(&values.quantity),
        price = escape(&values.price),
        category = escape(&values.category),
    );
    layout(title, Some(username), None, &body)
}

pub fn item_detail(username: &str, item: &InventoryItem) -> Html<String> {
    let image = item
        .image_filename
        .as_deref()
        .map(|f| format!(r#"<p><img src="{}" alt="{}" style="max-width:100%"></p>"#, image_url(f), escape(&item.name)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>{name}</h1>
{image}
<dl>
<dt>Category</dt><dd>{category}</dd>
<dt>Quantity</dt><dd>{quantity}</dd>
<dt>Unit price</dt><dd>{price}</dd>
<dt>Total value</dt><dd>{value}</dd>
<dt>Created</dt><dd>{created}</dd>
<dt>Last updated</dt><dd>{updated}</dd>
</dl>
<p><a href="/edit/{id}">Edit</a>
<form action="/delete/{id}" method="post" style="display:inline"><button type="submit">Delete</button></form>
<a href="/">Back</a></p>"#,
        id = item.id,
        name = escape(&item.name),
        category = escape(&item.category),
        quantity = item.quantity,
        price = money(item.price),
        value = money(item.line_value()),
        created = timestamp(&item.created_at),
        updated = timestamp(&item.updated_at),
    );
    layout(&item.name, Some(username), None, &body)
}

pub fn search_results(username: &str, query: &str, items: &[InventoryItem]) -> Html<String> {
    let heading = if query.trim().is_empty() {
        "All items".to_string()
    } else {
        format!("Results for \u{201c}{}\u{201d}", escape(query.trim()))
    };
    let body = format!(
        r#"<h1>{heading}</h1>
<form action="/search" method="get"><input type="search" name="q" value="{query}"> <button type="submit">Search</button></form>
<p>{count} item(s) found.</p>
{table}"#,
        query = escape(query),
        count = items.len(),
        table = item_table(items, "No items match your search."),
    );
    layout("Search", Some(username), None, &body)
}

