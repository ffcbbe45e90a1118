use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers::{inventory, search};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(inventory::list_items, inventory::register_item))
        .routes(routes!(
            inventory::get_item,
            inventory::update_item,
            inventory::delete_item
        ))
        .routes(routes!(
            inventory::get_item_photo,
            inventory::replace_item_photo
        ))
        .routes(routes!(search::search_item))
}
