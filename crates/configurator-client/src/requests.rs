//! Request bodies sent to the configurator API.
//!
//! The API takes the edit token in the body rather than a header, and
//! deletes are soft: they flag the record with `isActive: false`.

use configurator_catalog::{Category, ConfigOption};
use configurator_core::{CategoryId, CategoryType, ConfiguratorId, EditToken, OptionId, Price};
use configurator_engine::QuoteRequest;
use serde::Serialize;

/// Body of `/api/category/create` and `/api/category/update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryBody<'a> {
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    configurator_id: Option<&'a ConfiguratorId>,
    name: &'a str,
    category_type: CategoryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    is_primary: bool,
    is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_index: Option<i32>,
}

impl<'a> CategoryBody<'a> {
    pub(crate) fn create(
        token: &'a EditToken,
        configurator_id: &'a ConfiguratorId,
        category: &'a Category,
    ) -> Self {
        // The store assigns the ID
        Self {
            id: None,
            configurator_id: Some(configurator_id),
            ..Self::update(token, category)
        }
    }

    pub(crate) fn update(token: &'a EditToken, category: &'a Category) -> Self {
        Self {
            token: token.expose(),
            id: Some(&category.id),
            configurator_id: None,
            name: &category.name,
            category_type: category.category_type,
            description: category.description.as_deref(),
            is_primary: category.is_primary,
            is_required: category.is_required,
            order_index: category.order_index,
        }
    }
}

/// Body of `/api/option/create` and `/api/option/update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OptionBody<'a> {
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a OptionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a CategoryId>,
    label: &'a str,
    price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    is_default: bool,
    is_active: bool,
    in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_index: Option<i32>,
}

impl<'a> OptionBody<'a> {
    pub(crate) fn create(
        token: &'a EditToken,
        category_id: &'a CategoryId,
        option: &'a ConfigOption,
    ) -> Self {
        Self {
            id: None,
            category_id: Some(category_id),
            ..Self::update(token, option)
        }
    }

    pub(crate) fn update(token: &'a EditToken, option: &'a ConfigOption) -> Self {
        Self {
            token: token.expose(),
            id: Some(&option.id),
            category_id: None,
            label: &option.label,
            price: option.price,
            description: option.description.as_deref(),
            sku: option.sku.as_ref().map(|sku| sku.as_str()),
            image_url: option.image_url.as_deref(),
            is_default: option.is_default,
            is_active: option.is_active,
            in_stock: option.in_stock,
            order_index: option.order_index,
        }
    }
}

/// Soft delete: `{ id, token, isActive: false }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeactivateBody<'a> {
    id: &'a str,
    token: &'a str,
    is_active: bool,
}

impl<'a> DeactivateBody<'a> {
    pub(crate) fn new(id: &'a str, token: &'a EditToken) -> Self {
        Self {
            id,
            token: token.expose(),
            is_active: false,
        }
    }
}

/// Body of `/api/quote/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteBody<'a> {
    configurator_id: &'a ConfiguratorId,
    selections: Vec<SelectionEntry<'a>>,
    client_info: ClientInfo<'a>,
    total: Price,
    meta: configurator_engine::QuotePayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionEntry<'a> {
    category_id: &'a CategoryId,
    option_id: &'a OptionId,
}

#[derive(Debug, Serialize)]
struct ClientInfo<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

impl<'a> QuoteBody<'a> {
    pub(crate) fn new(request: &'a QuoteRequest) -> Self {
        Self {
            configurator_id: &request.snapshot.configurator_id,
            selections: request
                .snapshot
                .items
                .iter()
                .map(|item| SelectionEntry {
                    category_id: &item.category_id,
                    option_id: &item.option_id,
                })
                .collect(),
            client_info: ClientInfo {
                name: request.contact.name.trim(),
                email: request.contact.email.trim(),
                phone: request.contact.phone.as_deref(),
            },
            total: request.snapshot.total_price,
            meta: request.payload(),
        }
    }
}
