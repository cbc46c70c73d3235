//! Read-side filtering and pagination over the state snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AdjustmentStatus, AuditEntry, Customer, Product, StockAdjustment};
use crate::services::inventory::effective_location_ids;
use crate::state::AppState;

/// Pagination parameters with the dashboard defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// One page of results.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

fn paginate<T>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let limit = page.limit.max(1);
    let current = page.page.max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(limit);
    let items = items
        .into_iter()
        .skip(((current - 1) * limit) as usize)
        .take(limit as usize)
        .collect();
    Page {
        items,
        total,
        page: current,
        limit,
        total_pages,
    }
}

fn matches_search(haystacks: &[&str], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&needle))
}

fn in_range(
    at: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    from.map_or(true, |f| at >= f) && to.map_or(true, |t| at <= t)
}

/// Product list filters. `location_ids` follows the hierarchy rule:
/// selecting a main location includes its sub-locations.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location_ids: Option<Vec<Uuid>>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

pub fn list_products(
    state: &AppState,
    filters: &ProductFilters,
    page: &PageRequest,
) -> Page<Product> {
    let location_set = filters
        .location_ids
        .as_ref()
        .map(|ids| effective_location_ids(&state.locations, ids));
    let items: Vec<Product> = state
        .products
        .iter()
        .filter(|p| {
            filters
                .search
                .as_deref()
                .map_or(true, |s| matches_search(&[&p.name, &p.category], s))
        })
        .filter(|p| {
            filters
                .category
                .as_deref()
                .map_or(true, |c| p.category.eq_ignore_ascii_case(c))
        })
        .filter(|p| in_range(p.created_at, filters.created_from, filters.created_to))
        .filter(|p| {
            location_set.as_ref().map_or(true, |set| {
                p.locations.iter().any(|r| set.contains(&r.location_id))
            })
        })
        .cloned()
        .collect();
    paginate(items, page)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AdjustmentFilters {
    pub status: Option<AdjustmentStatus>,
    pub location_id: Option<Uuid>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

/// Adjustments, newest first.
pub fn list_adjustments(
    state: &AppState,
    filters: &AdjustmentFilters,
    page: &PageRequest,
) -> Page<StockAdjustment> {
    let mut items: Vec<StockAdjustment> = state
        .adjustments
        .iter()
        .filter(|a| filters.status.map_or(true, |s| a.status == s))
        .filter(|a| filters.location_id.map_or(true, |l| a.location_id == l))
        .filter(|a| in_range(a.created_at, filters.created_from, filters.created_to))
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    paginate(items, page)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerFilters {
    pub search: Option<String>,
}

pub fn list_customers(
    state: &AppState,
    filters: &CustomerFilters,
    page: &PageRequest,
) -> Page<Customer> {
    let items: Vec<Customer> = state
        .customers
        .iter()
        .filter(|c| {
            filters
                .search
                .as_deref()
                .map_or(true, |s| matches_search(&[&c.name, &c.email], s))
        })
        .cloned()
        .collect();
    paginate(items, page)
}

/// Audit trail for one entity, newest first.
pub fn audit_for_entity(state: &AppState, entity_id: Uuid, page: &PageRequest) -> Page<AuditEntry> {
    let mut items: Vec<AuditEntry> = state
        .audit_log
        .iter()
        .filter(|e| e.entity_id == entity_id)
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    paginate(items, page)
}
