//! Pure record-to-card formatting. Nothing here performs I/O or touches a
//! session; controls are attached by the views in [`crate::views`].

use shared::{
    domain::{Devlog, Project, StoreItem, TicketCost, User},
    protocol::{DevlogList, ProjectList, UserList},
};

use crate::{
    card::{Accent, CardField, DisplayCard},
    navigation::{CategoryCursor, StoreCatalog},
};

pub const PROJECT_SUMMARY_CAP: usize = 100;
pub const DEVLOG_BODY_CAP: usize = 300;
pub const DEVLOG_SUMMARY_CAP: usize = 80;
pub const LIST_PREVIEW_LIMIT: usize = 5;
const ELLIPSIS: &str = "...";
const NOT_AVAILABLE: &str = "N/A";

/// Cuts `text` to `cap` characters and appends an ellipsis; text that already
/// fits is returned unchanged.
pub fn truncate(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_index, _)) => format!("{}{ELLIPSIS}", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// `"{biscuits} biscuits ({hours}h)"`, where ten biscuits buy one hour.
pub fn format_price(biscuits: Option<i64>) -> String {
    let Some(biscuits) = biscuits else {
        return NOT_AVAILABLE.to_string();
    };
    if biscuits % 10 == 0 {
        format!("{biscuits} biscuits ({}h)", biscuits / 10)
    } else {
        format!("{biscuits} biscuits ({:.1}h)", biscuits as f64 / 10.0)
    }
}

/// One combined `Price` field when every listed regional price matches the
/// base cost, otherwise the base cost and each region separately.
pub fn price_fields(cost: &TicketCost) -> Vec<CardField> {
    let uniform = cost.base_cost.is_some()
        && cost
            .regional()
            .iter()
            .flatten()
            .all(|price| Some(*price) == cost.base_cost);

    if uniform {
        return vec![CardField {
            name: "Price".into(),
            value: format_price(cost.base_cost),
            inline: false,
        }];
    }

    [
        ("Base Cost", cost.base_cost),
        ("US Price", cost.us),
        ("EU Price", cost.eu),
        ("UK Price", cost.uk),
        ("CA Price", cost.ca),
    ]
    .into_iter()
    .map(|(name, price)| CardField {
        name: name.into(),
        value: format_price(price),
        inline: true,
    })
    .collect()
}

/// [`truncate`] for field values, which the platform refuses when empty.
fn summary(text: &str, cap: usize) -> String {
    match text.trim() {
        "" => NOT_AVAILABLE.to_string(),
        text => truncate(text, cap),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn page_footer(current: u32, total: u32) -> String {
    format!("Page {current} of {total}")
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn project_card(project: &Project) -> DisplayCard {
    let mut card = DisplayCard::new(&project.title)
        .description(&project.description)
        .accent(Accent::Blue)
        .field("ID", project.id.to_string(), true)
        .field(
            "Status",
            present(&project.ship_status).unwrap_or(NOT_AVAILABLE),
            true,
        );
    if let Some(repo_url) = present(&project.repo_url) {
        card = card.field("Repository", format!("[Link]({repo_url})"), false);
    }
    if let Some(demo_url) = present(&project.demo_url) {
        card = card.field("Demo", format!("[Link]({demo_url})"), false);
    }
    card.footer(format!("Created: {}", project.created_at))
}

pub fn project_details_card(project: &Project) -> DisplayCard {
    let created: String = project.created_at.chars().take(10).collect();
    let mut card = DisplayCard::new(&project.title)
        .description(&project.description)
        .accent(Accent::Blue)
        .field("ID", project.id.to_string(), true)
        .field(
            "Status",
            present(&project.ship_status).unwrap_or(NOT_AVAILABLE),
            true,
        )
        .field("Created", created, true);
    if let Some(declaration) = present(&project.ai_declaration) {
        card = card.field("AI Declaration", declaration, false);
    }
    card
}

pub fn project_list_card(list: &ProjectList) -> DisplayCard {
    let card = DisplayCard::new("Projects Search Results")
        .description(format!("Found {} projects", list.pagination.total_count))
        .accent(Accent::Green);
    list.projects
        .iter()
        .take(LIST_PREVIEW_LIMIT)
        .fold(card, |card, project| {
            card.field(
                &project.title,
                summary(&project.description, PROJECT_SUMMARY_CAP),
                false,
            )
        })
        .footer(page_footer(
            list.pagination.current_page,
            list.pagination.total_pages,
        ))
}

pub fn devlog_card(devlog: &Devlog) -> DisplayCard {
    let mut card = DisplayCard::new(format!("Devlog #{}", devlog.id))
        .description(truncate(&devlog.body, DEVLOG_BODY_CAP))
        .accent(Accent::Purple)
        .field("Comments", devlog.comments_count.to_string(), true)
        .field("Likes", devlog.likes_count.to_string(), true)
        .field("Duration", format!("{}s", devlog.duration_seconds), true);
    if let Some(scrapbook_url) = present(&devlog.scrapbook_url) {
        card = card.field("Scrapbook", format!("[Link]({scrapbook_url})"), false);
    }
    card.footer(format!("Created: {}", devlog.created_at))
}

pub fn devlog_list_card(list: &DevlogList) -> DisplayCard {
    let card = DisplayCard::new("Recent Devlogs")
        .description(format!("Total: {}", list.pagination.total_count))
        .accent(Accent::Green);
    list.devlogs
        .iter()
        .take(LIST_PREVIEW_LIMIT)
        .fold(card, |card, devlog| {
            card.field(
                format!("Devlog #{}", devlog.id),
                format!(
                    "{} | 💬 {} | ❤️ {}",
                    truncate(&devlog.body, DEVLOG_SUMMARY_CAP),
                    devlog.comments_count,
                    devlog.likes_count
                ),
                false,
            )
        })
        .footer(page_footer(
            list.pagination.current_page,
            list.pagination.total_pages,
        ))
}

pub fn user_card(user: &User) -> DisplayCard {
    let mut card = DisplayCard::new(&user.display_name)
        .accent(Accent::Orange)
        .field("ID", user.id.to_string(), true);
    if let Some(slack_id) = present(&user.slack_id) {
        card = card.field("Slack ID", slack_id, true);
    }
    card = card
        .field("Votes", user.vote_count.to_string(), true)
        .field("Likes", user.like_count.to_string(), true)
        .field(
            "Devlog Time (Today)",
            format!("{}s", user.devlog_seconds_today),
            true,
        )
        .field(
            "Devlog Time (Total)",
            format!("{}s", user.devlog_seconds_total),
            true,
        );
    if let Some(avatar) = present(&user.avatar) {
        card = card.thumbnail(avatar);
    }
    card
}

pub fn user_stats_card(user: &User) -> DisplayCard {
    DisplayCard::new(format!("{}'s Stats", user.display_name))
        .accent(Accent::Orange)
        .field("Votes", user.vote_count.to_string(), true)
        .field("Likes", user.like_count.to_string(), true)
        .field("Cookies", user.cookies.to_string(), true)
        .field(
            "Devlog Time (Today)",
            format!("{}s", user.devlog_seconds_today),
            true,
        )
        .field(
            "Devlog Time (Total)",
            format!("{}s", user.devlog_seconds_total),
            true,
        )
}

pub fn slack_id_text(user: &User) -> String {
    format!(
        "Slack ID: `{}`",
        present(&user.slack_id).unwrap_or("Not linked")
    )
}

pub fn user_list_card(list: &UserList) -> DisplayCard {
    let card = DisplayCard::new("User Search Results")
        .description(format!("Found {} users", list.pagination.total_count))
        .accent(Accent::Yellow);
    list.users
        .iter()
        .take(LIST_PREVIEW_LIMIT)
        .fold(card, |card, user| {
            card.field(
                &user.display_name,
                format!(
                    "Slack: {} | Cookies: {}",
                    present(&user.slack_id).unwrap_or(NOT_AVAILABLE),
                    user.cookies
                ),
                false,
            )
        })
        .footer(page_footer(
            list.pagination.current_page,
            list.pagination.total_pages,
        ))
}

pub fn store_item_card(item: &StoreItem) -> DisplayCard {
    let mut card = DisplayCard::new(&item.name)
        .description(item.description.clone().unwrap_or_default())
        .accent(Accent::Blurple)
        .field(
            "Type",
            present(&item.item_type).unwrap_or(NOT_AVAILABLE),
            true,
        )
        .field("Stock", item.stock.unwrap_or(0).to_string(), true)
        .field("Limited", if item.limited { "Yes" } else { "No" }, true);
    if let Some(image_url) = present(&item.image_url) {
        card = card.image(image_url);
    }
    card.footer(format!("Item ID: {}", item.id))
}

pub fn store_pricing_card(item: &StoreItem) -> DisplayCard {
    let mut card = DisplayCard::new(format!("🍪 {} - Pricing", item.name)).accent(Accent::Gold);
    card.fields = price_fields(&item.ticket_cost);
    card
}

pub fn store_availability_card(item: &StoreItem) -> DisplayCard {
    let mark = |enabled: bool| if enabled { "✅" } else { "❌" };
    let regions = item.enabled;
    DisplayCard::new(format!("📦 {} - Availability", item.name))
        .accent(Accent::Green)
        .field("🇺🇸 United States", mark(regions.enabled_us), true)
        .field("🇪🇺 Europe", mark(regions.enabled_eu), true)
        .field("🇬🇧 UK", mark(regions.enabled_uk), true)
        .field("🇨🇦 Canada", mark(regions.enabled_ca), true)
        .field("🇦🇺 Australia", mark(regions.enabled_au), true)
}

pub fn store_page_card(catalog: &StoreCatalog, cursor: CategoryCursor) -> DisplayCard {
    let category = catalog.category(cursor);
    let count = category.items.len();
    let card = DisplayCard::new(format!("🛍️ Store Items - {}", title_case(&category.name)))
        .accent(Accent::Gold)
        .description(format!(
            "Found {count} {} item{}",
            category.name.to_lowercase(),
            pluralize(count)
        ));

    catalog
        .page_items(cursor)
        .iter()
        .fold(card, |card, item| {
            let availability = if item.limited {
                "🔴 Limited"
            } else {
                "🟢 Available"
            };
            let stock = item
                .stock
                .map(|stock| stock.to_string())
                .unwrap_or_else(|| "Unknown".into());
            card.field(
                format!("{} (ID: {})", item.name, item.id),
                format!("{availability} | Stock: {stock}"),
                false,
            )
        })
        .footer(format!(
            "Category {} of {} | Items {} of {}",
            cursor.category_index + 1,
            catalog.categories().len(),
            cursor.item_page_index + 1,
            catalog.page_count(cursor.category_index)
        ))
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
