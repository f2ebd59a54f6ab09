use super::*;
use shared::{
    domain::{DevlogId, ProjectId, RegionAvailability, StoreItemId, UserId},
    protocol::Pagination,
};

fn project() -> Project {
    Project {
        id: ProjectId(12),
        title: "Cookie Clicker".into(),
        description: "Click the cookie".into(),
        ship_status: None,
        repo_url: Some("https://github.com/example/cookie".into()),
        demo_url: Some("".into()),
        readme_url: None,
        ai_declaration: None,
        created_at: "2025-01-02T03:04:05Z".into(),
    }
}

fn devlog(body: &str) -> Devlog {
    Devlog {
        id: DevlogId(3),
        body: body.into(),
        comments_count: 2,
        likes_count: 5,
        duration_seconds: 3600,
        scrapbook_url: None,
        created_at: "2025-02-01".into(),
    }
}

fn user() -> User {
    User {
        id: UserId(8),
        display_name: "Ada".into(),
        slack_id: None,
        avatar: Some("https://cdn.example/ada.png".into()),
        vote_count: 4,
        like_count: 9,
        cookies: 120,
        devlog_seconds_today: 60,
        devlog_seconds_total: 7200,
    }
}

fn store_item(id: i64, kind: &str, base_cost: Option<i64>) -> StoreItem {
    StoreItem {
        id: StoreItemId(id),
        name: format!("Item {id}"),
        description: Some("A thing".into()),
        item_type: Some(kind.into()),
        stock: Some(4),
        limited: id % 2 == 0,
        image_url: None,
        ticket_cost: TicketCost {
            base_cost,
            ..TicketCost::default()
        },
        enabled: RegionAvailability {
            enabled_us: true,
            ..RegionAvailability::default()
        },
    }
}

#[test]
fn formats_prices_with_hours() {
    assert_eq!(format_price(Some(100)), "100 biscuits (10h)");
    assert_eq!(format_price(Some(105)), "105 biscuits (10.5h)");
    assert_eq!(format_price(Some(0)), "0 biscuits (0h)");
    assert_eq!(format_price(Some(7)), "7 biscuits (0.7h)");
    assert_eq!(format_price(None), "N/A");
}

#[test]
fn uniform_regional_prices_collapse_into_one_field() {
    let cost = TicketCost {
        base_cost: Some(50),
        us: Some(50),
        eu: Some(50),
        uk: Some(50),
        ca: Some(50),
    };
    let fields = price_fields(&cost);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "Price");
    assert_eq!(fields[0].value, "50 biscuits (5h)");
}

#[test]
fn missing_regions_do_not_break_uniformity() {
    let cost = TicketCost {
        base_cost: Some(50),
        us: Some(50),
        ..TicketCost::default()
    };
    assert_eq!(price_fields(&cost).len(), 1);
}

#[test]
fn differing_regional_price_lists_every_region() {
    let cost = TicketCost {
        base_cost: Some(50),
        us: Some(60),
        eu: Some(50),
        uk: Some(50),
        ca: Some(50),
    };
    let fields = price_fields(&cost);
    let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(
        names,
        ["Base Cost", "US Price", "EU Price", "UK Price", "CA Price"]
    );
    assert_eq!(fields[0].value, "50 biscuits (5h)");
    assert_eq!(fields[1].value, "60 biscuits (6h)");
    assert!(fields.iter().all(|field| field.inline));
}

#[test]
fn missing_base_cost_lists_every_region() {
    let fields = price_fields(&TicketCost::default());
    assert_eq!(fields.len(), 5);
    assert!(fields.iter().all(|field| field.value == "N/A"));
}

#[test]
fn truncation_only_marks_long_text() {
    let long = "x".repeat(310);
    let cut = truncate(&long, DEVLOG_BODY_CAP);
    assert_eq!(cut.len(), 303);
    assert!(cut.ends_with("..."));
    assert_eq!(&cut[..300], &long[..300]);

    let short = "y".repeat(50);
    assert_eq!(truncate(&short, DEVLOG_BODY_CAP), short);
    assert_eq!(truncate(&"z".repeat(300), DEVLOG_BODY_CAP).len(), 300);
}

#[test]
fn truncation_counts_characters_not_bytes() {
    let text = "🍪".repeat(90);
    let cut = truncate(&text, DEVLOG_SUMMARY_CAP);
    assert_eq!(cut.chars().count(), 83);
}

#[test]
fn devlog_card_truncates_body() {
    let card = devlog_card(&devlog(&"b".repeat(310)));
    assert_eq!(card.title, "Devlog #3");
    assert_eq!(card.description.as_deref().map(str::len), Some(303));
    assert_eq!(card.field_value("Duration"), Some("3600s"));
    assert_eq!(card.field_value("Scrapbook"), None);
    assert_eq!(card.footer.as_deref(), Some("Created: 2025-02-01"));
}

#[test]
fn project_card_only_shows_present_links() {
    let card = project_card(&project());
    assert_eq!(card.field_value("Status"), Some("N/A"));
    assert_eq!(
        card.field_value("Repository"),
        Some("[Link](https://github.com/example/cookie)")
    );
    assert_eq!(card.field_value("Demo"), None);
    assert_eq!(
        card.footer.as_deref(),
        Some("Created: 2025-01-02T03:04:05Z")
    );
}

#[test]
fn project_details_shows_date_and_declaration() {
    let mut project = project();
    assert_eq!(project_details_card(&project).field_value("AI Declaration"), None);

    project.ai_declaration = Some("Used for tests".into());
    let card = project_details_card(&project);
    assert_eq!(card.field_value("Created"), Some("2025-01-02"));
    assert_eq!(card.field_value("AI Declaration"), Some("Used for tests"));
}

#[test]
fn project_list_previews_five_with_short_descriptions() {
    let mut projects = Vec::new();
    for id in 0..7 {
        let mut project = project();
        project.id = ProjectId(id);
        project.title = format!("Project {id}");
        project.description = "d".repeat(if id == 0 { 150 } else { 20 });
        projects.push(project);
    }
    let list = ProjectList {
        projects,
        pagination: Pagination {
            current_page: 2,
            total_pages: 3,
            total_count: 27,
        },
    };

    let card = project_list_card(&list);
    assert_eq!(card.description.as_deref(), Some("Found 27 projects"));
    assert_eq!(card.fields.len(), 5);
    assert_eq!(card.fields[0].value.len(), 103);
    assert_eq!(card.fields[1].value, "d".repeat(20));
    assert_eq!(card.footer.as_deref(), Some("Page 2 of 3"));
}

#[test]
fn project_list_marks_missing_descriptions() {
    let mut blank = project();
    blank.description = "   ".into();
    let list = ProjectList {
        projects: vec![blank],
        pagination: Pagination::default(),
    };

    let card = project_list_card(&list);
    assert_eq!(card.fields[0].value, "N/A");
}

#[test]
fn devlog_list_summarises_each_entry() {
    let list = DevlogList {
        devlogs: vec![devlog("short body")],
        pagination: Pagination::default(),
    };
    let card = devlog_list_card(&list);
    assert_eq!(card.description.as_deref(), Some("Total: 0"));
    assert_eq!(card.fields[0].name, "Devlog #3");
    assert_eq!(card.fields[0].value, "short body | 💬 2 | ❤️ 5");
}

#[test]
fn user_cards_handle_missing_slack_id() {
    let user = user();
    let card = user_card(&user);
    assert_eq!(card.field_value("Slack ID"), None);
    assert_eq!(card.thumbnail_url.as_deref(), Some("https://cdn.example/ada.png"));
    assert_eq!(slack_id_text(&user), "Slack ID: `Not linked`");

    let stats = user_stats_card(&user);
    assert_eq!(stats.title, "Ada's Stats");
    assert_eq!(stats.field_value("Cookies"), Some("120"));

    let list = user_list_card(&UserList {
        users: vec![user],
        pagination: Pagination::default(),
    });
    assert_eq!(list.fields[0].value, "Slack: N/A | Cookies: 120");
}

#[test]
fn store_item_cards() {
    let item = store_item(2, "hardware", Some(100));
    let card = store_item_card(&item);
    assert_eq!(card.field_value("Limited"), Some("Yes"));
    assert_eq!(card.field_value("Stock"), Some("4"));
    assert_eq!(card.image_url, None);
    assert_eq!(card.footer.as_deref(), Some("Item ID: 2"));

    let pricing = store_pricing_card(&item);
    assert_eq!(pricing.title, "🍪 Item 2 - Pricing");
    assert_eq!(pricing.field_value("Price"), Some("100 biscuits (10h)"));

    let availability = store_availability_card(&item);
    assert_eq!(availability.field_value("🇺🇸 United States"), Some("✅"));
    assert_eq!(availability.field_value("🇦🇺 Australia"), Some("❌"));
}

#[test]
fn store_page_card_describes_category_position() {
    let catalog = StoreCatalog::from_items(
        vec![
            store_item(1, "sticker", Some(30)),
            store_item(3, "sticker", Some(10)),
            store_item(4, "hardware", Some(100)),
        ],
        5,
    )
    .expect("catalog");

    let card = store_page_card(&catalog, catalog.start());
    assert_eq!(card.title, "🛍️ Store Items - Sticker");
    assert_eq!(card.description.as_deref(), Some("Found 2 sticker items"));
    assert_eq!(card.fields[0].name, "Item 3 (ID: 3)");
    assert_eq!(card.fields[1].name, "Item 1 (ID: 1)");
    assert_eq!(card.fields[0].value, "🟢 Available | Stock: 4");
    assert_eq!(
        card.footer.as_deref(),
        Some("Category 1 of 2 | Items 1 of 1")
    );

    let hardware = store_page_card(&catalog, catalog.end());
    assert_eq!(hardware.description.as_deref(), Some("Found 1 hardware item"));
    assert_eq!(hardware.fields[0].value, "🔴 Limited | Stock: 4");
}
