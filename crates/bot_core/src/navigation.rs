use shared::{domain::StoreItem, protocol::Pagination};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;
const UNTYPED_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
}

/// Enabled flags for the four navigation controls. Computed from a cursor
/// both when a view is first built and after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

impl ControlState {
    pub fn enabled(&self, action: NavAction) -> bool {
        match action {
            NavAction::First => self.first_enabled,
            NavAction::Previous => self.prev_enabled,
            NavAction::Next => self.next_enabled,
            NavAction::Last => self.last_enabled,
        }
    }
}

/// Position within a flat, server-paged result set. Pages are 1-based and
/// `1 <= current <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    total: u32,
}

impl PageCursor {
    pub fn new(current: u32, total: u32) -> Self {
        let total = total.max(1);
        Self {
            current: current.clamp(1, total),
            total,
        }
    }

    pub fn from_pagination(pagination: &Pagination) -> Self {
        Self::new(pagination.current_page, pagination.total_pages)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn apply(self, action: NavAction) -> Self {
        let current = match action {
            NavAction::First => 1,
            NavAction::Previous => self.current.saturating_sub(1).max(1),
            NavAction::Next => self.current.saturating_add(1).min(self.total),
            NavAction::Last => self.total,
        };
        Self { current, ..self }
    }

    pub fn control_state(&self) -> ControlState {
        let at_start = self.current == 1;
        let at_end = self.current == self.total;
        ControlState {
            first_enabled: !at_start,
            prev_enabled: !at_start,
            next_enabled: !at_end,
            last_enabled: !at_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub items: Vec<StoreItem>,
}

/// Store items grouped by type, in the order each type first appears, with
/// every group sorted by ascending base cost (items without a cost last).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCatalog {
    categories: Vec<Category>,
    page_size: usize,
}

impl StoreCatalog {
    /// Returns `None` when there is nothing to browse.
    pub fn from_items(items: Vec<StoreItem>, page_size: usize) -> Option<Self> {
        let mut categories: Vec<Category> = Vec::new();
        for item in items {
            let name = item
                .item_type
                .clone()
                .filter(|kind| !kind.trim().is_empty())
                .unwrap_or_else(|| UNTYPED_CATEGORY.to_string());
            match categories.iter_mut().find(|category| category.name == name) {
                Some(category) => category.items.push(item),
                None => categories.push(Category {
                    name,
                    items: vec![item],
                }),
            }
        }
        if categories.is_empty() {
            return None;
        }

        for category in &mut categories {
            category
                .items
                .sort_by_key(|item| item.base_cost().unwrap_or(i64::MAX));
        }

        Some(Self {
            categories,
            page_size: page_size.max(1),
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, cursor: CategoryCursor) -> &Category {
        &self.categories[cursor.category_index]
    }

    pub fn last_page_index(&self, category_index: usize) -> usize {
        last_page_index(self.categories[category_index].items.len(), self.page_size)
    }

    pub fn page_count(&self, category_index: usize) -> usize {
        self.last_page_index(category_index) + 1
    }

    /// Total number of (category, item page) positions.
    #[cfg(test)]
    pub fn position_count(&self) -> usize {
        (0..self.categories.len())
            .map(|index| self.page_count(index))
            .sum()
    }

    pub fn page_items(&self, cursor: CategoryCursor) -> &[StoreItem] {
        let items = &self.category(cursor).items;
        let start = (cursor.item_page_index * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn start(&self) -> CategoryCursor {
        CategoryCursor::default()
    }

    pub fn end(&self) -> CategoryCursor {
        let category_index = self.categories.len() - 1;
        CategoryCursor {
            category_index,
            item_page_index: self.last_page_index(category_index),
        }
    }

    /// Steps through the concatenated (category, item page) sequence. `First`
    /// and `Last` are not offered by the store browser and yield `None`; a
    /// step past either end leaves the cursor where it is.
    pub fn apply(&self, cursor: CategoryCursor, action: NavAction) -> Option<CategoryCursor> {
        let CategoryCursor {
            category_index,
            item_page_index,
        } = cursor;
        let next = match action {
            NavAction::Previous if item_page_index > 0 => CategoryCursor {
                category_index,
                item_page_index: item_page_index - 1,
            },
            NavAction::Previous if category_index > 0 => CategoryCursor {
                category_index: category_index - 1,
                item_page_index: self.last_page_index(category_index - 1),
            },
            NavAction::Previous => cursor,
            NavAction::Next if item_page_index < self.last_page_index(category_index) => {
                CategoryCursor {
                    category_index,
                    item_page_index: item_page_index + 1,
                }
            }
            NavAction::Next if category_index + 1 < self.categories.len() => CategoryCursor {
                category_index: category_index + 1,
                item_page_index: 0,
            },
            NavAction::Next => cursor,
            NavAction::First | NavAction::Last => return None,
        };
        Some(next)
    }

    pub fn control_state(&self, cursor: CategoryCursor) -> ControlState {
        let at_start = cursor == self.start();
        let at_end = cursor == self.end();
        ControlState {
            first_enabled: false,
            prev_enabled: !at_start,
            next_enabled: !at_end,
            last_enabled: false,
        }
    }
}

/// Position inside a [`StoreCatalog`]: which category, and which page of that
/// category's items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCursor {
    pub category_index: usize,
    pub item_page_index: usize,
}

/// `ceil(len / page_size) - 1`, with an empty list still owning page 0.
pub fn last_page_index(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).saturating_sub(1)
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
