//! The fixed category registry.
//!
//! The board recognizes exactly eight categories. Each carries a display
//! color used for its tag in the fact list and for the sidebar filter
//! entries. The set is closed at compile time: facts arriving from the
//! store with an unknown category name resolve to `None` and are rendered
//! with an explicit fallback style rather than an unchecked color lookup.

// ============================================================================
// Category
// ============================================================================

/// One of the eight fixed fact categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Technology,
    Science,
    Finance,
    Society,
    Entertainment,
    Health,
    History,
    News,
}

impl Category {
    /// All categories in registry (display) order.
    pub const ALL: [Category; 8] = [
        Category::Technology,
        Category::Science,
        Category::Finance,
        Category::Society,
        Category::Entertainment,
        Category::Health,
        Category::History,
        Category::News,
    ];

    /// The registry name, as stored in the `category` column.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Science => "science",
            Category::Finance => "finance",
            Category::Society => "society",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::History => "history",
            Category::News => "news",
        }
    }

    /// The display color as an RGB triple.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Category::Technology => (0x3b, 0x82, 0xf6),
            Category::Science => (0x16, 0xa3, 0x4a),
            Category::Finance => (0xef, 0x44, 0x44),
            Category::Society => (0xea, 0xb3, 0x08),
            Category::Entertainment => (0xdb, 0x27, 0x77),
            Category::Health => (0x14, 0xb8, 0xa6),
            Category::History => (0xf9, 0x73, 0x16),
            Category::News => (0x8b, 0x5c, 0xf6),
        }
    }

    /// Exact-name lookup into the registry.
    ///
    /// Returns `None` for any string that is not one of the eight fixed
    /// names. Callers that accept user-typed input (config, CLI) should
    /// lowercase before calling; data from the store is matched as-is.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Position in the registry order, for sidebar selection math.
    ///
    /// `ALL` lists the variants in declaration order, so the discriminant
    /// is the index.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Category Filter
// ============================================================================

/// The list filter selected in the sidebar: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Display label: `"all"` or the category name.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(cat) => cat.name(),
        }
    }

    /// Parse `"all"` or a registry name (case-insensitive).
    ///
    /// Used for the `--category` flag and the `default_category` config key.
    pub fn parse(s: &str) -> Option<CategoryFilter> {
        let lower = s.to_ascii_lowercase();
        if lower == "all" {
            return Some(CategoryFilter::All);
        }
        Category::from_name(&lower).map(CategoryFilter::Only)
    }

    /// The category to filter by, or `None` for "all".
    pub fn category(self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(cat) => Some(cat),
        }
    }
}
