use serde::{Deserialize, Serialize, Serializer};

use crate::categories::Category;

// ============================================================================
// Vote Columns
// ============================================================================

/// One of the three vote counters on a fact.
///
/// `column_name()` is the single source of truth for the store's column
/// names. The hosted table spells them in camelCase, and the mindblow
/// counter in particular is easy to misspell (`votesMindblowing` is a
/// historical name that never shipped), so nothing else in the crate is
/// allowed to write these strings out by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteColumn {
    Interesting,
    Mindblow,
    False,
}

impl VoteColumn {
    /// All columns, in the order they appear on a fact row.
    pub const ALL: [VoteColumn; 3] = [
        VoteColumn::Interesting,
        VoteColumn::Mindblow,
        VoteColumn::False,
    ];

    /// The store's column name for this counter.
    pub const fn column_name(self) -> &'static str {
        match self {
            VoteColumn::Interesting => "votesInteresting",
            VoteColumn::Mindblow => "votesMindblow",
            VoteColumn::False => "votesFalse",
        }
    }

    /// The glyph shown next to the counter in the fact list.
    pub const fn symbol(self) -> &'static str {
        match self {
            VoteColumn::Interesting => "👍",
            VoteColumn::Mindblow => "🤯",
            VoteColumn::False => "⛔",
        }
    }
}

// ============================================================================
// Wire Model
// ============================================================================

/// A fact row as the store returns it.
///
/// `category` stays a plain `String` at the wire boundary: rows written by
/// other clients may carry names outside the fixed registry, and those rows
/// must still list, render (with a fallback tag) and accept votes.
/// `created_in` is populated by the store on insert and deserialized for
/// wire fidelity, though nothing in the UI reads it today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: i64,
    pub text: String,
    pub source: String,
    pub category: String,
    #[serde(rename = "votesInteresting")]
    pub votes_interesting: i64,
    #[serde(rename = "votesMindblow")]
    pub votes_mindblow: i64,
    #[serde(rename = "votesFalse")]
    pub votes_false: i64,
    #[serde(rename = "createdIn")]
    pub created_in: i32,
}

impl Fact {
    /// The current value of one vote counter.
    pub fn votes(&self, column: VoteColumn) -> i64 {
        match column {
            VoteColumn::Interesting => self.votes_interesting,
            VoteColumn::Mindblow => self.votes_mindblow,
            VoteColumn::False => self.votes_false,
        }
    }

    /// A fact is disputed when false votes outnumber both positive
    /// counters combined.
    pub fn is_disputed(&self) -> bool {
        self.votes_interesting + self.votes_mindblow < self.votes_false
    }

    /// The registry entry for this fact's category, if it has one.
    pub fn category_tag(&self) -> Option<Category> {
        Category::from_name(&self.category)
    }
}

/// A draft fact ready to submit.
///
/// The category is typed here because this side of the wire is ours: the
/// form only offers registry entries. It serializes as the registry name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFact {
    pub text: String,
    pub source: String,
    #[serde(serialize_with = "category_as_name")]
    pub category: Category,
}

fn category_as_name<S: Serializer>(cat: &Category, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(cat.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fact(interesting: i64, mindblow: i64, false_votes: i64) -> Fact {
        Fact {
            id: 1,
            text: "The Colosseum could hold 50,000 spectators".to_string(),
            source: "https://example.com/colosseum".to_string(),
            category: "history".to_string(),
            votes_interesting: interesting,
            votes_mindblow: mindblow,
            votes_false: false_votes,
            created_in: 2021,
        }
    }

    #[test]
    fn test_column_names_match_store_schema() {
        assert_eq!(VoteColumn::Interesting.column_name(), "votesInteresting");
        assert_eq!(VoteColumn::Mindblow.column_name(), "votesMindblow");
        assert_eq!(VoteColumn::False.column_name(), "votesFalse");
    }

    #[test]
    fn test_fact_deserializes_from_store_row() {
        let body = r#"{
            "id": 7,
            "created_at": "2023-06-12T09:30:00.000000+00:00",
            "text": "Lisbon is the only European capital on the Atlantic",
            "source": "https://example.com/lisbon",
            "category": "society",
            "votesInteresting": 11,
            "votesMindblow": 2,
            "votesFalse": 0,
            "createdIn": 2015
        }"#;
        let fact: Fact = serde_json::from_str(body).unwrap();
        assert_eq!(fact.id, 7);
        assert_eq!(fact.votes_interesting, 11);
        assert_eq!(fact.votes_mindblow, 2);
        assert_eq!(fact.votes_false, 0);
        assert_eq!(fact.created_in, 2015);
        assert_eq!(fact.category_tag(), Some(Category::Society));
    }

    #[test]
    fn test_unregistered_category_survives_deserialization() {
        let body = r#"{
            "id": 8,
            "text": "x",
            "source": "https://example.com",
            "category": "cryptids",
            "votesInteresting": 0,
            "votesMindblow": 0,
            "votesFalse": 0,
            "createdIn": 2024
        }"#;
        let fact: Fact = serde_json::from_str(body).unwrap();
        assert_eq!(fact.category, "cryptids");
        assert_eq!(fact.category_tag(), None);
    }

    #[test]
    fn test_new_fact_serializes_category_name() {
        let draft = NewFact {
            text: "Honey never spoils".to_string(),
            source: "https://example.com/honey".to_string(),
            category: Category::Science,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "Honey never spoils",
                "source": "https://example.com/honey",
                "category": "science"
            })
        );
    }

    #[test]
    fn test_disputed_boundary() {
        // Strictly fewer positive votes than false votes.
        assert!(fact(1, 1, 3).is_disputed());
        // Equal is not disputed.
        assert!(!fact(1, 2, 3).is_disputed());
        assert!(!fact(3, 0, 3).is_disputed());
        // Fresh fact with zero everywhere is not disputed.
        assert!(!fact(0, 0, 0).is_disputed());
    }

    #[test]
    fn test_votes_accessor_matches_fields() {
        let f = fact(4, 5, 6);
        assert_eq!(f.votes(VoteColumn::Interesting), 4);
        assert_eq!(f.votes(VoteColumn::Mindblow), 5);
        assert_eq!(f.votes(VoteColumn::False), 6);
    }
}
