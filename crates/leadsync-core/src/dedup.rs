//! Intra-batch duplicate rejection
//!
//! Two rows collide when they share an `id` or a `card`. Collisions are
//! symmetric: every row in a colliding group is rejected, including the one
//! that came first.

use std::collections::HashMap;

use crate::models::{Field, RawLead};

/// Identity value as compared across rows.
///
/// Integer-looking cells compare numerically so `7` and `07` collide;
/// anything else compares as trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IdentityKey {
    Int(i64),
    Text(String),
}

impl IdentityKey {
    fn of(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Int)
    }
}

/// A row removed from the batch, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub lead: RawLead,
    pub reason: String,
}

/// Outcome of the dedup pass. Both lists keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dedup {
    pub accepted: Vec<RawLead>,
    pub rejected: Vec<Rejection>,
}

/// Split a batch into rows with unique identities and colliding rows
pub fn deduplicate(leads: Vec<RawLead>) -> Dedup {
    let mut by_id: HashMap<IdentityKey, Vec<usize>> = HashMap::new();
    let mut by_card: HashMap<IdentityKey, Vec<usize>> = HashMap::new();

    for (index, lead) in leads.iter().enumerate() {
        by_id
            .entry(IdentityKey::of(lead.get(Field::Id)))
            .or_default()
            .push(index);
        by_card
            .entry(IdentityKey::of(lead.get(Field::Card)))
            .or_default()
            .push(index);
    }

    let mut reasons: Vec<Vec<String>> = vec![Vec::new(); leads.len()];
    for (field, groups) in [(Field::Id, &by_id), (Field::Card, &by_card)] {
        for group in groups.values().filter(|group| group.len() > 1) {
            for &member in group {
                let others = group
                    .iter()
                    .filter(|&&other| other != member)
                    .map(|&other| leads[other].row.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                reasons[member].push(format!(
                    "Duplicate field [{field}] shared with row(s) {others}"
                ));
            }
        }
    }

    let mut dedup = Dedup::default();
    for (lead, reasons) in leads.into_iter().zip(reasons) {
        if reasons.is_empty() {
            dedup.accepted.push(lead);
        } else {
            tracing::warn!("Rejecting duplicate row {}: {}", lead.row, reasons.join("; "));
            dedup.rejected.push(Rejection {
                lead,
                reason: reasons.join("; "),
            });
        }
    }

    dedup
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(row: usize, id: &str, card: &str) -> RawLead {
        RawLead::new(
            row,
            [
                (Field::Id, id),
                (Field::Name, "Ann"),
                (Field::Lastname, "Lee"),
                (Field::Card, card),
                (Field::Email, "a@x.com"),
            ],
        )
    }

    fn rejected_rows(dedup: &Dedup) -> Vec<usize> {
        dedup.rejected.iter().map(|r| r.lead.row).collect()
    }

    #[test]
    fn test_unique_rows_pass() {
        let dedup = deduplicate(vec![raw(1, "1", "10"), raw(2, "2", "20")]);
        assert_eq!(dedup.accepted.len(), 2);
        assert!(dedup.rejected.is_empty());
    }

    #[test]
    fn test_shared_id_rejects_both() {
        let dedup = deduplicate(vec![raw(1, "1", "10"), raw(2, "1", "20"), raw(3, "3", "30")]);

        assert_eq!(rejected_rows(&dedup), vec![1, 2]);
        assert_eq!(dedup.accepted, vec![raw(3, "3", "30")]);
        assert_eq!(
            dedup.rejected[0].reason,
            "Duplicate field [id] shared with row(s) 2"
        );
    }

    #[test]
    fn test_shared_card_rejects_both() {
        let dedup = deduplicate(vec![raw(1, "1", "10"), raw(2, "2", "10")]);
        assert_eq!(rejected_rows(&dedup), vec![1, 2]);
        assert!(dedup.accepted.is_empty());
    }

    #[test]
    fn test_union_of_id_and_card_collisions() {
        // 1 and 2 share an id, 2 and 3 share a card: all three go.
        let dedup = deduplicate(vec![
            raw(1, "1", "10"),
            raw(2, "1", "20"),
            raw(3, "3", "20"),
            raw(4, "4", "40"),
        ]);

        assert_eq!(rejected_rows(&dedup), vec![1, 2, 3]);
        assert_eq!(
            dedup.rejected[1].reason,
            "Duplicate field [id] shared with row(s) 1; Duplicate field [card] shared with row(s) 3"
        );
        assert_eq!(dedup.accepted.len(), 1);
    }

    #[test]
    fn test_three_way_collision_lists_all_partners() {
        let dedup = deduplicate(vec![raw(1, "1", "10"), raw(2, "1", "20"), raw(3, "1", "30")]);
        assert_eq!(dedup.rejected.len(), 3);
        assert!(dedup.rejected[0].reason.ends_with("row(s) 2, 3"));
    }

    #[test]
    fn test_integer_identities_compare_numerically() {
        let dedup = deduplicate(vec![raw(1, "7", "10"), raw(2, "07", "20")]);
        assert_eq!(dedup.rejected.len(), 2);
    }

    #[test]
    fn test_blank_identities_collide() {
        let dedup = deduplicate(vec![raw(1, "", "10"), raw(2, "", "20")]);
        assert_eq!(dedup.rejected.len(), 2);
    }

    #[test]
    fn test_accepted_rows_have_unique_identities() {
        let dedup = deduplicate(vec![
            raw(1, "1", "10"),
            raw(2, "2", "10"),
            raw(3, "3", "30"),
            raw(4, "4", "40"),
            raw(5, "4", "50"),
        ]);

        let ids: Vec<&str> = dedup.accepted.iter().map(|l| l.get(Field::Id)).collect();
        let cards: Vec<&str> = dedup.accepted.iter().map(|l| l.get(Field::Card)).collect();
        assert_eq!(ids, vec!["3"]);
        assert_eq!(cards, vec!["30"]);
    }
}
