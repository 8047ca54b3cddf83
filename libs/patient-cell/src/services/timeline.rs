use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{TimelineEntry, TimelineKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimelineFilter {
    #[default]
    All,
    Only(TimelineKind),
}

impl TimelineFilter {
    pub fn matches(&self, entry: &TimelineEntry) -> bool {
        match self {
            TimelineFilter::All => true,
            TimelineFilter::Only(kind) => entry.kind() == *kind,
        }
    }
}

impl FromStr for TimelineFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TODOS" | "ALL" => Ok(TimelineFilter::All),
            "ANOTACAO_EQUIPE" | "ANOTACAO" => Ok(TimelineFilter::Only(TimelineKind::StaffNote)),
            "CONSULTA" => Ok(TimelineFilter::Only(TimelineKind::Consultation)),
            "ALERTA" => Ok(TimelineFilter::Only(TimelineKind::Alert)),
            other => Err(format!("unknown timeline filter: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Recent,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RECENTE" | "RECENT" => Ok(SortOrder::Recent),
            "ANTIGA" | "OLDEST" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filters and orders a timeline for display. Entries whose timestamp
/// cannot be read go last in either order, keeping their relative order.
pub fn arrange(entries: &[TimelineEntry], filter: TimelineFilter, order: SortOrder) -> Vec<&TimelineEntry> {
    let mut keyed: Vec<_> = entries
        .iter()
        .filter(|e| filter.matches(e))
        .map(|e| (e.timestamp(), e))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Recent => b.cmp(a),
            SortOrder::Oldest => a.cmp(b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, e)| e).collect()
}

/// Puts `entry` at the head of the timeline, dropping any other entry with
/// the same id.
pub fn prepend_unique(timeline: &mut Vec<TimelineEntry>, entry: TimelineEntry) {
    timeline.retain(|e| e.id() != entry.id());
    timeline.insert(0, entry);
}
