// Wire types for the inventory REST API.
//
// These mirror the server's JSON shapes exactly. Scalar columns are
// nullable server-side, so descriptive fields are `Option`; nested
// collections default to empty when the server omits them. No renaming
// or defaulting beyond that -- presentation is the caller's concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────────

/// Opaque PC identifier.
///
/// Server-side this is a hex digest of the machine serial; the client
/// treats it as an opaque immutable string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PcId(String);

impl PcId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PcId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for PcId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PcId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Integer tag identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(i64);

impl TagId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TagId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ── List query parameters ───────────────────────────────────────────

/// Sort columns accepted by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PcSortField {
    SubmittedAt,
    Host,
    Cpu,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters for `GET /pcs`.
///
/// Doubles as the canonical cache key for list queries: equality and
/// hashing are structural, so two logically identical parameter sets are
/// one key no matter how they were assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PcListParams {
    pub sort_by: Option<PcSortField>,
    pub sort_order: Option<SortOrder>,
    /// Filter to PCs carrying a tag with this name.
    pub tag: Option<String>,
}

impl PcListParams {
    /// Render the set parameters as query pairs, omitting unset ones.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(field) = self.sort_by {
            query.push(("sort_by", field.to_string()));
        }
        if let Some(order) = self.sort_order {
            query.push(("sort_order", order.to_string()));
        }
        if let Some(ref tag) = self.tag {
            query.push(("tag", tag.clone()));
        }
        query
    }
}

// ── Entities ────────────────────────────────────────────────────────

/// A tag: independent entity referenced by zero or many PCs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
}

/// Tag projection in list rows: the list endpoint strips the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBadge {
    pub name: String,
    pub color: String,
}

/// A disk, owned by its parent PC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub model: Option<String>,
    pub path: Option<String>,
    pub serial: Option<String>,
    #[serde(default)]
    pub size_gb: i64,
}

/// A RAM stick, owned by its parent PC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamStick {
    pub model: Option<String>,
    #[serde(default)]
    pub size_gb: i64,
    /// DDR generation. Wire name is `type`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Full PC record, as returned by `GET /pc/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pc {
    pub id: PcId,
    pub host: Option<String>,
    pub serial: Option<String>,
    pub cpu: Option<String>,
    pub mainboard: Option<String>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub ram_total_gb: Option<f64>,
    pub ram_slots: Option<String>,
    /// Server-local timestamp, `YYYY-MM-DD HH:MM:SS`. Kept verbatim.
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub gpus: Vec<String>,
    #[serde(default)]
    pub ram_sticks: Vec<RamStick>,
    #[serde(default)]
    pub disks: Vec<Disk>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Pc {
    /// Whether this PC carries the given tag.
    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }
}

/// Reduced PC projection, one row of `GET /pcs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcSummary {
    pub id: PcId,
    pub host: Option<String>,
    pub cpu: Option<String>,
    #[serde(default)]
    pub ram_total_gb: Option<f64>,
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagBadge>,
}

// ── Mutation payloads ───────────────────────────────────────────────

/// Body for `POST /update_notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesUpdate {
    pub pc_id: PcId,
    pub notes: String,
}

/// Confirmation for a notes update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesUpdated {
    pub pc_id: PcId,
}

/// Confirmation for a PC deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcDeleted {
    pub pc_id: PcId,
}

/// Body for `POST /tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
    pub color: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sort_fields_render_as_server_columns() {
        assert_eq!(PcSortField::SubmittedAt.to_string(), "submitted_at");
        assert_eq!(PcSortField::Host.to_string(), "host");
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }

    #[test]
    fn sort_field_parses_from_wire_name() {
        let field: PcSortField = "submitted_at".parse().unwrap();
        assert_eq!(field, PcSortField::SubmittedAt);
    }

    #[test]
    fn list_params_omit_unset_fields() {
        let params = PcListParams {
            sort_by: Some(PcSortField::Host),
            ..PcListParams::default()
        };
        assert_eq!(params.to_query(), vec![("sort_by", "host".to_owned())]);
        assert!(PcListParams::default().to_query().is_empty());
    }

    #[test]
    fn logically_equal_params_are_one_key() {
        let a = PcListParams {
            sort_by: Some(PcSortField::Cpu),
            sort_order: Some(SortOrder::Asc),
            tag: Some("lab".into()),
        };
        let mut b = PcListParams::default();
        b.tag = Some("lab".into());
        b.sort_order = Some(SortOrder::Asc);
        b.sort_by = Some(PcSortField::Cpu);

        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn pc_decodes_with_missing_collections() {
        let pc: Pc = serde_json::from_str(
            r#"{"id": "abc123", "host": "atlas", "serial": null, "cpu": "i5-9400",
                "mainboard": null, "resolution": null, "ram_total_gb": 16,
                "ram_slots": null, "submitted_at": "2025-06-01 10:00:00", "notes": null}"#,
        )
        .unwrap();
        assert_eq!(pc.id.as_str(), "abc123");
        assert!(pc.disks.is_empty());
        assert!(pc.tags.is_empty());
        assert_eq!(pc.ram_total_gb, Some(16.0));
    }

    #[test]
    fn ram_stick_kind_uses_wire_name_type() {
        let stick: RamStick =
            serde_json::from_str(r#"{"model": "M378A1K43CB2", "size_gb": 8, "type": "DDR4"}"#)
                .unwrap();
        assert_eq!(stick.kind.as_deref(), Some("DDR4"));
    }
}
