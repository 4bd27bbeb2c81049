// Hand-crafted async HTTP client for the pcdex inventory API.
//
// One typed method per resource action. Identifier validation happens
// before any request is issued; transport failures and non-2xx statuses
// map to `Error::Remote`, malformed 2xx bodies to `Error::Decode`.

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    NotesUpdate, NotesUpdated, Pc, PcDeleted, PcId, PcListParams, PcSummary, Tag, TagCreate, TagId,
};

// ── Operation context ───────────────────────────────────────────────

/// Resource/action pair attached to every failure of an operation.
#[derive(Clone, Copy)]
struct Op {
    resource: &'static str,
    action: &'static str,
}

impl Op {
    const fn new(resource: &'static str, action: &'static str) -> Self {
        Self { resource, action }
    }

    fn transport(self, err: reqwest::Error) -> Error {
        Error::Remote {
            resource: self.resource,
            action: self.action,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

// ── Error response shape ────────────────────────────────────────────

/// The server reports failures as `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the inventory API.
///
/// Stateless beyond the connection pool; cheap to clone.
#[derive(Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL, guaranteeing a trailing slash so relative
    /// joins resolve under it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining a relative path works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── PC operations ───────────────────────────────────────────────

    /// List PCs, optionally sorted and filtered by tag name.
    ///
    /// `GET /pcs?sort_by&sort_order&tag`
    pub async fn list_pcs(&self, params: &PcListParams) -> Result<Vec<PcSummary>, Error> {
        const OP: Op = Op::new("pc", "list");
        let url = self.url("pcs");
        debug!(%url, ?params, "listing pcs");

        let resp = self
            .http
            .get(url)
            .query(&params.to_query())
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    /// Fetch one PC with its full component inventory and tags.
    ///
    /// `GET /pc/{id}`
    pub async fn get_pc(&self, id: &PcId) -> Result<Pc, Error> {
        const OP: Op = Op::new("pc", "get");
        Self::require_pc_id(OP, id)?;
        let url = self.url(&format!("pc/{id}"));
        debug!(%url, "fetching pc");

        let resp = self.http.get(url).send().await.map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    /// Replace the free-text notes of a PC.
    ///
    /// `POST /update_notes` with `{pc_id, notes}`
    pub async fn update_notes(&self, update: &NotesUpdate) -> Result<NotesUpdated, Error> {
        const OP: Op = Op::new("pc", "update-notes");
        Self::require_pc_id(OP, &update.pc_id)?;
        let url = self.url("update_notes");
        debug!(%url, pc_id = %update.pc_id, "updating notes");

        let resp = self
            .http
            .post(url)
            .json(update)
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    /// Delete a PC and everything it owns.
    ///
    /// `DELETE /pc/{id}/delete`
    pub async fn delete_pc(&self, id: &PcId) -> Result<PcDeleted, Error> {
        const OP: Op = Op::new("pc", "delete");
        Self::require_pc_id(OP, id)?;
        let url = self.url(&format!("pc/{id}/delete"));
        debug!(%url, "deleting pc");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    // ── Tag operations ──────────────────────────────────────────────

    /// List all tags, sorted by name server-side.
    ///
    /// `GET /tags`
    pub async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        const OP: Op = Op::new("tag", "list");
        let url = self.url("tags");
        debug!(%url, "listing tags");

        let resp = self.http.get(url).send().await.map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    /// Create a tag. The server enforces name uniqueness (409 on duplicates).
    ///
    /// `POST /tags` with `{name, color}`
    pub async fn create_tag(&self, tag: &TagCreate) -> Result<Tag, Error> {
        const OP: Op = Op::new("tag", "create");
        if tag.name.trim().is_empty() {
            return Err(Error::InvalidArgument {
                message: "tag create requires a non-empty name".into(),
            });
        }
        let url = self.url("tags");
        debug!(%url, name = %tag.name, "creating tag");

        let resp = self
            .http
            .post(url)
            .json(tag)
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    /// Delete a tag. The server cascades the PC associations.
    ///
    /// `DELETE /tags/{id}` -- the response body is opaque and discarded.
    pub async fn delete_tag(&self, id: TagId) -> Result<(), Error> {
        const OP: Op = Op::new("tag", "delete");
        let url = self.url(&format!("tags/{id}"));
        debug!(%url, "deleting tag");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_empty(OP, resp).await
    }

    // ── PC↔Tag association operations ───────────────────────────────

    /// Attach a tag to a PC (409 if already attached).
    ///
    /// `POST /pc/{id}/tags` with `{tag_id}` -- opaque response discarded.
    pub async fn add_tag_to_pc(&self, pc: &PcId, tag: TagId) -> Result<(), Error> {
        const OP: Op = Op::new("pc-tag", "add");
        Self::require_pc_id(OP, pc)?;
        let url = self.url(&format!("pc/{pc}/tags"));
        debug!(%url, %tag, "adding tag to pc");

        let resp = self
            .http
            .post(url)
            .json(&json!({ "tag_id": tag }))
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_empty(OP, resp).await
    }

    /// Detach a tag from a PC.
    ///
    /// `DELETE /pc/{id}/tags/{tagId}` -- opaque response discarded.
    pub async fn remove_tag_from_pc(&self, pc: &PcId, tag: TagId) -> Result<(), Error> {
        const OP: Op = Op::new("pc-tag", "remove");
        Self::require_pc_id(OP, pc)?;
        let url = self.url(&format!("pc/{pc}/tags/{tag}"));
        debug!(%url, "removing tag from pc");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| OP.transport(e))?;
        Self::handle_empty(OP, resp).await
    }

    /// List the tags attached to one PC.
    ///
    /// `GET /pc/{id}/tags`
    pub async fn list_pc_tags(&self, pc: &PcId) -> Result<Vec<Tag>, Error> {
        const OP: Op = Op::new("pc-tag", "list");
        Self::require_pc_id(OP, pc)?;
        let url = self.url(&format!("pc/{pc}/tags"));
        debug!(%url, "listing pc tags");

        let resp = self.http.get(url).send().await.map_err(|e| OP.transport(e))?;
        Self::handle_json(OP, resp).await
    }

    // ── Validation ──────────────────────────────────────────────────

    fn require_pc_id(op: Op, id: &PcId) -> Result<(), Error> {
        if id.is_empty() {
            return Err(Error::InvalidArgument {
                message: format!("{} {} requires a non-empty PC id", op.resource, op.action),
            });
        }
        Ok(())
    }

    // ── Response handling ───────────────────────────────────────────

    async fn handle_json<T: DeserializeOwned>(op: Op, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| op.transport(e))?;
            serde_json::from_str(&body).map_err(|e| {
                // Truncate on char boundaries; byte slicing could split a
                // multi-byte sequence and panic on the very path that must
                // report a decode failure.
                let preview: String = body.chars().take(200).collect();
                Error::Decode {
                    resource: op.resource,
                    action: op.action,
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(op, status, resp).await)
        }
    }

    async fn handle_empty(op: Op, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(op, status, resp).await)
        }
    }

    async fn parse_error(op: Op, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| status.to_string());

        Error::Remote {
            resource: op.resource,
            action: op.action,
            status: Some(status.as_u16()),
            message,
        }
    }
}
