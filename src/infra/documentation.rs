//! Human-facing API documentation, loaded once at start-up.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentedParam {
    pub name: String,
    /// `query`, `path` or `form`.
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentedEndpoint {
    pub method: String,
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub params: Vec<DocumentedParam>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiDocumentation {
    pub endpoints: Vec<DocumentedEndpoint>,
}

impl ApiDocumentation {
    /// Reads a JSON array of endpoints from `path`.
    ///
    /// A missing file falls back to [`ApiDocumentation::builtin`]; a malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "documentation file not found, using built-in table");
            return Ok(Self::builtin());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let endpoints: Vec<DocumentedEndpoint> = serde_json::from_str(raw)?;
        Ok(Self { endpoints })
    }

    pub fn builtin() -> Self {
        fn param(name: &str, location: &str, required: bool, description: &str) -> DocumentedParam {
            DocumentedParam {
                name: name.to_string(),
                location: location.to_string(),
                required,
                description: description.to_string(),
            }
        }
        fn endpoint(
            method: &str,
            path: &str,
            description: &str,
            params: Vec<DocumentedParam>,
        ) -> DocumentedEndpoint {
            DocumentedEndpoint {
                method: method.to_string(),
                path: path.to_string(),
                description: description.to_string(),
                params,
            }
        }

        let bool_param = |name: &str| param(name, "form", true, "'True' or 'False'");

        Self {
            endpoints: vec![
                endpoint("GET", "/cafe/all", "List every cafe.", vec![]),
                endpoint("GET", "/cafe/random", "Return one cafe chosen at random.", vec![]),
                endpoint(
                    "GET",
                    "/cafe/search",
                    "List the cafes at an exact location.",
                    vec![param("loc", "query", true, "Location to match exactly.")],
                ),
                endpoint(
                    "POST",
                    "/cafe/add",
                    "Add a new cafe from form-encoded parameters.",
                    vec![
                        param("name", "form", true, "Unique cafe name."),
                        param("map_url", "form", true, "Map link (must contain 'http')."),
                        param("img_url", "form", true, "Image link (must contain 'http')."),
                        param("location", "form", true, "Neighbourhood."),
                        param("seats", "form", true, "Capacity, e.g. '20-30'."),
                        bool_param("has_toilet"),
                        bool_param("has_wifi"),
                        bool_param("has_sockets"),
                        bool_param("can_take_calls"),
                        param("coffee_price", "form", true, "Non-negative number."),
                    ],
                ),
                endpoint(
                    "PATCH",
                    "/cafe/update-price/{id}",
                    "Update the coffee price of one cafe.",
                    vec![
                        param("id", "path", true, "Cafe id."),
                        param("new_price", "query", true, "Non-negative number."),
                    ],
                ),
                endpoint(
                    "DELETE",
                    "/cafe/report-closed/{id}",
                    "Delete a cafe that has closed.",
                    vec![
                        param("id", "path", true, "Cafe id."),
                        param("api-key", "query", true, "Shared secret."),
                    ],
                ),
            ],
        }
    }
}
