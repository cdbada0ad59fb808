//! Auto-generated API documentation.
//!
//! Route metadata is declared on the item builder at registration time
//! ([`crate::router::RouterItemBuilder::describe`] and friends) and
//! aggregated into an [`ApiDocs`] when the router is built. The default
//! not-found handler serves the generated document so an unknown call
//! answers with a definition of the whole API.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

/// Describes a handler's output format.
#[derive(Debug, Clone)]
pub struct OutputDoc {
    pub format: &'static str,
    pub content_type: &'static str,
}

impl Default for OutputDoc {
    fn default() -> Self {
        Self { format: "JSON (Javascript Serialized Object Notation)", content_type: "application/json" }
    }
}

impl OutputDoc {
    pub const fn new(format: &'static str, content_type: &'static str) -> Self {
        Self { format, content_type }
    }
}

/// Describes one accepted input parameter.
#[derive(Debug, Clone)]
pub struct ParamDoc {
    pub name: String,
    pub type_doc: &'static str,
    pub default: Option<Value>,
}

/// Everything documentable about one registered route.
#[derive(Debug, Clone, Default)]
pub struct RouteMeta {
    pub path: String,
    pub method: String,
    pub versions: Option<BTreeSet<u32>>,
    pub usage: Option<String>,
    pub examples: Vec<String>,
    pub output: Option<OutputDoc>,
    pub inputs: Vec<ParamDoc>,
}

/// The aggregated documentation of a built router.
#[derive(Debug, Clone, Default)]
pub struct ApiDocs {
    pub overview: Option<String>,
    pub routes: Vec<RouteMeta>,
}

impl ApiDocs {
    /// Renders the documentation as a JSON value.
    ///
    /// With more than one registered version the handlers are grouped
    /// under a `versions` map; a single version is flattened away so the
    /// paths sit at the top level. `api_version` restricts the document
    /// to one version.
    pub fn generate(&self, base_url: &str, api_version: Option<u32>) -> Value {
        let mut buckets: BTreeMap<Option<u32>, Map<String, Value>> = BTreeMap::new();
        if let Some(version) = api_version {
            buckets.insert(Some(version), Map::new());
        } else {
            for meta in &self.routes {
                match &meta.versions {
                    Some(versions) => {
                        for version in versions {
                            buckets.entry(Some(*version)).or_default();
                        }
                    }
                    None => {
                        buckets.entry(None).or_default();
                    }
                }
            }
            if buckets.is_empty() {
                buckets.insert(None, Map::new());
            }
        }

        // Unversioned routes apply to every version bucket.
        let all_versions: Vec<Option<u32>> = buckets.keys().copied().collect();
        for meta in &self.routes {
            let applies_to: Vec<Option<u32>> = match &meta.versions {
                Some(versions) => versions.iter().map(|v| Some(*v)).collect(),
                None => all_versions.clone(),
            };
            for version in applies_to {
                let Some(bucket) = buckets.get_mut(&version) else {
                    continue;
                };
                let path_doc = bucket
                    .entry(meta.path.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(methods) = path_doc {
                    methods.insert(meta.method.clone(), route_doc(meta, base_url, version));
                }
            }
        }

        let mut documentation = Map::new();
        if let Some(overview) = &self.overview {
            documentation.insert("overview".to_owned(), json!(overview));
        }
        if buckets.len() == 1 {
            let (_, handlers) = buckets.pop_first().unwrap_or_default();
            documentation.extend(handlers);
        } else {
            let mut versions = Map::new();
            for (version, handlers) in buckets {
                if let Some(version) = version {
                    versions.insert(version.to_string(), Value::Object(handlers));
                }
            }
            documentation.insert("versions".to_owned(), Value::Object(versions));
        }
        Value::Object(documentation)
    }
}

fn route_doc(meta: &RouteMeta, base_url: &str, version: Option<u32>) -> Value {
    let mut doc = Map::new();
    if let Some(usage) = &meta.usage {
        doc.insert("usage".to_owned(), json!(usage));
    }
    if !meta.examples.is_empty() {
        let prefix = match version {
            Some(version) => format!("{base_url}/v{version}{}", meta.path),
            None => format!("{base_url}{}", meta.path),
        };
        let mut rendered: Vec<Value> = Vec::with_capacity(meta.examples.len());
        for example in &meta.examples {
            let text = if example.is_empty() { prefix.clone() } else { format!("{prefix}?{example}") };
            let text = Value::String(text);
            if !rendered.contains(&text) {
                rendered.push(text);
            }
        }
        doc.insert("examples".to_owned(), Value::Array(rendered));
    }
    let output = meta.output.clone().unwrap_or_default();
    doc.insert(
        "outputs".to_owned(),
        json!({ "format": output.format, "content_type": output.content_type }),
    );
    if !meta.inputs.is_empty() {
        let mut inputs = Map::new();
        for input in &meta.inputs {
            let mut definition = Map::new();
            definition.insert("type".to_owned(), json!(input.type_doc));
            if let Some(default) = &input.default {
                definition.insert("default".to_owned(), default.clone());
            }
            inputs.insert(input.name.clone(), Value::Object(definition));
        }
        doc.insert("inputs".to_owned(), Value::Object(inputs));
    }
    Value::Object(doc)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::{ApiDocs, OutputDoc, ParamDoc, RouteMeta};
    use crate::types::TypeDoc;

    fn echo_meta(versions: Option<BTreeSet<u32>>) -> RouteMeta {
        RouteMeta {
            path: "/echo".to_owned(),
            method: "GET".to_owned(),
            versions,
            usage: Some("Echoes the given text back".to_owned()),
            examples: vec!["text=hi".to_owned()],
            output: None,
            inputs: vec![ParamDoc { name: "text".to_owned(), type_doc: String::type_doc(), default: None }],
        }
    }

    #[test]
    fn single_version_is_flattened() {
        let docs = ApiDocs { overview: Some("Example API".to_owned()), routes: vec![echo_meta(None)] };
        let value = docs.generate("http://localhost", None);

        assert_eq!(value["overview"], json!("Example API"));
        assert!(value.get("versions").is_none());
        let route = &value["/echo"]["GET"];
        assert_eq!(route["usage"], json!("Echoes the given text back"));
        assert_eq!(route["examples"], json!(["http://localhost/echo?text=hi"]));
        assert_eq!(route["outputs"]["content_type"], json!("application/json"));
        assert_eq!(route["inputs"]["text"]["type"], json!("Basic text / string value"));
    }

    #[test]
    fn multiple_versions_are_bucketed() {
        let docs = ApiDocs {
            overview: None,
            routes: vec![
                echo_meta(Some(BTreeSet::from([1]))),
                echo_meta(Some(BTreeSet::from([2]))),
                RouteMeta {
                    path: "/status".to_owned(),
                    method: "GET".to_owned(),
                    versions: None,
                    ..RouteMeta::default()
                },
            ],
        };
        let value = docs.generate("", None);

        let versions = value["versions"].as_object().unwrap();
        assert_eq!(versions.len(), 2);
        // The unversioned route shows up under every version.
        assert!(versions["1"]["/status"]["GET"].is_object());
        assert!(versions["2"]["/status"]["GET"].is_object());
        assert_eq!(versions["1"]["/echo"]["GET"]["examples"], json!(["/v1/echo?text=hi"]));
        assert_eq!(versions["2"]["/echo"]["GET"]["examples"], json!(["/v2/echo?text=hi"]));
    }

    #[test]
    fn api_version_filter_restricts_output() {
        let docs = ApiDocs {
            overview: None,
            routes: vec![echo_meta(Some(BTreeSet::from([1]))), echo_meta(Some(BTreeSet::from([2])))],
        };
        let value = docs.generate("", Some(2));

        assert!(value.get("versions").is_none());
        assert_eq!(value["/echo"]["GET"]["examples"], json!(["/v2/echo?text=hi"]));
    }

    #[test]
    fn custom_output_doc_and_defaults() {
        let docs = ApiDocs {
            overview: None,
            routes: vec![RouteMeta {
                path: "/add".to_owned(),
                method: "GET".to_owned(),
                versions: None,
                usage: None,
                examples: Vec::new(),
                output: Some(OutputDoc::new("Plain text", "text/plain")),
                inputs: vec![ParamDoc { name: "amount".to_owned(), type_doc: u32::type_doc(), default: Some(json!(1)) }],
            }],
        };
        let value = docs.generate("", None);

        let route = &value["/add"]["GET"];
        assert_eq!(route["outputs"]["format"], json!("Plain text"));
        assert!(route.get("examples").is_none());
        assert_eq!(route["inputs"]["amount"]["default"], json!(1));
        assert_eq!(route["inputs"]["amount"]["type"], json!("A whole number"));
    }
}
