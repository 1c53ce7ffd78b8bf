//! Owned view of an MSBuild-style project file.
//!
//! The XML is parsed once with `roxmltree` and copied into a small owned
//! element tree so it can be cached alongside the file it came from.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Xml {
        path: String,
        #[source]
        source: roxmltree::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Namespace URI of the tag, `None` for elements outside any namespace.
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut attributes: Vec<(String, String)> = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();
        // roxmltree exposes namespace declarations separately from attributes.
        if let Some(ns) = node.namespaces().find(|ns| ns.name().is_none()) {
            if node.parent_element().map_or(true, |p| p.default_namespace() != Some(ns.uri())) {
                attributes.push(("xmlns".to_string(), ns.uri().to_string()));
            }
        }

        let text = node
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect::<String>();

        Self {
            name: node.tag_name().name().to_string(),
            namespace: node.tag_name().namespace().map(str::to_string),
            attributes,
            text,
            children: node
                .children()
                .filter(|c| c.is_element())
                .map(XmlElement::from_node)
                .collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed text content.
    pub fn value(&self) -> &str {
        self.text.trim()
    }

    /// `true`/`false` (case-insensitive) text, anything else is unknown.
    pub fn boolean(&self) -> Option<bool> {
        let value = self.value();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// One step of an element path: a tag name with an optional
/// `[@attr='value']` filter.
#[derive(Debug, PartialEq, Eq)]
struct PathStep<'a> {
    name: &'a str,
    filter: Option<(&'a str, &'a str)>,
}

fn parse_step(step: &str) -> PathStep<'_> {
    if let Some((name, rest)) = step.split_once("[@") {
        if let Some((attr, value)) = rest.trim_end_matches(']').split_once('=') {
            let value = value.trim_matches(|c| c == '\'' || c == '"');
            return PathStep {
                name,
                filter: Some((attr, value)),
            };
        }
    }
    PathStep {
        name: step,
        filter: None,
    }
}

#[derive(Debug, Clone)]
pub struct ProjectDocument {
    root: XmlElement,
}

impl ProjectDocument {
    pub fn parse(text: &str, path: &str) -> Result<Self, ProjectError> {
        let doc = roxmltree::Document::parse(text).map_err(|source| ProjectError::Xml {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            root: XmlElement::from_node(doc.root_element()),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&text, &display)
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// All elements at `path`, e.g. `Project/ItemGroup/PackageReference[@Include='X']`.
    /// The first step must name the root element. Steps only match elements
    /// without a namespace, so legacy projects under the MSBuild namespace
    /// select nothing.
    pub fn select_all<'a>(&'a self, path: &str) -> Vec<&'a XmlElement> {
        let mut steps = path.trim_start_matches('/').split('/').map(parse_step);
        let first = match steps.next() {
            Some(step) => step,
            None => return Vec::new(),
        };
        if !step_matches(&first, &self.root) {
            return Vec::new();
        }

        let mut current = vec![&self.root];
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter())
                .filter(|child| step_matches(&step, child))
                .collect();
        }
        current
    }

    pub fn select(&self, path: &str) -> Option<&XmlElement> {
        self.select_all(path).into_iter().next()
    }

    pub fn boolean(&self, path: &str) -> Option<bool> {
        self.select(path).and_then(XmlElement::boolean)
    }

    /// SDK-style projects carry no default namespace on the root element.
    pub fn is_sdk_project(&self) -> bool {
        self.root.attribute("xmlns").is_none()
    }

    pub fn has_package_reference(&self, package: &str) -> bool {
        let path = format!("Project/ItemGroup/PackageReference[@Include='{package}']");
        self.select(&path).is_some()
    }

    pub fn is_test_project(&self) -> bool {
        self.has_package_reference("Microsoft.NET.Test.Sdk")
    }

    /// Whether the project ships as a library package. `repo_packable` is the
    /// repository-wide `IsPackable` default, when one is set.
    pub fn produces_library_package(&self, repo_packable: Option<bool>) -> bool {
        if self.boolean("Project/PropertyGroup/PackAsTool").unwrap_or(false) {
            return false;
        }
        self.boolean("Project/PropertyGroup/IsPackable")
            .or(repo_packable)
            .unwrap_or_else(|| self.has_package_reference("Particular.Packaging"))
    }

    pub fn produces_source_package(&self) -> bool {
        let include_build_output = self.boolean("Project/PropertyGroup/IncludeBuildOutput");
        let include_sources = self.boolean("Project/PropertyGroup/IncludeSourceFilesInPackage");
        include_build_output == Some(false) && include_sources == Some(true)
    }
}

fn step_matches(step: &PathStep<'_>, el: &XmlElement) -> bool {
    el.namespace.is_none()
        && el.name == step.name
        && step
            .filter
            .map_or(true, |(attr, value)| el.attribute(attr) == Some(value))
}
