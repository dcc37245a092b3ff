//! Configuration of the `page-templates` operation.
//!
//! A template names a set of regions; the service matches templates against
//! each page and extracts the text found within every region. All builders
//! return new values, leaving the receiver untouched.
//!
//! Fields are declared in lexicographic order so encoded objects keep the
//! same key order as every other operation payload.

use super::Bounds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named templates submitted with a `page-templates` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTemplates {
    #[serde(default)]
    templates: BTreeMap<String, Template>,
}

impl PageTemplates {
    /// Create an empty template set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `template` added (or replaced) under `name`.
    pub fn with_template(&self, name: impl Into<String>, template: Template) -> Self {
        let mut templates = self.templates.clone();
        templates.insert(name.into(), template);
        Self { templates }
    }

    /// Templates by name.
    pub fn templates(&self) -> &BTreeMap<String, Template> {
        &self.templates
    }
}

/// A set of named page regions, optionally restricted to a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pagenum: Option<u32>,

    #[serde(default)]
    regions: BTreeMap<String, Region>,
}

impl Template {
    /// Create a template with no regions that applies to every page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `region` added (or replaced) under `name`.
    pub fn with_region(&self, name: impl Into<String>, region: Region) -> Self {
        self.with_regions([(name.into(), region)])
    }

    /// Return a copy with all of `regions` added.
    pub fn with_regions<I>(&self, regions: I) -> Self
    where
        I: IntoIterator<Item = (String, Region)>,
    {
        let mut merged = self.regions.clone();
        merged.extend(regions);
        Self {
            pagenum: self.pagenum,
            regions: merged,
        }
    }

    /// Return a copy that only matches the given page (0-indexed).
    pub fn restrict_to_page(&self, pagenum: u32) -> Self {
        Self {
            pagenum: Some(pagenum),
            regions: self.regions.clone(),
        }
    }

    /// The page this template is restricted to, if any.
    pub fn page_number(&self) -> Option<u32> {
        self.pagenum
    }

    /// Regions by name.
    pub fn regions(&self) -> &BTreeMap<String, Region> {
        &self.regions
    }
}

/// A rectangular page region, optionally constrained by its text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    bounds: Bounds,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    contains: Option<String>,

    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    matching: Option<String>,
}

impl Region {
    /// Create a region covering `bounds`.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            contains: None,
            matching: None,
        }
    }

    /// Create a region from left-x, bottom-y, right-x, top-y.
    pub fn from_coords(lx: f64, by: f64, rx: f64, ty: f64) -> Self {
        Self::new(Bounds::new(lx, by, rx, ty))
    }

    /// Return a copy whose text must match the regular expression `pattern`.
    pub fn matching_regex(&self, pattern: impl Into<String>) -> Self {
        Self {
            matching: Some(pattern.into()),
            ..self.clone()
        }
    }

    /// Return a copy whose text must contain `needle`.
    pub fn containing_string(&self, needle: impl Into<String>) -> Self {
        Self {
            contains: Some(needle.into()),
            ..self.clone()
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn matching(&self) -> Option<&str> {
        self.matching.as_deref()
    }

    pub fn contains(&self) -> Option<&str> {
        self.contains.as_deref()
    }
}
