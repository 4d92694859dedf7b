//! Log Group to Service Grouping
//!
//! Imposes a two-level hierarchy on flat log group names so the operator can pick a
//! service first and a resource second. The split is a best-effort prefix heuristic:
//!
//! - names under the reserved `/aws/` prefix group on their second path segment
//!   (`/aws/lambda/` + `my-function`)
//! - any other name groups on its first segment (`/ecs/` + `cluster1`)
//! - names with no further delimiter are ungrouped: empty service, whole name as resource
//!
//! `service + resource` always reproduces the original name.

#![warn(clippy::all, rust_2018_idioms)]

use std::collections::BTreeMap;

use serde::Serialize;

/// Prefix of log groups created by AWS services
pub const AWS_SERVICE_PREFIX: &str = "/aws/";

/// Path delimiter in log group names
pub const DELIMITER: u8 = b'/';

/// Split a log group name into `(service, resource)`.
///
/// Total over every input: the empty string and names shorter than the search offset
/// come back as `("", name)`.
pub fn split(name: &str) -> (&str, &str) {
    let offset = if name.starts_with(AWS_SERVICE_PREFIX) {
        AWS_SERVICE_PREFIX.len()
    } else {
        1
    };

    let found = name
        .as_bytes()
        .get(offset..)
        .and_then(|rest| rest.iter().position(|&b| b == DELIMITER));

    match found {
        // The delimiter is ASCII, so index + 1 is always a char boundary.
        Some(pos) => name.split_at(offset + pos + 1),
        None => ("", name),
    }
}

/// Log group resources keyed by inferred service.
///
/// The empty service key holds ungrouped names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceMap {
    buckets: BTreeMap<String, Vec<String>>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group every name, in order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        map.extend(names);
        map
    }

    /// Append one name to its service bucket, creating the bucket on first use
    pub fn insert(&mut self, name: &str) {
        let (service, resource) = split(name);
        self.buckets
            .entry(service.to_string())
            .or_default()
            .push(resource.to_string());
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert(name.as_ref());
        }
    }

    /// Service keys in ascending order, with the ungrouped (empty) key last
    pub fn services(&self) -> Vec<String> {
        let mut services: Vec<String> = self
            .buckets
            .keys()
            .filter(|service| !service.is_empty())
            .cloned()
            .collect();

        if self.buckets.contains_key("") {
            services.push(String::new());
        }

        services
    }

    /// Resources of one service, in arrival order
    pub fn resources(&self, service: &str) -> &[String] {
        self.buckets
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Full log group name for a service/resource pair
    pub fn log_group_name(service: &str, resource: &str) -> String {
        format!("{service}{resource}")
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of log groups across every service
    pub fn resource_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
