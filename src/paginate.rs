//! Fixed-size pagination and location grouping for photo sections.

use crate::finding::Finding;
use icu_collator::{Collator, CollatorOptions};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Photos per printed page, in both the grouped section and the appendix.
pub const PHOTOS_PER_PAGE: usize = 4;

/// Bucket name for findings without a location.
pub const UNSPECIFIED_AREA: &str = "Unspecified area";

/// Items sharing one key, already split into pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedGroup<'a, T> {
    pub key: String,
    pub pages: Vec<Vec<&'a T>>,
}

impl<T> PagedGroup<'_, T> {
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

/// Consecutive, non-overlapping chunks of `page_size` in input order. The
/// last chunk may be short; empty input yields no chunks. A zero page size is
/// treated as one.
pub fn paginate<'a, T, I>(items: I, page_size: usize) -> Vec<Vec<&'a T>>
where
    I: IntoIterator<Item = &'a T>,
{
    let page_size = page_size.max(1);
    let mut pages: Vec<Vec<&'a T>> = Vec::new();
    for item in items {
        match pages.last_mut() {
            Some(page) if page.len() < page_size => page.push(item),
            _ => {
                let mut page = Vec::with_capacity(page_size);
                page.push(item);
                pages.push(page);
            }
        }
    }
    pages
}

/// Human-readable ordering for group keys (root-locale collation). Falls back
/// to case-folded comparison when collation data cannot be loaded.
pub struct KeyOrder {
    collator: Option<Collator>,
}

impl KeyOrder {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!(error = %err, "collator unavailable, using case-folded ordering");
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => case_folded(a, b),
        };
        primary.then_with(|| a.cmp(b))
    }
}

impl Default for KeyOrder {
    fn default() -> Self {
        Self::new()
    }
}

fn case_folded(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Bucket items by key, order buckets with `order`, keep the original
/// relative order inside each bucket, then paginate each bucket. Blank or
/// missing keys go to `fallback_key`. Empty input yields no groups.
pub fn group_and_paginate<'a, T, K>(
    items: &'a [T],
    key: K,
    fallback_key: &str,
    order: &KeyOrder,
    page_size: usize,
) -> Vec<PagedGroup<'a, T>>
where
    K: Fn(&T) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<&'a T>)> = Vec::new();
    for item in items {
        let name = key(item)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| fallback_key.to_string());
        match index.get(&name) {
            Some(&slot) => buckets[slot].1.push(item),
            None => {
                index.insert(name.clone(), buckets.len());
                buckets.push((name, vec![item]));
            }
        }
    }
    buckets.sort_by(|a, b| order.compare(&a.0, &b.0));
    buckets
        .into_iter()
        .map(|(key, members)| PagedGroup {
            key,
            pages: paginate(members, page_size),
        })
        .collect()
}

/// Findings grouped by trimmed location, `Unspecified area` for blanks.
pub fn group_by_location<'a>(
    findings: &'a [Finding],
    order: &KeyOrder,
    page_size: usize,
) -> Vec<PagedGroup<'a, Finding>> {
    group_and_paginate(
        findings,
        |finding| finding.location_text().map(str::to_string),
        UNSPECIFIED_AREA,
        order,
        page_size,
    )
}
