// MIT License - Copyright (c) 2026 Peter Wright
// Entity naming helpers

use crate::config::EntryConfig;
use crate::constants::DOMAIN;

/// Lowercase `text`, turning every run of non-alphanumeric characters into
/// a single `_`. Empty results become `"unknown"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        return "unknown".to_string();
    }
    slug
}

/// Entity id for an item of the given config entry, e.g.
/// `econnect_metronet.home_garden`.
///
/// The system name (or, failing that, the username) prefixes the item name
/// so that two alarm systems with identically named sectors do not clash.
pub fn generate_entity_id(entry: &EntryConfig, name: &str) -> String {
    let entity_name = match entry.display_prefix() {
        Some(prefix) => format!("{prefix}_{name}"),
        None => name.to_string(),
    };
    format!("{DOMAIN}.{}", slugify(&entity_name))
}
