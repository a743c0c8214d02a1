use crate::domain::model::{Component, EnrichKind};
use crate::domain::ports::ContentRepository;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Field on a therapy-section component holding the referenced records.
const THERAPIES_FIELD: &str = "therapies";

/// Re-fetches deeply-populated variants of the dynamic-zone kinds the
/// primary page query returns only shallowly, and splices them back in.
/// Every fetch is best-effort: a failed kind keeps its shallow originals.
pub struct SubComponentEnricher<'a, R: ContentRepository> {
    repo: &'a R,
}

impl<'a, R: ContentRepository> SubComponentEnricher<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub async fn enrich(&self, slug: &str, zone: Vec<Component>) -> Vec<Component> {
        let needs_slider = contains_kind(&zone, EnrichKind::Slider);
        let needs_testimonial = contains_kind(&zone, EnrichKind::Testimonial);
        let needs_therapy = contains_kind(&zone, EnrichKind::Therapy);
        // Ids come from the already-fetched shallow zone, so the bulk lookup
        // has no ordering requirement against the per-kind queries.
        let therapy_ids = harvest_therapy_ids(&zone);

        let (sliders, testimonials, therapy_sections, therapy_records) = tokio::join!(
            self.fetch_replacements(slug, EnrichKind::Slider, needs_slider),
            self.fetch_replacements(slug, EnrichKind::Testimonial, needs_testimonial),
            self.fetch_replacements(slug, EnrichKind::Therapy, needs_therapy),
            self.fetch_therapies(slug, &therapy_ids),
        );

        let mut zone = zone;
        if let Some(replacements) = sliders {
            apply_replacements(&mut zone, EnrichKind::Slider, &replacements);
        }
        if let Some(replacements) = testimonials {
            apply_replacements(&mut zone, EnrichKind::Testimonial, &replacements);
        }
        if let Some(replacements) = therapy_sections {
            apply_replacements(&mut zone, EnrichKind::Therapy, &replacements);
        }
        if let Some(records) = therapy_records {
            apply_therapy_records(&mut zone, &records);
        }
        zone
    }

    async fn fetch_replacements(
        &self,
        slug: &str,
        kind: EnrichKind,
        needed: bool,
    ) -> Option<Vec<Component>> {
        if !needed {
            return None;
        }

        match self.repo.page_zone_deep(slug, kind).await {
            Ok(deep_zone) => {
                let replacements: Vec<Component> = deep_zone
                    .into_iter()
                    .filter(|component| component.kind == kind.component_kind())
                    .collect();
                tracing::debug!(
                    "📥 {}: {} enriched component(s) for '{}'",
                    slug,
                    replacements.len(),
                    kind.component_kind()
                );
                Some(replacements)
            }
            Err(e) => {
                tracing::warn!(
                    "🔶 {}: enrichment query for '{}' failed, keeping shallow components: {}",
                    slug,
                    kind.component_kind(),
                    e
                );
                None
            }
        }
    }

    async fn fetch_therapies(
        &self,
        slug: &str,
        ids: &[i64],
    ) -> Option<HashMap<i64, Map<String, Value>>> {
        if ids.is_empty() {
            return None;
        }

        match self.repo.therapies_by_ids(ids).await {
            Ok(records) => {
                let mut by_id = HashMap::new();
                for record in records {
                    if let Value::Object(fields) = record {
                        if let Some(id) = fields.get("id").and_then(Value::as_i64) {
                            by_id.insert(id, fields);
                        }
                    }
                }
                tracing::debug!(
                    "📥 {}: {} of {} referenced therapy record(s) found",
                    slug,
                    by_id.len(),
                    ids.len()
                );
                Some(by_id)
            }
            Err(e) => {
                tracing::warn!(
                    "🔶 {}: bulk therapy lookup failed, keeping shallow entries: {}",
                    slug,
                    e
                );
                None
            }
        }
    }
}

fn contains_kind(zone: &[Component], kind: EnrichKind) -> bool {
    zone.iter()
        .any(|component| component.kind == kind.component_kind())
}

/// The distinct therapy ids referenced across all therapy-section
/// components, in first-seen order.
pub fn harvest_therapy_ids(zone: &[Component]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();

    for component in zone {
        if component.kind != EnrichKind::Therapy.component_kind() {
            continue;
        }
        let Some(Value::Array(entries)) = component.fields.get(THERAPIES_FIELD) else {
            continue;
        };
        for entry in entries {
            if let Some(id) = therapy_entry_id(entry) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
    }

    ids
}

fn therapy_entry_id(entry: &Value) -> Option<i64> {
    match entry {
        Value::Number(_) => entry.as_i64(),
        Value::Object(obj) => obj.get("id").and_then(Value::as_i64),
        _ => None,
    }
}

/// Replaces each component of the kind with its enriched counterpart.
/// Matching is by id; without an id match the first enriched result is used
/// positionally rather than dropping the section.
fn apply_replacements(zone: &mut [Component], kind: EnrichKind, replacements: &[Component]) {
    if replacements.is_empty() {
        return;
    }

    for component in zone.iter_mut() {
        if component.kind != kind.component_kind() {
            continue;
        }

        let replacement = component
            .id()
            .and_then(|id| replacements.iter().find(|r| r.id() == Some(id)))
            .or_else(|| replacements.first());

        if let Some(replacement) = replacement {
            *component = replacement.clone();
        }
    }
}

/// Shallow-merges looked-up therapy records over the referencing entries.
/// The looked-up record wins on conflicting keys; entries whose id has no
/// match stay unchanged.
fn apply_therapy_records(zone: &mut [Component], records: &HashMap<i64, Map<String, Value>>) {
    for component in zone.iter_mut() {
        if component.kind != EnrichKind::Therapy.component_kind() {
            continue;
        }
        let Some(Value::Array(entries)) = component.fields.get_mut(THERAPIES_FIELD) else {
            continue;
        };

        for entry in entries.iter_mut() {
            let Some(id) = therapy_entry_id(entry) else {
                continue;
            };
            let Some(record) = records.get(&id) else {
                continue;
            };

            let mut merged = record.clone();
            if let Value::Object(original) = entry {
                for (key, value) in original.iter() {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            *entry = Value::Object(merged);
        }
    }
}
