//! Element sets: bijective name/token/value vocabularies.
//!
//! [`ElementSet`] is the editable form and [`FrozenElementSet`] the
//! shareable immutable form. Both answer lookups through [`ElementLookup`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::element::{Element, ElementKind};
use crate::error::{ElementField, MazeError, Result};
use crate::spec::{self, child, item};

/// Preferred values for well-known element names (lowercase), in
/// declaration order
pub type ReservedDefaults = Vec<(String, i64)>;

/// Read access shared by mutable and frozen element sets
pub trait ElementLookup<K: ElementKind> {
    /// Elements in insertion order
    fn elements(&self) -> &[Element<K>];

    fn element(&self, name: &str) -> Result<&Element<K>>;

    fn element_for_token(&self, token: char) -> Result<&Element<K>>;

    fn element_for_value(&self, value: i64) -> Result<&Element<K>>;

    fn len(&self) -> usize {
        self.elements().len()
    }

    fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    fn contains_value(&self, value: i64) -> bool {
        self.element_for_value(value).is_ok()
    }

    fn values(&self) -> BTreeSet<i64> {
        self.elements().iter().map(Element::value).collect()
    }

    /// Value of the element whose name matches `name` ignoring case.
    fn value_for_name_ignore_case(&self, name: &str) -> Option<i64> {
        let lower = name.to_lowercase();
        self.elements()
            .iter()
            .find(|el| el.name().to_lowercase() == lower)
            .map(Element::value)
    }

    /// Spec form: `[{name, token, value}, ...]` in insertion order.
    fn to_list(&self) -> Value {
        Value::Array(
            self.elements()
                .iter()
                .map(|el| {
                    json!({
                        "name": el.name(),
                        "token": el.token().to_string(),
                        "value": el.value(),
                    })
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
struct ElementTable<K: ElementKind> {
    elements: Vec<Element<K>>,
    by_name: HashMap<String, usize>,
    by_token: HashMap<char, usize>,
    by_value: HashMap<i64, usize>,
}

impl<K: ElementKind> ElementTable<K> {
    fn new() -> Self {
        Self {
            elements: Vec::new(),
            by_name: HashMap::new(),
            by_token: HashMap::new(),
            by_value: HashMap::new(),
        }
    }

    fn insert(&mut self, element: Element<K>, path: &str) -> Result<()> {
        let duplicate = |field, value: String| MazeError::DuplicateElement {
            path: path.to_string(),
            field,
            value,
        };
        if self.by_name.contains_key(element.name()) {
            return Err(duplicate(ElementField::Name, element.name().to_string()));
        }
        if self.by_token.contains_key(&element.token()) {
            return Err(duplicate(ElementField::Token, element.token().to_string()));
        }
        if self.by_value.contains_key(&element.value()) {
            return Err(duplicate(ElementField::Value, element.value().to_string()));
        }

        let position = self.elements.len();
        self.by_name.insert(element.name().to_string(), position);
        self.by_token.insert(element.token(), position);
        self.by_value.insert(element.value(), position);
        self.elements.push(element);
        Ok(())
    }

    fn unknown(field: ElementField, value: String) -> MazeError {
        MazeError::UnknownElement {
            path: format!("{}_elements", K::LABEL),
            field,
            value,
        }
    }

    fn by_name(&self, name: &str) -> Result<&Element<K>> {
        self.by_name
            .get(name)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Self::unknown(ElementField::Name, name.to_string()))
    }

    fn by_token(&self, token: char) -> Result<&Element<K>> {
        self.by_token
            .get(&token)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Self::unknown(ElementField::Token, token.to_string()))
    }

    fn by_value(&self, value: i64) -> Result<&Element<K>> {
        self.by_value
            .get(&value)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Self::unknown(ElementField::Value, value.to_string()))
    }
}

// The indices are derived from `elements`, so equality only compares those.
impl<K: ElementKind> PartialEq for ElementTable<K> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

/// Mutable element set
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet<K: ElementKind> {
    table: ElementTable<K>,
}

/// Immutable element set; clones share storage
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenElementSet<K: ElementKind> {
    table: Arc<ElementTable<K>>,
}

macro_rules! impl_element_lookup {
    ($set:ident) => {
        impl<K: ElementKind> ElementLookup<K> for $set<K> {
            fn elements(&self) -> &[Element<K>] {
                &self.table.elements
            }

            fn element(&self, name: &str) -> Result<&Element<K>> {
                self.table.by_name(name)
            }

            fn element_for_token(&self, token: char) -> Result<&Element<K>> {
                self.table.by_token(token)
            }

            fn element_for_value(&self, value: i64) -> Result<&Element<K>> {
                self.table.by_value(value)
            }
        }
    };
}

impl_element_lookup!(ElementSet);
impl_element_lookup!(FrozenElementSet);

impl<K: ElementKind> Default for ElementSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ElementKind> ElementSet<K> {
    pub fn new() -> Self {
        Self {
            table: ElementTable::new(),
        }
    }

    /// Build a set from already-constructed elements.
    pub fn from_elements(elements: impl IntoIterator<Item = Element<K>>) -> Result<Self> {
        let mut set = Self::new();
        for element in elements {
            set.add(element)?;
        }
        Ok(set)
    }

    /// Add an element, rejecting any duplicate name, token or value.
    pub fn add(&mut self, element: Element<K>) -> Result<()> {
        let path = format!("{}_elements", K::LABEL);
        self.table.insert(element, &path)
    }

    /// Build a set from raw element specs, auto-assigning omitted values.
    pub fn from_list(items: &Value, reserved: &[(String, i64)], path: &str) -> Result<Self> {
        Self::from_list_excluding(items, reserved, &BTreeSet::new(), path)
    }

    /// Like [`ElementSet::from_list`], but auto-assigned values also avoid
    /// `blocked`.
    ///
    /// Pass 1 collects explicit values and the reserved candidates for
    /// elements that omit one. Pass 2 assigns: explicit as given, then a
    /// reserved candidate unless an explicit value already holds it, then
    /// the lowest non-negative value not used, explicit, reserved or
    /// blocked.
    pub fn from_list_excluding(
        items: &Value,
        reserved: &[(String, i64)],
        blocked: &BTreeSet<i64>,
        path: &str,
    ) -> Result<Self> {
        let items = spec::as_list(items, path)?;
        if items.is_empty() {
            return Err(MazeError::EmptyElementList {
                path: path.to_string(),
            });
        }

        let mut explicit_values = BTreeSet::new();
        let mut reserved_candidates: Vec<(String, i64)> = Vec::new();
        let mut entries = Vec::with_capacity(items.len());

        for (index, raw) in items.iter().enumerate() {
            let item_path = item(path, index);
            let entry = spec::as_map(raw, &item_path)?;
            let name = element_name(entry, &item_path)?;
            match spec::optional(entry, "value") {
                Some(value) => {
                    let value = spec::as_integer(value, &child(&item_path, "value"))?;
                    if !explicit_values.insert(value) {
                        return Err(MazeError::DuplicateElement {
                            path: child(&item_path, "value"),
                            field: ElementField::Value,
                            value: value.to_string(),
                        });
                    }
                    entries.push((item_path, entry, name, Some(value)));
                }
                None => {
                    let lower = name.to_lowercase();
                    if let Some((_, preferred)) = reserved.iter().find(|(key, _)| *key == lower) {
                        if !reserved_candidates.iter().any(|(key, _)| *key == lower) {
                            reserved_candidates.push((lower, *preferred));
                        }
                    }
                    entries.push((item_path, entry, name, None));
                }
            }
        }

        let mut set = Self::new();
        let mut used = BTreeSet::new();
        for (item_path, entry, name, explicit) in entries {
            let token = element_token(entry, &item_path)?;
            let value = match explicit {
                Some(value) => value,
                None => {
                    let lower = name.to_lowercase();
                    let candidate = reserved_candidates
                        .iter()
                        .find(|(key, _)| *key == lower)
                        .map(|(_, value)| *value)
                        .filter(|value| !explicit_values.contains(value));
                    match candidate {
                        Some(value) => value,
                        None => next_available_value(|value| {
                            used.contains(&value)
                                || explicit_values.contains(&value)
                                || blocked.contains(&value)
                                || reserved_candidates.iter().any(|(_, v)| *v == value)
                        }),
                    }
                }
            };
            let element = Element::new(name, token, value)?;
            set.table.insert(element, &item_path)?;
            used.insert(value);
        }
        Ok(set)
    }

    /// Immutable copy. No uniqueness checks are re-run.
    pub fn freeze(&self) -> FrozenElementSet<K> {
        FrozenElementSet {
            table: Arc::new(self.table.clone()),
        }
    }
}

impl<K: ElementKind> FrozenElementSet<K> {
    /// Independent mutable copy.
    pub fn thaw(&self) -> ElementSet<K> {
        ElementSet {
            table: (*self.table).clone(),
        }
    }
}

/// Bump each preferred value upward past blocked or already-taken values,
/// in declaration order.
pub fn resolve_default_values(
    preferred: &[(String, i64)],
    blocked: &BTreeSet<i64>,
) -> ReservedDefaults {
    let mut taken = blocked.clone();
    preferred
        .iter()
        .map(|(name, value)| {
            let mut value = *value;
            while taken.contains(&value) {
                value += 1;
            }
            taken.insert(value);
            (name.clone(), value)
        })
        .collect()
}

fn next_available_value(is_taken: impl Fn(i64) -> bool) -> i64 {
    let mut candidate = 0;
    while is_taken(candidate) {
        candidate += 1;
    }
    candidate
}

fn element_name(entry: &spec::SpecMap, path: &str) -> Result<String> {
    let path = child(path, "name");
    let name = spec::optional(entry, "name").ok_or_else(|| MazeError::missing(path.clone()))?;
    let name = spec::as_str(name, &path)?;
    if name.is_empty() {
        return Err(MazeError::missing(path));
    }
    Ok(name.to_string())
}

/// Tokens are one-character strings; YAML may also hand over a bare digit.
fn element_token(entry: &spec::SpecMap, path: &str) -> Result<char> {
    let path = child(path, "token");
    let raw = spec::optional(entry, "token").ok_or_else(|| MazeError::missing(path.clone()))?;
    match raw {
        Value::String(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(token), None) => Ok(token),
                _ => Err(MazeError::type_mismatch(path, "a single character")),
            }
        }
        Value::Number(number) => number
            .as_u64()
            .filter(|digit| *digit <= 9)
            .and_then(|digit| char::from_digit(digit as u32, 10))
            .ok_or_else(|| MazeError::type_mismatch(path, "a single character")),
        _ => Err(MazeError::type_mismatch(path, "a single character")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Cell, CellElement, Wall};
    use serde_json::json;

    fn reserved(pairs: &[(&str, i64)]) -> ReservedDefaults {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut set = ElementSet::<Cell>::new();
        set.add(CellElement::new("open", '.', 0).unwrap()).unwrap();

        let err = set.add(CellElement::new("open", 'o', 5).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            MazeError::DuplicateElement { field: ElementField::Name, .. }
        ));
        let err = set.add(CellElement::new("floor", '.', 5).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            MazeError::DuplicateElement { field: ElementField::Token, .. }
        ));
        let err = set.add(CellElement::new("floor", 'f', 0).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            MazeError::DuplicateElement { field: ElementField::Value, .. }
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_lookups() {
        let items = json!([
            {"name": "open", "token": ".", "value": 0},
            {"name": "wall", "token": "#", "value": 1},
        ]);
        let set = ElementSet::<Cell>::from_list(&items, &[], "config.cell_elements").unwrap();
        assert_eq!(set.element("wall").unwrap().token(), '#');
        assert_eq!(set.element_for_token('.').unwrap().name(), "open");
        assert_eq!(set.element_for_value(1).unwrap().name(), "wall");
        assert!(matches!(
            set.element_for_value(7),
            Err(MazeError::UnknownElement { field: ElementField::Value, .. })
        ));
        assert!(matches!(
            set.element("lava"),
            Err(MazeError::UnknownElement { field: ElementField::Name, .. })
        ));
    }

    #[test]
    fn test_auto_assignment_is_deterministic() {
        let items = json!([
            {"name": "open", "token": "."},
            {"name": "wall", "token": "#"},
            {"name": "lava", "token": "L"},
        ]);
        let defaults = reserved(&[("open", 0), ("wall", 1)]);
        for _ in 0..3 {
            let set = ElementSet::<Cell>::from_list(&items, &defaults, "elements").unwrap();
            assert_eq!(set.element("open").unwrap().value(), 0);
            assert_eq!(set.element("wall").unwrap().value(), 1);
            assert_eq!(set.element("lava").unwrap().value(), 2);
        }
    }

    #[test]
    fn test_reserved_lookup_ignores_case() {
        let items = json!([
            {"name": "goal", "token": "G"},
            {"name": "Wall", "token": "#"},
        ]);
        let set =
            ElementSet::<Wall>::from_list(&items, &reserved(&[("wall", 1)]), "elements").unwrap();
        assert_eq!(set.element("Wall").unwrap().value(), 1);
        assert_eq!(set.element("goal").unwrap().value(), 0);
    }

    #[test]
    fn test_reserved_value_taken_by_explicit_falls_back() {
        let items = json!([
            {"name": "lava", "token": "L", "value": 0},
            {"name": "open", "token": "."},
        ]);
        let set =
            ElementSet::<Cell>::from_list(&items, &reserved(&[("open", 0)]), "elements").unwrap();
        assert_eq!(set.element("open").unwrap().value(), 1);
    }

    #[test]
    fn test_blocked_values_are_skipped() {
        let items = json!([{"name": "goal", "token": "G"}]);
        let blocked: BTreeSet<i64> = [0, 1].into_iter().collect();
        let set = ElementSet::<Cell>::from_list_excluding(&items, &[], &blocked, "elements").unwrap();
        assert_eq!(set.element("goal").unwrap().value(), 2);
    }

    #[test]
    fn test_from_list_errors() {
        assert!(matches!(
            ElementSet::<Cell>::from_list(&json!([]), &[], "config.cell_elements"),
            Err(MazeError::EmptyElementList { .. })
        ));
        assert_eq!(
            ElementSet::<Cell>::from_list(&json!([{"token": "."}]), &[], "config.cell_elements")
                .unwrap_err(),
            MazeError::missing("config.cell_elements[0].name")
        );
        assert_eq!(
            ElementSet::<Cell>::from_list(&json!([{"name": "open"}]), &[], "config.cell_elements")
                .unwrap_err(),
            MazeError::missing("config.cell_elements[0].token")
        );
        let duplicate = json!([
            {"name": "a", "token": "a", "value": 3},
            {"name": "b", "token": "b", "value": 3},
        ]);
        assert!(matches!(
            ElementSet::<Cell>::from_list(&duplicate, &[], "elements"),
            Err(MazeError::DuplicateElement { field: ElementField::Value, .. })
        ));
    }

    #[test]
    fn test_digit_tokens() {
        let items = json!([{"name": "one", "token": 1, "value": 5}]);
        let set = ElementSet::<Cell>::from_list(&items, &[], "elements").unwrap();
        assert_eq!(set.element_for_token('1').unwrap().value(), 5);
    }

    #[test]
    fn test_resolve_default_values() {
        let blocked: BTreeSet<i64> = [0, 1].into_iter().collect();
        let resolved = resolve_default_values(&reserved(&[("open", 0), ("wall", 1)]), &blocked);
        assert_eq!(resolved, reserved(&[("open", 2), ("wall", 3)]));
    }

    #[test]
    fn test_freeze_preserves_bijection() {
        let items = json!([
            {"name": "open", "token": "."},
            {"name": "wall", "token": "#"},
            {"name": "lava", "token": "L"},
        ]);
        let set = ElementSet::<Cell>::from_list(&items, &reserved(&[("open", 0)]), "e").unwrap();
        let frozen = set.freeze();
        for el in frozen.elements() {
            assert_eq!(frozen.element_for_token(el.token()).unwrap().value(), el.value());
            assert_eq!(frozen.element_for_value(el.value()).unwrap().token(), el.token());
        }
        assert_eq!(frozen.thaw(), set);
        assert_eq!(frozen.to_list(), set.to_list());
    }
}
