use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Value;
use crate::bind::ResolvedConfig;
use crate::errors::HookError;
use crate::value::DeferredValue;

/////////////////////////////////////////////////////////////////////////////////////////

/// Function deriving a setting from other, already resolved settings.
pub type ComputeFn = dyn Fn(&ResolvedConfig) -> Result<Value, String> + Send + Sync + 'static;

/////////////////////////////////////////////////////////////////////////////////////////

/// A single entry of the configuration under construction.
#[derive(Clone)]
pub enum Entry {
    /// Concrete value
    Literal(Value),

    /// Value bound from the environment
    Deferred(DeferredValue),

    /// Value derived from other settings at binding time
    ///
    /// Computed entries are evaluated after all literal and deferred entries,
    /// in setting name order, and can see computed entries evaluated before them.
    Computed(Arc<ComputeFn>),

    /// Placeholder that a downstream composition has to replace
    MustOverride(Cow<'static, str>),
}

impl Entry {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ResolvedConfig) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    pub fn must_override(message: impl Into<Cow<'static, str>>) -> Self {
        Self::MustOverride(message.into())
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredValue> {
        match self {
            Self::Deferred(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Deferred(v) => f.debug_tuple("Deferred").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
            Self::MustOverride(msg) => f.debug_tuple("MustOverride").field(msg).finish(),
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<DeferredValue> for Entry {
    fn from(value: DeferredValue) -> Self {
        Self::Deferred(value)
    }
}

impl From<bool> for Entry {
    fn from(value: bool) -> Self {
        Self::Literal(value.into())
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Self::Literal(value.into())
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Self::Literal(value.into())
    }
}

impl From<i64> for Entry {
    fn from(value: i64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<f64> for Entry {
    fn from(value: f64) -> Self {
        Self::Literal(value.into())
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Named settings, either declared by a mixin or being staged by a composition.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: BTreeMap<String, Entry>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the entry replacing the previous one
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) {
        self.entries.insert(name.into(), entry.into());
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /////////////////////////////////////////////////////////////////////////////////////

    /// Returns an editor of a list setting, creating an empty list if the setting is absent
    pub fn list_mut(&mut self, name: &str) -> Result<ListEditor<'_>, HookError> {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Entry::Literal(Value::Array(Vec::new())));

        let target = match entry {
            Entry::Literal(Value::Array(items)) => ListTarget::Literal(items),
            Entry::Deferred(value) if value.kind().holds_list() => ListTarget::Deferred {
                edits: value.list_edits_mut(),
                added: Vec::new(),
            },
            _ => {
                return Err(HookError::TypeMismatch {
                    setting: name.to_string(),
                    expected: "a list",
                });
            }
        };

        Ok(ListEditor {
            setting: name.to_string(),
            target,
        })
    }

    /// Returns an editor of a map setting, creating an empty map if the setting is absent
    pub fn map_mut(&mut self, name: &str) -> Result<MapEditor<'_>, HookError> {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Entry::Literal(Value::Object(Default::default())));

        match entry {
            Entry::Literal(Value::Object(map)) => Ok(MapEditor {
                setting: name.to_string(),
                map,
            }),
            _ => Err(HookError::TypeMismatch {
                setting: name.to_string(),
                expected: "a literal map",
            }),
        }
    }

    pub fn deferred_mut(&mut self, name: &str) -> Result<&mut DeferredValue, HookError> {
        match self.entries.get_mut(name) {
            Some(Entry::Deferred(value)) => Ok(value),
            Some(_) => Err(HookError::TypeMismatch {
                setting: name.to_string(),
                expected: "a deferred value",
            }),
            None => Err(HookError::MissingSetting {
                setting: name.to_string(),
            }),
        }
    }

    /// Inserts every entry of `other`, replacing entries with the same name
    pub fn merge(&mut self, other: &Settings) {
        for (name, entry) in other.iter() {
            self.entries.insert(name.to_string(), entry.clone());
        }
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }
}

impl IntoIterator for Settings {
    type Item = (String, Entry);
    type IntoIter = std::collections::btree_map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Ordered list mutations used by hooks to wire up middleware chains and
/// component lists.
///
/// Editing a deferred list records the edits on the [`DeferredValue`]. They are
/// replayed on top of the bound value, so queries like [`Self::items`] only see
/// the items added so far and anchors are checked at binding time.
pub struct ListEditor<'a> {
    setting: String,
    target: ListTarget<'a>,
}

enum ListTarget<'a> {
    Literal(&'a mut Vec<Value>),
    Deferred {
        edits: &'a mut Vec<ListEdit>,
        added: Vec<Value>,
    },
}

impl ListEditor<'_> {
    /// Whether the edited list is bound from the environment later
    pub fn is_deferred(&self) -> bool {
        matches!(self.target, ListTarget::Deferred { .. })
    }

    pub fn items(&self) -> &[Value] {
        match &self.target {
            ListTarget::Literal(items) => &items[..],
            ListTarget::Deferred { added, .. } => &added[..],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn position(&self, item: impl Into<Value>) -> Option<usize> {
        let item = item.into();
        self.items().iter().position(|v| *v == item)
    }

    pub fn contains(&self, item: impl Into<Value>) -> bool {
        self.position(item).is_some()
    }

    pub fn append(&mut self, item: impl Into<Value>) -> &mut Self {
        let item = item.into();
        match &mut self.target {
            ListTarget::Literal(items) => items.push(item),
            ListTarget::Deferred { edits, added } => {
                added.push(item.clone());
                edits.push(ListEdit::Append(item));
            }
        }
        self
    }

    pub fn extend<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for item in items {
            self.append(item);
        }
        self
    }

    /// Inserts at the index, indices past the end append
    pub fn insert(&mut self, index: usize, item: impl Into<Value>) -> &mut Self {
        let item = item.into();
        match &mut self.target {
            ListTarget::Literal(items) => {
                let index = index.min(items.len());
                items.insert(index, item);
            }
            ListTarget::Deferred { edits, added } => {
                added.push(item.clone());
                edits.push(ListEdit::Insert(index, item));
            }
        }
        self
    }

    /// Inserts immediately before the `anchor` entry
    pub fn insert_before(
        &mut self,
        anchor: impl Into<Value>,
        item: impl Into<Value>,
    ) -> Result<&mut Self, HookError> {
        self.edit_at(ListEdit::InsertBefore(anchor.into(), item.into()))
    }

    /// Inserts immediately after the `anchor` entry
    pub fn insert_after(
        &mut self,
        anchor: impl Into<Value>,
        item: impl Into<Value>,
    ) -> Result<&mut Self, HookError> {
        self.edit_at(ListEdit::InsertAfter(anchor.into(), item.into()))
    }

    fn edit_at(&mut self, edit: ListEdit) -> Result<&mut Self, HookError> {
        match &mut self.target {
            ListTarget::Literal(items) => {
                edit.apply(items)
                    .map_err(|anchor| HookError::OrderingViolation {
                        setting: self.setting.clone(),
                        anchor,
                    })?;
            }
            ListTarget::Deferred { edits, added } => {
                if let ListEdit::InsertBefore(_, item) | ListEdit::InsertAfter(_, item) = &edit {
                    added.push(item.clone());
                }
                edits.push(edit);
            }
        }
        Ok(self)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Edit of a deferred list, replayed after the list is bound.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEdit {
    Append(Value),
    /// Indices past the end append
    Insert(usize, Value),
    /// Inserts the item (second) before the anchor (first)
    InsertBefore(Value, Value),
    /// Inserts the item (second) after the anchor (first)
    InsertAfter(Value, Value),
}

impl ListEdit {
    /// Applies the edit, returning the name of a missing anchor on failure
    pub(crate) fn apply(self, items: &mut Vec<Value>) -> Result<(), String> {
        match self {
            Self::Append(item) => items.push(item),
            Self::Insert(index, item) => {
                let index = index.min(items.len());
                items.insert(index, item);
            }
            Self::InsertBefore(anchor, item) => {
                let index = anchor_index(items, anchor)?;
                items.insert(index, item);
            }
            Self::InsertAfter(anchor, item) => {
                let index = anchor_index(items, anchor)?;
                items.insert(index + 1, item);
            }
        }
        Ok(())
    }
}

fn anchor_index(items: &[Value], anchor: Value) -> Result<usize, String> {
    if let Some(index) = items.iter().position(|v| *v == anchor) {
        return Ok(index);
    }

    Err(match anchor {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Key-value mutations of a map setting.
pub struct MapEditor<'a> {
    setting: String,
    map: &'a mut serde_json::Map<String, Value>,
}

impl MapEditor<'_> {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key.into(), value.into());
        self
    }

    /// Shallow merge of another map, keys of `other` win
    pub fn update(&mut self, other: impl Into<Value>) -> Result<&mut Self, HookError> {
        let Value::Object(other) = other.into() else {
            return Err(HookError::TypeMismatch {
                setting: self.setting.clone(),
                expected: "a map to merge",
            });
        };

        for (k, v) in other {
            self.map.insert(k, v);
        }
        Ok(self)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////
